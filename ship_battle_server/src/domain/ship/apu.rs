use super::engine::percent;
use crate::domain::resources::{ResourcePool, per_tick};
use crate::domain::tuning::ApuTuning;

/// Auxiliary power unit: burns fuel to charge the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Apu {
    #[default]
    Off,
    Starting {
        power_used: i64,
    },
    Online,
}

impl Apu {
    pub fn is_online(&self) -> bool {
        *self == Apu::Online
    }

    pub fn activate(&mut self) {
        if *self == Apu::Off {
            *self = Apu::Starting { power_used: 0 };
        }
    }

    pub fn deactivate(&mut self) {
        *self = Apu::Off;
    }

    pub fn startup_percent(&self, tuning: &ApuTuning) -> Option<u8> {
        match self {
            Apu::Starting { power_used } => Some(percent(*power_used, tuning.activation_power)),
            _ => None,
        }
    }

    pub fn tick(
        &mut self,
        tuning: &ApuTuning,
        fps: u32,
        battery: &mut ResourcePool,
        fuel: &mut ResourcePool,
    ) {
        match *self {
            Apu::Off => {}
            Apu::Starting { power_used } => {
                if power_used >= tuning.activation_power {
                    *self = Apu::Online;
                    return;
                }
                let step =
                    per_tick(tuning.activation_rate, fps).min(tuning.activation_power - power_used);
                *self = match battery.spend(step) {
                    Ok(_) => Apu::Starting {
                        power_used: power_used + step,
                    },
                    Err(_) => Apu::Off,
                };
            }
            Apu::Online => {
                if fuel.spend(per_tick(tuning.fuel_rate, fps)).is_err() {
                    *self = Apu::Off;
                    return;
                }
                battery.fill(per_tick(tuning.battery_charge_rate, fps));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_apu_runs_then_fuel_becomes_battery() {
        let tuning = ApuTuning::default();
        let mut apu = Apu::default();
        let mut battery = ResourcePool::new(10_000, 40_000);
        let mut fuel = ResourcePool::new(10_000, 10_000);
        apu.activate();

        // 2000 budget at 400/s and 4 fps: 20 ticks of 100, then one tick to go online.
        for _ in 0..21 {
            apu.tick(&tuning, 4, &mut battery, &mut fuel);
        }
        assert!(apu.is_online());
        assert_eq!(battery.level(), 8000);

        apu.tick(&tuning, 4, &mut battery, &mut fuel);
        assert_eq!(battery.level(), 8050);
        assert_eq!(fuel.level(), 10_000 - 13);
    }

    #[test]
    fn when_fuel_is_empty_then_apu_shuts_off() {
        let tuning = ApuTuning::default();
        let mut apu = Apu::Online;
        let mut battery = ResourcePool::new(0, 40_000);
        let mut fuel = ResourcePool::new(0, 10_000);
        apu.tick(&tuning, 30, &mut battery, &mut fuel);
        assert_eq!(apu, Apu::Off);
        assert_eq!(battery.level(), 0);
    }
}
