use super::commands::ShipCommandError;
use crate::domain::resources::{ResourcePool, per_tick};
use crate::domain::tuning::EngineTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Off,
    Starting { power_used: i64 },
    /// Online and idling.
    Online,
    Lit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub state: EngineState,

    /// Boost requested for the next tick. Cleared every tick.
    pub boost_requested: bool,

    /// Whether the current tick burned boosted.
    pub boosted: bool,
    pub boosted_last_frame: Option<u64>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            state: EngineState::Off,
            boost_requested: false,
            boosted: false,
            boosted_last_frame: None,
        }
    }
}

impl Engine {
    pub fn is_online(&self) -> bool {
        matches!(self.state, EngineState::Online | EngineState::Lit)
    }

    pub fn is_lit(&self) -> bool {
        self.state == EngineState::Lit
    }

    pub fn is_starting(&self) -> bool {
        matches!(self.state, EngineState::Starting { .. })
    }

    /// No-op unless the engine is off.
    pub fn activate(&mut self) {
        if self.state == EngineState::Off {
            self.state = EngineState::Starting { power_used: 0 };
        }
    }

    pub fn deactivate(&mut self) {
        if self.is_online() {
            self.shut_down();
        }
    }

    pub fn shut_down(&mut self) {
        self.state = EngineState::Off;
        self.boost_requested = false;
        self.boosted = false;
    }

    pub fn light(&mut self) -> Result<(), ShipCommandError> {
        match self.state {
            EngineState::Online => {
                self.state = EngineState::Lit;
                Ok(())
            }
            EngineState::Lit => Ok(()),
            _ => Err(ShipCommandError::EngineOffline),
        }
    }

    pub fn unlight(&mut self) {
        if self.state == EngineState::Lit {
            self.state = EngineState::Online;
            self.boost_requested = false;
        }
    }

    pub fn boost(&mut self) -> Result<(), ShipCommandError> {
        if !self.is_lit() {
            return Err(ShipCommandError::EngineNotLit);
        }
        self.boost_requested = true;
        Ok(())
    }

    /// Startup progress while starting.
    pub fn startup_percent(&self, tuning: &EngineTuning) -> Option<u8> {
        match self.state {
            EngineState::Starting { power_used } => Some(percent(power_used, tuning.activation_power)),
            _ => None,
        }
    }

    /// Advances one tick. Underfunded draws drop the engine to off on this tick.
    pub fn tick(
        &mut self,
        tuning: &EngineTuning,
        fps: u32,
        frame: u64,
        battery: &mut ResourcePool,
        fuel: &mut ResourcePool,
    ) {
        self.boosted = false;
        match self.state {
            EngineState::Off => {}
            EngineState::Starting { power_used } => {
                if power_used >= tuning.activation_power {
                    self.state = match battery.spend(per_tick(tuning.idle_power_rate, fps)) {
                        Ok(_) => EngineState::Online,
                        Err(_) => EngineState::Off,
                    };
                } else {
                    let step = per_tick(tuning.activation_rate, fps)
                        .min(tuning.activation_power - power_used);
                    self.state = match battery.spend(step) {
                        Ok(_) => EngineState::Starting {
                            power_used: power_used + step,
                        },
                        Err(_) => EngineState::Off,
                    };
                }
            }
            EngineState::Online => {
                if battery.spend(per_tick(tuning.idle_power_rate, fps)).is_err() {
                    self.shut_down();
                }
            }
            EngineState::Lit => {
                let burn = per_tick(tuning.fuel_rate, fps);
                if fuel.spend(burn).is_err() {
                    // flame-out
                    self.shut_down();
                    return;
                }
                battery.fill(per_tick(tuning.battery_charge_rate, fps));

                if std::mem::take(&mut self.boost_requested) {
                    let extra = (burn as f64 * tuning.boost_multiple).round() as i64;
                    match fuel.spend(extra) {
                        Ok(_) => {
                            self.boosted = true;
                            self.boosted_last_frame = Some(frame);
                        }
                        Err(_) => self.shut_down(),
                    }
                }
            }
        }
    }
}

pub(crate) fn percent(used: i64, total: i64) -> u8 {
    if total <= 0 {
        return 100;
    }
    ((used as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
}
