use super::commands::ShipCommandError;
use crate::domain::resources::{ResourcePool, per_tick};
use crate::domain::tuning::EbeamTuning;

/// Energy beam capacitor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ebeam {
    pub charge: f64,
    pub charging: bool,
    pub firing: bool,
    pub last_hit_frame: Option<u64>,

    /// Armed for one shot at the first target that lines up.
    pub autofire: bool,
}

impl Ebeam {
    pub fn start_charging(&mut self) {
        self.charging = true;
    }

    pub fn pause_charging(&mut self) {
        self.charging = false;
    }

    /// Starts discharging. Stops any charging first.
    pub fn fire(&mut self, tuning: &EbeamTuning) -> Result<(), ShipCommandError> {
        self.charging = false;
        if self.firing {
            return Ok(());
        }
        if self.charge < tuning.fire_minimum {
            return Err(ShipCommandError::InsufficientCharge {
                charge: self.charge.round() as i64,
                required: tuning.fire_minimum.round() as i64,
            });
        }
        self.firing = true;
        Ok(())
    }

    pub fn set_autofire(&mut self, enabled: bool) {
        self.autofire = enabled;
    }

    /// Armed, idle and holding enough charge for a shot.
    pub fn autofire_ready(&self, tuning: &EbeamTuning) -> bool {
        self.autofire && !self.firing && self.charge >= tuning.fire_minimum
    }

    /// Spends the autofire arming on a shot.
    pub fn trigger_autofire(&mut self) {
        self.autofire = false;
        self.charging = false;
        self.firing = true;
    }

    pub fn shut_down(&mut self) {
        self.charging = false;
        self.firing = false;
    }

    pub fn charge_percent(&self, tuning: &EbeamTuning) -> Option<u8> {
        if !self.charging || tuning.charge_capacity <= 0.0 {
            return None;
        }
        Some(((self.charge / tuning.charge_capacity) * 100.0).round().clamp(0.0, 100.0) as u8)
    }

    pub fn tick(&mut self, tuning: &EbeamTuning, fps: u32, battery: &mut ResourcePool) {
        if !self.charging {
            return;
        }
        let cost = per_tick(tuning.charge_rate * tuning.charge_power_multiple, fps);
        if battery.spend(cost).is_err() {
            self.charging = false;
            return;
        }
        self.charge = (self.charge + tuning.charge_rate / fps.max(1) as f64).min(tuning.charge_capacity);
        if self.charge >= tuning.charge_capacity {
            self.charging = false;
        }
    }

    /// Drains one tick of discharge. Returns whether the beam is live this tick;
    /// a charge too small to cover the tick empties the capacitor and stops firing.
    pub fn discharge(&mut self, tuning: &EbeamTuning, fps: u32) -> bool {
        if !self.firing {
            return false;
        }
        let delta = tuning.discharge_rate / fps.max(1) as f64;
        if delta > self.charge {
            self.firing = false;
            self.charge = 0.0;
            return false;
        }
        self.charge = (self.charge - delta).round();
        true
    }
}
