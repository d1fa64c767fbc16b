use crate::domain::resources::per_tick;
use crate::domain::tuning::ServicesTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrakeMotion {
    #[default]
    Idle,
    Extending,
    Retracting,
}

/// Gravity brake arm. Position runs from 0 (retracted) to the deployed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GravityBrake {
    pub position: i64,
    pub motion: BrakeMotion,

    /// Bleeding off velocity after a station catch.
    pub active: bool,
}

impl GravityBrake {
    pub fn is_deployed(&self, tuning: &ServicesTuning) -> bool {
        self.position >= tuning.gravity_brake_deployed_position
    }

    pub fn is_retracted(&self) -> bool {
        self.position == 0
    }

    pub fn is_moving(&self) -> bool {
        self.motion != BrakeMotion::Idle
    }

    /// Ignored while the arm is already moving.
    pub fn extend(&mut self, tuning: &ServicesTuning) {
        if !self.is_moving() && !self.is_deployed(tuning) {
            self.motion = BrakeMotion::Extending;
        }
    }

    pub fn retract(&mut self) {
        if !self.is_moving() && !self.is_retracted() {
            self.motion = BrakeMotion::Retracting;
            self.active = false;
        }
    }

    pub fn reset(&mut self) {
        *self = GravityBrake::default();
    }

    pub fn deploy_percent(&self, tuning: &ServicesTuning) -> Option<u8> {
        if !self.is_moving() {
            return None;
        }
        let total = tuning.gravity_brake_deployed_position.max(1) as f64;
        Some(((self.position as f64 / total) * 100.0).round().clamp(0.0, 100.0) as u8)
    }

    pub fn tick(&mut self, tuning: &ServicesTuning, fps: u32) {
        let step = per_tick(tuning.gravity_brake_traversal_rate, fps);
        let deployed = tuning.gravity_brake_deployed_position;
        match self.motion {
            BrakeMotion::Idle => {}
            BrakeMotion::Extending => {
                self.position = (self.position + step).min(deployed);
                if self.position >= deployed {
                    self.motion = BrakeMotion::Idle;
                }
            }
            BrakeMotion::Retracting => {
                self.position = (self.position - step).max(0);
                if self.position == 0 {
                    self.motion = BrakeMotion::Idle;
                }
            }
        }
    }
}

/// Bleeds one velocity component toward zero while the brake is active.
pub fn bleed_velocity(v: f64, fps: u32) -> f64 {
    if v == 0.0 {
        return 0.0;
    }
    let magnitude = v.abs();
    let delta = if magnitude > 150.0 {
        magnitude - 100.0
    } else {
        let scaled = magnitude / 2.0 / (fps.max(1) as f64 / 6.0);
        magnitude.min(scaled.max(5.0))
    };
    let next = v - delta * v.signum();
    if next.abs() < 5.0 { 0.0 } else { next }
}
