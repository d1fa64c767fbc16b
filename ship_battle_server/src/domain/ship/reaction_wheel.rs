use crate::domain::resources::{ResourcePool, per_tick};
use crate::domain::tuning::ServicesTuning;

/// Needed to rotate the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionWheel {
    pub online: bool,
}

impl ReactionWheel {
    /// Pays the one-off activation cost. Stays offline if the battery can't cover it.
    pub fn activate(&mut self, tuning: &ServicesTuning, battery: &mut ResourcePool) {
        if self.online {
            return;
        }
        if battery.spend(tuning.reaction_wheel_activation_power).is_ok() {
            self.online = true;
        }
    }

    pub fn deactivate(&mut self) {
        self.online = false;
    }

    pub fn tick(&mut self, tuning: &ServicesTuning, fps: u32, battery: &mut ResourcePool) {
        if self.online
            && battery
                .spend(per_tick(tuning.reaction_wheel_idle_power_rate, fps))
                .is_err()
        {
            self.online = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_idle_draw_runs_dry_then_wheel_goes_offline() {
        let tuning = ServicesTuning::default();
        let per_frame = per_tick(tuning.reaction_wheel_idle_power_rate, 10);
        let mut battery = ResourcePool::new(per_frame * 3, 40_000);
        let mut wheel = ReactionWheel { online: true };
        for _ in 0..3 {
            wheel.tick(&tuning, 10, &mut battery);
        }
        assert!(wheel.online);
        assert_eq!(battery.level(), 0);
        wheel.tick(&tuning, 10, &mut battery);
        assert!(!wheel.online);
    }

    #[test]
    fn when_activation_is_unaffordable_then_nothing_is_debited() {
        let tuning = ServicesTuning::default();
        let mut battery = ResourcePool::new(499, 40_000);
        let mut wheel = ReactionWheel { online: false };
        wheel.activate(&tuning, &mut battery);
        assert!(!wheel.online);
        assert_eq!(battery.level(), 499);

        battery.fill(1);
        wheel.activate(&tuning, &mut battery);
        assert!(wheel.online);
        assert_eq!(battery.level(), 0);
    }
}
