use super::commands::ShipCommandError;
use super::mining::OreHold;
use crate::domain::tuning::TubeTuning;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MunitionKind {
    MagnetMine,
    Emp,
    HunterDrone,
}

impl fmt::Display for MunitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MunitionKind::MagnetMine => "magnet mine",
            MunitionKind::Emp => "emp",
            MunitionKind::HunterDrone => "hunter drone",
        })
    }
}

/// A launch queued by a command, resolved in the weapons step of the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeLaunch {
    pub kind: MunitionKind,
    pub velocity_mps: f64,
}

/// Special weapons tubes.
#[derive(Debug, Clone, PartialEq)]
pub struct Tubes {
    pub magnet_mines: u32,
    pub emps: u32,
    pub hunter_drones: u32,
    pub pending: Option<TubeLaunch>,
    pub last_fire_frame: Option<u64>,
}

impl Tubes {
    pub fn new(tuning: &TubeTuning) -> Self {
        Self {
            magnet_mines: tuning.starting_magnet_mines,
            emps: tuning.starting_emps,
            hunter_drones: tuning.starting_hunter_drones,
            pending: None,
            last_fire_frame: None,
        }
    }

    pub fn loaded(&self) -> u32 {
        self.magnet_mines + self.emps + self.hunter_drones
    }

    fn slot(&mut self, kind: MunitionKind) -> &mut u32 {
        match kind {
            MunitionKind::MagnetMine => &mut self.magnet_mines,
            MunitionKind::Emp => &mut self.emps,
            MunitionKind::HunterDrone => &mut self.hunter_drones,
        }
    }

    pub fn loaded_of(&self, kind: MunitionKind) -> u32 {
        match kind {
            MunitionKind::MagnetMine => self.magnet_mines,
            MunitionKind::Emp => self.emps,
            MunitionKind::HunterDrone => self.hunter_drones,
        }
    }

    /// Loads one munition into an empty tube, paid for with ore. Docking is
    /// checked by the caller.
    pub fn buy(
        &mut self,
        kind: MunitionKind,
        tuning: &TubeTuning,
        hold: &mut OreHold,
    ) -> Result<(), ShipCommandError> {
        if self.loaded() >= tuning.tube_count {
            return Err(ShipCommandError::TubesFull);
        }
        let cost = match kind {
            MunitionKind::MagnetMine => tuning.magnet_mine_cost_kg,
            MunitionKind::Emp => tuning.emp_cost_kg,
            MunitionKind::HunterDrone => tuning.hunter_drone_cost_kg,
        };
        hold.withdraw(cost)
            .map_err(|s| ShipCommandError::InsufficientOre {
                required_kg: s.requested_kg,
                available_kg: s.available_kg,
            })?;
        *self.slot(kind) += 1;
        Ok(())
    }

    /// Queues a launch. Velocity is clamped to the tube limits.
    pub fn launch(
        &mut self,
        kind: MunitionKind,
        velocity_mps: i64,
        tuning: &TubeTuning,
    ) -> Result<(), ShipCommandError> {
        if self.loaded_of(kind) == 0 {
            return Err(ShipCommandError::NoneLoaded(kind));
        }
        if self.pending.is_some() {
            return Err(ShipCommandError::TubeBusy);
        }
        let velocity = velocity_mps.clamp(
            tuning.launch_velocity_min_mps,
            tuning.launch_velocity_max_mps,
        );
        self.pending = Some(TubeLaunch {
            kind,
            velocity_mps: velocity as f64,
        });
        Ok(())
    }

    /// Takes the queued launch and unloads its tube.
    pub fn take_launch(&mut self, frame: u64) -> Option<TubeLaunch> {
        let launch = self.pending.take()?;
        let slot = self.slot(launch.kind);
        *slot = slot.saturating_sub(1);
        self.last_fire_frame = Some(frame);
        Some(launch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_launching_then_velocity_is_clamped_and_one_launch_queues() {
        let tuning = TubeTuning::default();
        let mut tubes = Tubes::new(&tuning);
        tubes.launch(MunitionKind::Emp, 500, &tuning).unwrap();
        assert_eq!(tubes.pending.map(|l| l.velocity_mps), Some(75.0));
        assert_eq!(
            tubes.launch(MunitionKind::Emp, 10, &tuning),
            Err(ShipCommandError::TubeBusy)
        );

        let launch = tubes.take_launch(42).unwrap();
        assert_eq!(launch.kind, MunitionKind::Emp);
        assert_eq!(tubes.emps, 1);
        assert_eq!(tubes.last_fire_frame, Some(42));
    }

    #[test]
    fn when_tube_is_empty_then_launch_is_rejected() {
        let tuning = TubeTuning {
            starting_hunter_drones: 0,
            ..TubeTuning::default()
        };
        let mut tubes = Tubes::new(&tuning);
        assert_eq!(
            tubes.launch(MunitionKind::HunterDrone, 1, &tuning),
            Err(ShipCommandError::NoneLoaded(MunitionKind::HunterDrone))
        );
    }

    #[test]
    fn when_buying_then_ore_is_spent_until_tubes_are_full() {
        let tuning = TubeTuning::default();
        let mut tubes = Tubes::new(&tuning);
        let mut hold = OreHold {
            cargo_kg: 0.0,
            virtual_kg: 1000.0,
        };
        tubes.buy(MunitionKind::MagnetMine, &tuning, &mut hold).unwrap();
        tubes.buy(MunitionKind::Emp, &tuning, &mut hold).unwrap();
        assert_eq!(tubes.loaded(), 8);
        assert_eq!(hold.virtual_kg, 500.0);
        assert_eq!(
            tubes.buy(MunitionKind::Emp, &tuning, &mut hold),
            Err(ShipCommandError::TubesFull)
        );
    }
}
