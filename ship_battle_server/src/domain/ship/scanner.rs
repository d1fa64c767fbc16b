// Directional scanner: power state, lock acquisition and the per-tick readings.

use super::commands::ShipCommandError;
use super::engine::percent;
use crate::domain::geometry::Point;
use crate::domain::ids::{MunitionId, ShipId};
use crate::domain::resources::{ResourcePool, per_tick};
use crate::domain::tuning::ScannerTuning;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScannerMode {
    #[default]
    Radar,
    Ir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScannerPower {
    #[default]
    Off,
    Starting {
        power_used: i64,
    },
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    None,
    Locking {
        target: ShipId,
        power_used: i64,
    },
    Locked {
        target: ShipId,
    },
}

impl LockState {
    pub fn target(&self) -> Option<ShipId> {
        match self {
            LockState::None => None,
            LockState::Locking { target, .. } | LockState::Locked { target } => Some(*target),
        }
    }
}

/// Mode specific part of a ship reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadingPayload {
    /// Seen with the naked eye only.
    Visual,
    Radar { diameter_m: f64 },
    Ir { thermal_signature: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipReading {
    pub designator: String,
    pub position: Point,
    pub distance_m: i64,

    /// Whole-degree bearing from the observer.
    pub relative_heading: i32,

    /// Unrounded bearing, used for lock traversal.
    pub bearing: f64,

    pub heading: i32,
    pub alive: bool,
    pub exploded: bool,
    pub visual: bool,
    pub payload: ReadingPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MunitionReadingKind {
    MagnetMine,
    Emp,
    HunterDrone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MunitionReading {
    pub kind: MunitionReadingKind,
    pub position: Point,
    pub distance_m: i64,
    pub relative_heading: i32,
    pub visual: bool,
    pub exploded: bool,
}

/// Everything the scanner saw this tick. Rebuilt from scratch every tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readings {
    pub ships: BTreeMap<ShipId, ShipReading>,
    pub munitions: BTreeMap<MunitionId, MunitionReading>,
}

impl Readings {
    pub fn clear(&mut self) {
        self.ships.clear();
        self.munitions.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scanner {
    pub power: ScannerPower,
    pub mode: ScannerMode,
    pub lock: LockState,
    pub readings: Readings,

    /// Bearing to the lock target on the previous tick.
    pub last_lock_bearing: Option<f64>,

    /// Fraction of the allowed traversal used on the last tick.
    pub lock_traversal_slack: Option<f64>,
}

impl Scanner {
    pub fn is_online(&self) -> bool {
        self.power == ScannerPower::Online
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.lock, LockState::Locked { .. })
    }

    pub fn is_locking(&self) -> bool {
        matches!(self.lock, LockState::Locking { .. })
    }

    /// Range of the active mode in meters, zero while not online.
    pub fn range_m(&self, tuning: &ScannerTuning) -> f64 {
        if !self.is_online() {
            return 0.0;
        }
        match self.mode {
            ScannerMode::Radar => tuning.radar_range_m,
            ScannerMode::Ir => tuning.ir_range_m,
        }
    }

    pub fn activate(&mut self) {
        if self.power == ScannerPower::Off {
            self.power = ScannerPower::Starting { power_used: 0 };
        }
    }

    pub fn deactivate(&mut self) {
        if self.is_online() {
            self.shut_down();
        }
    }

    pub fn shut_down(&mut self) {
        self.power = ScannerPower::Off;
        self.clear_lock();
        self.readings.clear();
    }

    pub fn clear_lock(&mut self) {
        self.lock = LockState::None;
        self.last_lock_bearing = None;
        self.lock_traversal_slack = None;
    }

    pub fn set_mode(&mut self, mode: ScannerMode) {
        self.mode = mode;
    }

    pub fn set_lock_target(&mut self, target: ShipId) -> Result<(), ShipCommandError> {
        if !self.is_online() {
            return Err(ShipCommandError::ScannerOffline);
        }
        if self.is_locking() {
            return Err(ShipCommandError::AlreadyLocking);
        }
        if !self.readings.ships.contains_key(&target) {
            return Err(ShipCommandError::TargetNotInReadings(target));
        }
        self.lock = LockState::Locking {
            target,
            power_used: 0,
        };
        self.last_lock_bearing = None;
        self.lock_traversal_slack = None;
        Ok(())
    }

    pub fn startup_percent(&self, tuning: &ScannerTuning) -> Option<u8> {
        match self.power {
            ScannerPower::Starting { power_used } => {
                Some(percent(power_used, tuning.activation_power))
            }
            _ => None,
        }
    }

    pub fn lock_percent(&self, tuning: &ScannerTuning) -> Option<u8> {
        match self.lock {
            LockState::Locking { power_used, .. } => Some(percent(power_used, tuning.lock_power)),
            _ => None,
        }
    }

    /// Power accounting for one tick.
    pub fn tick(&mut self, tuning: &ScannerTuning, fps: u32, battery: &mut ResourcePool) {
        match self.power {
            ScannerPower::Off => {}
            ScannerPower::Starting { power_used } => {
                if power_used >= tuning.activation_power {
                    match battery.spend(per_tick(tuning.idle_power_rate, fps)) {
                        Ok(_) => self.power = ScannerPower::Online,
                        Err(_) => self.shut_down(),
                    }
                    return;
                }
                let step = per_tick(tuning.activation_rate, fps)
                    .min(tuning.activation_power - power_used);
                match battery.spend(step) {
                    Ok(_) => {
                        self.power = ScannerPower::Starting {
                            power_used: power_used + step,
                        }
                    }
                    Err(_) => self.shut_down(),
                }
            }
            ScannerPower::Online => {
                if battery.spend(per_tick(tuning.idle_power_rate, fps)).is_err() {
                    self.shut_down();
                    return;
                }
                if let LockState::Locking { target, power_used } = self.lock {
                    if power_used >= tuning.lock_power {
                        self.lock = LockState::Locked { target };
                        return;
                    }
                    let step = per_tick(tuning.lock_rate, fps).min(tuning.lock_power - power_used);
                    match battery.spend(step) {
                        Ok(_) => {
                            self.lock = LockState::Locking {
                                target,
                                power_used: power_used + step,
                            }
                        }
                        Err(_) => self.clear_lock(),
                    }
                }
            }
        }
    }

    /// Checks the lock against fresh readings. Drops it when the target vanished
    /// or its bearing swung faster than the scanner can follow.
    pub fn verify_lock(&mut self, tuning: &ScannerTuning, fps: u32) {
        let Some(target) = self.lock.target() else {
            return;
        };
        let Some(reading) = self.readings.ships.get(&target) else {
            self.clear_lock();
            return;
        };
        let bearing = reading.bearing;
        let Some(previous) = self.last_lock_bearing else {
            self.last_lock_bearing = Some(bearing);
            self.lock_traversal_slack = Some(0.0);
            return;
        };

        let max_per_second = if self.is_locked() {
            tuning.locked_max_traversal_deg
        } else {
            tuning.locking_max_traversal_deg
        };
        let max_per_tick = max_per_second / fps.max(1) as f64;
        let delta = crate::domain::geometry::delta_degrees(previous, bearing);
        if delta > max_per_tick {
            self.clear_lock();
        } else {
            self.last_lock_bearing = Some(bearing);
            self.lock_traversal_slack = Some(delta / max_per_tick);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(bearing: f64) -> ShipReading {
        ShipReading {
            designator: "RED HERON".to_string(),
            position: Point::new(0, 0),
            distance_m: 100,
            relative_heading: bearing.round() as i32,
            bearing,
            heading: 0,
            alive: true,
            exploded: false,
            visual: false,
            payload: ReadingPayload::Radar { diameter_m: 12.6 },
        }
    }

    fn online_scanner() -> Scanner {
        Scanner {
            power: ScannerPower::Online,
            ..Scanner::default()
        }
    }

    #[test]
    fn when_scanner_starts_then_idle_is_paid_on_the_last_step() {
        let tuning = ScannerTuning::default();
        let mut scanner = Scanner::default();
        let mut battery = ResourcePool::new(2000, 40_000);
        scanner.activate();
        // 1000 budget at 500/s and 5 fps.
        for _ in 0..10 {
            scanner.tick(&tuning, 5, &mut battery);
        }
        assert_eq!(scanner.power, ScannerPower::Starting { power_used: 1000 });
        scanner.tick(&tuning, 5, &mut battery);
        assert!(scanner.is_online());
        assert_eq!(battery.level(), 2000 - 1000 - 60);
    }

    #[test]
    fn when_lock_completes_then_scanner_is_locked() {
        let tuning = ScannerTuning::default();
        let mut scanner = online_scanner();
        scanner.readings.ships.insert(ShipId(2), reading(10.0));
        scanner.set_lock_target(ShipId(2)).unwrap();
        assert_eq!(
            scanner.set_lock_target(ShipId(2)),
            Err(ShipCommandError::AlreadyLocking)
        );

        let mut battery = ResourcePool::new(10_000, 40_000);
        for _ in 0..3 {
            scanner.tick(&tuning, 1, &mut battery);
        }
        assert_eq!(scanner.lock, LockState::Locked { target: ShipId(2) });
        assert_eq!(battery.level(), 10_000 - 300 * 3 - 2000);
    }

    #[test]
    fn when_idle_power_is_missing_then_lock_and_readings_are_cleared() {
        let tuning = ScannerTuning::default();
        let mut scanner = online_scanner();
        scanner.readings.ships.insert(ShipId(2), reading(10.0));
        scanner.lock = LockState::Locked { target: ShipId(2) };
        let mut battery = ResourcePool::new(5, 40_000);
        scanner.tick(&tuning, 30, &mut battery);
        assert_eq!(scanner.power, ScannerPower::Off);
        assert_eq!(scanner.lock, LockState::None);
        assert!(scanner.readings.ships.is_empty());
        assert_eq!(battery.level(), 5);
    }

    #[test]
    fn when_target_is_not_in_readings_then_lock_is_rejected() {
        let mut scanner = online_scanner();
        assert_eq!(
            scanner.set_lock_target(ShipId(9)),
            Err(ShipCommandError::TargetNotInReadings(ShipId(9)))
        );
        scanner.power = ScannerPower::Off;
        assert_eq!(
            scanner.set_lock_target(ShipId(9)),
            Err(ShipCommandError::ScannerOffline)
        );
    }

    #[test]
    fn when_bearing_swings_too_fast_then_lock_breaks() {
        let tuning = ScannerTuning::default();
        let mut scanner = online_scanner();
        scanner.lock = LockState::Locked { target: ShipId(2) };

        scanner.readings.ships.insert(ShipId(2), reading(359.5));
        scanner.verify_lock(&tuning, 30);
        // Locked limit is 60 deg/s, 2 deg per tick at 30 fps. Wraps through north.
        scanner.readings.ships.insert(ShipId(2), reading(1.0));
        scanner.verify_lock(&tuning, 30);
        assert!(scanner.is_locked());
        assert_eq!(scanner.lock_traversal_slack, Some(0.75));

        scanner.readings.ships.insert(ShipId(2), reading(4.0));
        scanner.verify_lock(&tuning, 30);
        assert_eq!(scanner.lock, LockState::None);
    }

    #[test]
    fn when_target_leaves_readings_then_lock_is_dropped() {
        let tuning = ScannerTuning::default();
        let mut scanner = online_scanner();
        scanner.lock = LockState::Locking {
            target: ShipId(3),
            power_used: 500,
        };
        scanner.verify_lock(&tuning, 30);
        assert_eq!(scanner.lock, LockState::None);
    }
}
