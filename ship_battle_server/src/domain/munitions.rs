// Tube-launched munitions. Positions are kept as floats so slow drift accumulates.

use super::geometry::Point;
use super::ids::{MunitionId, ShipId, TeamId};
use super::ship::Hull;
use std::collections::BTreeMap;

/// Kinematic state shared by every munition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ballistics {
    pub x: f64,
    pub y: f64,

    /// Meters per second.
    pub velocity: (f64, f64),

    pub elapsed_ms: f64,
}

impl Ballistics {
    pub fn position(&self) -> Point {
        Point::new(self.x.round() as i64, self.y.round() as i64)
    }

    /// Moves along the current velocity for one tick.
    pub fn drift(&mut self, units_per_meter: i64, fps: u32) {
        let scale = units_per_meter as f64 / fps.max(1) as f64;
        self.x += self.velocity.0 * scale;
        self.y += self.velocity.1 * scale;
    }

    pub fn age(&mut self, fps: u32) {
        self.elapsed_ms += 1000.0 / fps.max(1) as f64;
    }

    /// Percent of the arming delay elapsed.
    pub fn percent_armed(&self, arming_ms: f64) -> u8 {
        if arming_ms <= 0.0 {
            return 100;
        }
        ((self.elapsed_ms / arming_ms) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MagnetMine {
    pub id: MunitionId,
    pub launched_by: ShipId,
    pub launched_on_frame: u64,
    pub motion: Ballistics,
    pub armed: bool,
    pub exploded: bool,
    pub closest_ship: Option<ShipId>,
    pub distance_to_closest_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Emp {
    pub id: MunitionId,
    pub launched_by: ShipId,
    pub launched_on_frame: u64,
    pub motion: Ballistics,
    pub armed: bool,
    pub exploded: bool,
}

/// Patrol turn direction for a drone with no target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolTurn {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HunterDrone {
    pub id: MunitionId,
    pub launched_by: ShipId,
    pub launched_on_frame: u64,

    /// Ships of this team are never targeted.
    pub team_id: Option<TeamId>,

    pub motion: Ballistics,
    pub heading: i32,
    pub hull: Hull,
    pub armed: bool,
    pub exploded: bool,
    pub target: Option<ShipId>,
    pub patrol: PatrolTurn,
}

impl HunterDrone {
    pub fn set_heading(&mut self, heading: i32) {
        self.heading = heading.rem_euclid(360);
        self.hull.set_heading(self.heading);
    }
}

/// All live munitions in a game, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Munitions {
    pub magnet_mines: BTreeMap<MunitionId, MagnetMine>,
    pub emps: BTreeMap<MunitionId, Emp>,
    pub hunter_drones: BTreeMap<MunitionId, HunterDrone>,
}

impl Munitions {
    pub fn len(&self) -> usize {
        self.magnet_mines.len() + self.emps.len() + self.hunter_drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
