// Per-tick passes over the whole world. Each pass records what it caused in
// `FrameEvents`; the game turns those into kill feed entries and blasts.

pub mod explosions;
pub mod munitions;
pub mod scanner;
pub mod stations;
pub mod weapons;

use super::effects::BlastSpec;
use super::geometry::Point;
use super::ids::ShipId;
use super::killfeed::KillCause;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub victim: ShipId,
    pub cause: KillCause,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmpBlastSpec {
    pub origin: Point,
    pub radius_m: f64,
}

#[derive(Debug, Default)]
pub struct FrameEvents {
    pub kills: Vec<Kill>,
    pub blasts: Vec<BlastSpec>,
    pub emp_blasts: Vec<EmpBlastSpec>,
}

impl FrameEvents {
    pub fn kill(&mut self, victim: ShipId, cause: KillCause) {
        self.kills.push(Kill { victim, cause });
    }
}
