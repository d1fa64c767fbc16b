// Short-lived world effects: explosions, EMP blasts, shockwaves and e-beam rays.

use super::geometry::Point;
use super::ids::ShipId;
use std::collections::BTreeSet;

/// Blast request raised during a tick and registered by the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastSpec {
    pub origin: Point,
    pub radius_m: f64,
    pub flame_ms: f64,
    pub fade_ms: f64,

    /// Set when a ship's wreck is the source.
    pub ship_id: Option<ShipId>,
}

impl BlastSpec {
    /// Ship explosion, bigger when the tank was still full.
    pub fn ship(ship_id: ShipId, origin: Point, fiery: bool) -> Self {
        let (radius_m, flame_ms, fade_ms) = if fiery {
            (100.0, 3000.0, 6000.0)
        } else {
            (65.0, 1500.0, 4500.0)
        };
        Self {
            origin,
            radius_m,
            flame_ms,
            fade_ms,
            ship_id: Some(ship_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub id: u64,
    pub origin: Point,
    pub radius_m: f64,
    pub flame_ms: f64,
    pub fade_ms: f64,
    pub elapsed_ms: f64,
    pub ship_id: Option<ShipId>,
}

impl Explosion {
    pub fn new(id: u64, spec: BlastSpec) -> Self {
        Self {
            id,
            origin: spec.origin,
            radius_m: spec.radius_m,
            flame_ms: spec.flame_ms,
            fade_ms: spec.fade_ms,
            elapsed_ms: 10.0,
            ship_id: spec.ship_id,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms > self.flame_ms + self.fade_ms
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmpBlast {
    pub id: u64,
    pub origin: Point,
    pub radius_m: f64,
    pub flare_ms: f64,
    pub fade_ms: f64,
    pub elapsed_ms: f64,
}

impl EmpBlast {
    pub fn new(id: u64, origin: Point, radius_m: f64) -> Self {
        Self {
            id,
            origin,
            radius_m,
            flare_ms: 200.0,
            fade_ms: 3000.0,
            elapsed_ms: 10.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms > self.flare_ms + self.fade_ms
    }
}

/// Expanding ring pushed out by an explosion.
#[derive(Debug, Clone, PartialEq)]
pub struct Shockwave {
    pub id: u64,
    pub origin: Point,
    pub radius_m: f64,

    /// Ships reached while the ring is inside this radius are destroyed.
    pub lethal_radius_m: f64,

    /// Ships already hit. Each ship is hit at most once per wave.
    pub hit: BTreeSet<ShipId>,
}

impl Shockwave {
    pub fn new(id: u64, origin: Point, lethal_radius_m: f64) -> Self {
        Self {
            id,
            origin,
            radius_m: 1.0,
            lethal_radius_m,
            hit: BTreeSet::new(),
        }
    }
}

/// A beam fired this tick, kept for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EbeamRay {
    pub ship_id: ShipId,
    pub start: Point,
    pub heading: i32,
    pub hit: Option<ShipId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub explosions: Vec<Explosion>,
    pub emp_blasts: Vec<EmpBlast>,
    pub shockwaves: Vec<Shockwave>,
    pub ebeam_rays: Vec<EbeamRay>,
}
