// Read-only projections of game state handed to the transport layer.

use super::effects::{EbeamRay, EmpBlast, Explosion, Shockwave};
use super::game::GamePhase;
use super::geometry::Point;
use super::ids::{FeatureId, MunitionId, PlayerId, ShipId, TeamId};
use super::killfeed::KillFeedEntry;
use super::munitions::{Emp, HunterDrone, MagnetMine};
use super::ship::{
    AutopilotProgram, MunitionKind, Readings, ScannerMode, Ship, ShipTimer, UpgradeStatus,
};
use super::tuning::MunitionTuning;

#[derive(Debug, Clone, PartialEq)]
pub struct ShipSnapshot {
    pub id: ShipId,
    pub player_id: PlayerId,
    pub team_id: Option<TeamId>,
    pub designator: String,
    pub position: Point,
    pub heading: i32,
    pub velocity: (f64, f64),
    pub outline: [Point; 4],

    pub alive: bool,
    pub aflame: bool,
    pub exploded: bool,
    pub removed_from_map: bool,
    pub died_on_frame: Option<u64>,

    pub battery: i64,
    pub battery_capacity: i64,
    pub fuel: i64,
    pub fuel_capacity: i64,
    pub cargo_ore_kg: f64,
    pub virtual_ore_kg: f64,

    pub engine_online: bool,
    pub engine_lit: bool,
    pub apu_online: bool,
    pub reaction_wheel_online: bool,
    pub scanner_online: bool,
    pub scanner_mode: ScannerMode,
    pub scanner_locked: bool,
    pub scanner_lock_target: Option<ShipId>,
    pub ebeam_charge: f64,
    pub ebeam_charging: bool,
    pub ebeam_firing: bool,
    pub ebeam_autofire: bool,
    pub gravity_brake_position: i64,
    pub autopilot: Option<AutopilotProgram>,
    pub thermal_signature: i64,

    pub docked_at: Option<FeatureId>,
    pub parked_at: Option<FeatureId>,
    pub mining: bool,
    pub fueling: bool,
    pub scouted_ore: Vec<(FeatureId, f64)>,

    pub magnet_mines_loaded: u32,
    pub emps_loaded: u32,
    pub hunter_drones_loaded: u32,
    pub last_tube_fire_frame: Option<u64>,

    pub readings: Readings,
    pub timers: Vec<ShipTimer>,
    pub upgrades: Vec<UpgradeStatus>,
}

impl From<&Ship> for ShipSnapshot {
    fn from(ship: &Ship) -> Self {
        Self {
            id: ship.id,
            player_id: ship.player_id,
            team_id: ship.team_id,
            designator: ship.designator.clone(),
            position: ship.position,
            heading: ship.heading,
            velocity: ship.velocity,
            outline: ship.outline(),
            alive: ship.is_alive(),
            aflame: ship.damage.is_aflame(),
            exploded: ship.damage.is_exploded(),
            removed_from_map: ship.damage.removed_from_map,
            died_on_frame: ship.damage.died_on_frame,
            battery: ship.battery.level(),
            battery_capacity: ship.battery.capacity(),
            fuel: ship.fuel.level(),
            fuel_capacity: ship.fuel.capacity(),
            cargo_ore_kg: ship.ore.cargo_kg,
            virtual_ore_kg: ship.ore.virtual_kg,
            engine_online: ship.engine.is_online(),
            engine_lit: ship.engine.is_lit(),
            apu_online: ship.apu.is_online(),
            reaction_wheel_online: ship.reaction_wheel.online,
            scanner_online: ship.scanner.is_online(),
            scanner_mode: ship.scanner.mode,
            scanner_locked: ship.scanner.is_locked(),
            scanner_lock_target: ship.scanner.lock.target(),
            ebeam_charge: ship.ebeam.charge,
            ebeam_charging: ship.ebeam.charging,
            ebeam_firing: ship.ebeam.firing,
            ebeam_autofire: ship.ebeam.autofire,
            gravity_brake_position: ship.gravity_brake.position,
            autopilot: ship.autopilot.clone(),
            thermal_signature: ship.thermal_signature,
            docked_at: ship.docked_at.clone(),
            parked_at: ship.mining.parked_at.clone(),
            mining: ship.mining.active,
            fueling: ship.mining.fueling,
            scouted_ore: ship
                .mining
                .scouted_ore
                .iter()
                .map(|(id, kg)| (id.clone(), *kg))
                .collect(),
            magnet_mines_loaded: ship.tubes.magnet_mines,
            emps_loaded: ship.tubes.emps,
            hunter_drones_loaded: ship.tubes.hunter_drones,
            last_tube_fire_frame: ship.tubes.last_fire_frame,
            readings: ship.scanner.readings.clone(),
            timers: ship.timers(),
            upgrades: ship.research.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MunitionSnapshot {
    pub id: MunitionId,
    pub kind: MunitionKind,
    pub launched_by: ShipId,
    pub position: Point,
    pub velocity: (f64, f64),
    pub heading: Option<i32>,
    pub armed: bool,
    pub percent_armed: u8,
    pub target: Option<ShipId>,
}

impl MunitionSnapshot {
    pub fn magnet_mine(mine: &MagnetMine, tuning: &MunitionTuning) -> Self {
        Self {
            id: mine.id,
            kind: MunitionKind::MagnetMine,
            launched_by: mine.launched_by,
            position: mine.motion.position(),
            velocity: mine.motion.velocity,
            heading: None,
            armed: mine.armed,
            percent_armed: mine.motion.percent_armed(tuning.magnet_mine.arming_ms),
            target: mine.closest_ship,
        }
    }

    pub fn emp(emp: &Emp, tuning: &MunitionTuning) -> Self {
        Self {
            id: emp.id,
            kind: MunitionKind::Emp,
            launched_by: emp.launched_by,
            position: emp.motion.position(),
            velocity: emp.motion.velocity,
            heading: None,
            armed: emp.armed,
            percent_armed: emp.motion.percent_armed(tuning.emp.arming_ms),
            target: None,
        }
    }

    pub fn hunter_drone(drone: &HunterDrone, tuning: &MunitionTuning) -> Self {
        Self {
            id: drone.id,
            kind: MunitionKind::HunterDrone,
            launched_by: drone.launched_by,
            position: drone.motion.position(),
            velocity: drone.motion.velocity,
            heading: Some(drone.heading),
            armed: drone.armed,
            percent_armed: drone.motion.percent_armed(tuning.hunter_drone.arming_ms),
            target: drone.target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionSnapshot {
    pub id: u64,
    pub origin: Point,
    pub radius_m: f64,
    pub flame_ms: f64,
    pub fade_ms: f64,
    pub elapsed_ms: f64,
}

impl From<&Explosion> for ExplosionSnapshot {
    fn from(e: &Explosion) -> Self {
        Self {
            id: e.id,
            origin: e.origin,
            radius_m: e.radius_m,
            flame_ms: e.flame_ms,
            fade_ms: e.fade_ms,
            elapsed_ms: e.elapsed_ms,
        }
    }
}

impl From<&EmpBlast> for ExplosionSnapshot {
    fn from(e: &EmpBlast) -> Self {
        Self {
            id: e.id,
            origin: e.origin,
            radius_m: e.radius_m,
            flame_ms: e.flare_ms,
            fade_ms: e.fade_ms,
            elapsed_ms: e.elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockwaveSnapshot {
    pub id: u64,
    pub origin: Point,
    pub radius_m: f64,
}

impl From<&Shockwave> for ShockwaveSnapshot {
    fn from(s: &Shockwave) -> Self {
        Self {
            id: s.id,
            origin: s.origin,
            radius_m: s.radius_m,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub frame: u64,
    pub fps: u32,
    pub countdown: u32,
    pub winning_team: Option<TeamId>,
    pub map_name: Option<String>,
    pub map_units_per_meter: Option<i64>,
    pub ships: Vec<ShipSnapshot>,
    pub munitions: Vec<MunitionSnapshot>,
    pub explosions: Vec<ExplosionSnapshot>,
    pub emp_blasts: Vec<ExplosionSnapshot>,
    pub shockwaves: Vec<ShockwaveSnapshot>,
    pub ebeam_rays: Vec<EbeamRay>,
    pub kill_feed: Vec<KillFeedEntry>,
    pub ore_remaining: Vec<(FeatureId, f64)>,
}
