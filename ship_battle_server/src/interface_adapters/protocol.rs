// Wire protocol DTOs and conversions for public game server messages.
// Internal service-to-service DTOs should live outside this module.

use crate::domain::effects::EbeamRay;
use crate::domain::geometry::Point;
use crate::domain::killfeed::{KillCause, KillFeedEntry};
use crate::domain::ship::scanner::{MunitionReading, MunitionReadingKind, ReadingPayload, ShipReading};
use crate::domain::ship::{CoreUpgrade, ShipUpgrade, UpgradeKind, UpgradeStatus};
use crate::domain::state::{ExplosionSnapshot, MunitionSnapshot, ShipSnapshot, ShockwaveSnapshot};
use crate::domain::{
    AutopilotProgram, CommandRejection, MunitionKind, PlayerDetails, ScannerMode, ShipCommand,
    ShipId,
};
use crate::use_cases::{FrameUpdate, RoomSummary};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Sent once on connect. Spectators receive frames but cannot command.
    Identity { player_id: String, spectator: bool },
    // One simulated frame.
    Frame(FrameDto),
    // Lobby-level changes: players, map, phase, countdown.
    Room(RoomSummaryDto),
    // The last client message could not be understood.
    CommandRejected { error: String },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Command(ShipCommandDto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerModeDto {
    Radar,
    Ir,
}

impl From<ScannerModeDto> for ScannerMode {
    fn from(mode: ScannerModeDto) -> Self {
        match mode {
            ScannerModeDto::Radar => ScannerMode::Radar,
            ScannerModeDto::Ir => ScannerMode::Ir,
        }
    }
}

impl From<ScannerMode> for ScannerModeDto {
    fn from(mode: ScannerMode) -> Self {
        match mode {
            ScannerMode::Radar => ScannerModeDto::Radar,
            ScannerMode::Ir => ScannerModeDto::Ir,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutopilotProgramDto {
    PositionHold,
    Prograde,
    Retrograde,
    LockTarget,
    Waypoint { feature_id: String },
}

impl From<AutopilotProgramDto> for AutopilotProgram {
    fn from(program: AutopilotProgramDto) -> Self {
        match program {
            AutopilotProgramDto::PositionHold => AutopilotProgram::PositionHold,
            AutopilotProgramDto::Prograde => AutopilotProgram::Prograde,
            AutopilotProgramDto::Retrograde => AutopilotProgram::Retrograde,
            AutopilotProgramDto::LockTarget => AutopilotProgram::LockTarget,
            AutopilotProgramDto::Waypoint { feature_id } => {
                AutopilotProgram::Waypoint { feature_id }
            }
        }
    }
}

impl From<&AutopilotProgram> for AutopilotProgramDto {
    fn from(program: &AutopilotProgram) -> Self {
        match program {
            AutopilotProgram::PositionHold => AutopilotProgramDto::PositionHold,
            AutopilotProgram::Prograde => AutopilotProgramDto::Prograde,
            AutopilotProgram::Retrograde => AutopilotProgramDto::Retrograde,
            AutopilotProgram::LockTarget => AutopilotProgramDto::LockTarget,
            AutopilotProgram::Waypoint { feature_id } => AutopilotProgramDto::Waypoint {
                feature_id: feature_id.clone(),
            },
        }
    }
}

/// One ship command, e.g. `{"ship_command":"set_heading","args":{"heading":90}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "ship_command", content = "args", rename_all = "snake_case")]
pub enum ShipCommandDto {
    SetHeading { heading: i32 },
    ActivateEngine,
    DeactivateEngine,
    LightEngine,
    UnlightEngine,
    BoostEngine,
    ActivateApu,
    DeactivateApu,
    ActivateScanner,
    DeactivateScanner,
    SetScannerMode { mode: ScannerModeDto },
    SetScannerLockTarget { ship_id: u64 },
    ChargeEbeam,
    PauseChargeEbeam,
    FireEbeam,
    RunAutopilot { program: AutopilotProgramDto },
    DisableAutopilot,
    ExtendGravityBrake,
    RetractGravityBrake,
    ActivateReactionWheel,
    DeactivateReactionWheel,
    StartMining,
    StopMining,
    TradeOre,
    StartFueling,
    StopFueling,
    BuyMagnetMine,
    BuyEmp,
    BuyHunterDrone,
    LaunchMagnetMine { velocity: i64 },
    LaunchEmp { velocity: i64 },
    LaunchHunterDrone { velocity: i64 },
    SetEbeamAutofire { enabled: bool },
    StartCoreUpgrade { upgrade: CoreUpgradeDto },
    CancelCoreUpgrade { upgrade: CoreUpgradeDto },
    StartShipUpgrade { upgrade: ShipUpgradeDto },
    CancelShipUpgrade { upgrade: ShipUpgradeDto },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreUpgradeDto {
    TitaniumAlloyHull,
    AdvancedElectronics,
    LiquidNitrogenCooling,
}

impl From<CoreUpgradeDto> for UpgradeKind {
    fn from(dto: CoreUpgradeDto) -> Self {
        UpgradeKind::Core(match dto {
            CoreUpgradeDto::TitaniumAlloyHull => CoreUpgrade::TitaniumAlloyHull,
            CoreUpgradeDto::AdvancedElectronics => CoreUpgrade::AdvancedElectronics,
            CoreUpgradeDto::LiquidNitrogenCooling => CoreUpgrade::LiquidNitrogenCooling,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipUpgradeDto {
    EngineNewtons,
    ScannerLockTraversal,
    RadarSensitivity,
    ScannerRange,
}

impl From<ShipUpgradeDto> for UpgradeKind {
    fn from(dto: ShipUpgradeDto) -> Self {
        UpgradeKind::Ship(match dto {
            ShipUpgradeDto::EngineNewtons => ShipUpgrade::EngineNewtons,
            ShipUpgradeDto::ScannerLockTraversal => ShipUpgrade::ScannerLockTraversal,
            ShipUpgradeDto::RadarSensitivity => ShipUpgrade::RadarSensitivity,
            ShipUpgradeDto::ScannerRange => ShipUpgrade::ScannerRange,
        })
    }
}

impl From<ShipCommandDto> for ShipCommand {
    fn from(dto: ShipCommandDto) -> Self {
        use ShipCommandDto as D;
        match dto {
            D::SetHeading { heading } => ShipCommand::SetHeading { heading },
            D::ActivateEngine => ShipCommand::ActivateEngine,
            D::DeactivateEngine => ShipCommand::DeactivateEngine,
            D::LightEngine => ShipCommand::LightEngine,
            D::UnlightEngine => ShipCommand::UnlightEngine,
            D::BoostEngine => ShipCommand::BoostEngine,
            D::ActivateApu => ShipCommand::ActivateApu,
            D::DeactivateApu => ShipCommand::DeactivateApu,
            D::ActivateScanner => ShipCommand::ActivateScanner,
            D::DeactivateScanner => ShipCommand::DeactivateScanner,
            D::SetScannerMode { mode } => ShipCommand::SetScannerMode { mode: mode.into() },
            D::SetScannerLockTarget { ship_id } => ShipCommand::SetScannerLockTarget {
                target: ShipId(ship_id),
            },
            D::ChargeEbeam => ShipCommand::ChargeEbeam,
            D::PauseChargeEbeam => ShipCommand::PauseChargeEbeam,
            D::FireEbeam => ShipCommand::FireEbeam,
            D::RunAutopilot { program } => ShipCommand::RunAutopilot {
                program: program.into(),
            },
            D::DisableAutopilot => ShipCommand::DisableAutopilot,
            D::ExtendGravityBrake => ShipCommand::ExtendGravityBrake,
            D::RetractGravityBrake => ShipCommand::RetractGravityBrake,
            D::ActivateReactionWheel => ShipCommand::ActivateReactionWheel,
            D::DeactivateReactionWheel => ShipCommand::DeactivateReactionWheel,
            D::StartMining => ShipCommand::StartMining,
            D::StopMining => ShipCommand::StopMining,
            D::TradeOre => ShipCommand::TradeOre,
            D::StartFueling => ShipCommand::StartFueling,
            D::StopFueling => ShipCommand::StopFueling,
            D::BuyMagnetMine => ShipCommand::BuyMunition {
                kind: MunitionKind::MagnetMine,
            },
            D::BuyEmp => ShipCommand::BuyMunition {
                kind: MunitionKind::Emp,
            },
            D::BuyHunterDrone => ShipCommand::BuyMunition {
                kind: MunitionKind::HunterDrone,
            },
            D::LaunchMagnetMine { velocity } => ShipCommand::LaunchMunition {
                kind: MunitionKind::MagnetMine,
                velocity,
            },
            D::LaunchEmp { velocity } => ShipCommand::LaunchMunition {
                kind: MunitionKind::Emp,
                velocity,
            },
            D::LaunchHunterDrone { velocity } => ShipCommand::LaunchMunition {
                kind: MunitionKind::HunterDrone,
                velocity,
            },
            D::SetEbeamAutofire { enabled } => ShipCommand::SetEbeamAutofire { enabled },
            D::StartCoreUpgrade { upgrade } => ShipCommand::StartUpgrade {
                upgrade: upgrade.into(),
            },
            D::CancelCoreUpgrade { upgrade } => ShipCommand::CancelUpgrade {
                upgrade: upgrade.into(),
            },
            D::StartShipUpgrade { upgrade } => ShipCommand::StartUpgrade {
                upgrade: upgrade.into(),
            },
            D::CancelShipUpgrade { upgrade } => ShipCommand::CancelUpgrade {
                upgrade: upgrade.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointDto {
    pub x: i64,
    pub y: i64,
}

impl From<Point> for PointDto {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub player_id: String,
    pub name: String,
    pub team: u32,
}

impl From<&PlayerDetails> for PlayerDto {
    fn from(p: &PlayerDetails) -> Self {
        Self {
            player_id: p.player_id.to_string(),
            name: p.name.clone(),
            team: p.team_id,
        }
    }
}

/// Lobby-level room state, shared by the socket feed and the HTTP API.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummaryDto {
    pub phase: String,
    pub frame: u64,
    pub countdown: u32,
    pub players: Vec<PlayerDto>,
    pub winning_team: Option<u32>,
    pub map_configured: bool,
}

impl From<&RoomSummary> for RoomSummaryDto {
    fn from(summary: &RoomSummary) -> Self {
        Self {
            phase: summary.phase.to_string(),
            frame: summary.frame,
            countdown: summary.countdown,
            players: summary.players.iter().map(PlayerDto::from).collect(),
            winning_team: summary.winning_team,
            map_configured: summary.map_configured,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipReadingDto {
    pub ship_id: u64,
    pub designator: String,
    pub position: PointDto,
    pub distance_m: i64,
    pub relative_heading: i32,
    pub heading: i32,
    pub alive: bool,
    pub exploded: bool,
    pub visual: bool,
    // "visual", "radar" or "ir".
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diameter_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermal_signature: Option<i64>,
}

impl ShipReadingDto {
    fn new(id: ShipId, r: &ShipReading) -> Self {
        let (source, diameter_m, thermal_signature) = match r.payload {
            ReadingPayload::Visual => ("visual", None, None),
            ReadingPayload::Radar { diameter_m } => ("radar", Some(diameter_m), None),
            ReadingPayload::Ir { thermal_signature } => ("ir", None, Some(thermal_signature)),
        };
        Self {
            ship_id: id.0,
            designator: r.designator.clone(),
            position: r.position.into(),
            distance_m: r.distance_m,
            relative_heading: r.relative_heading,
            heading: r.heading,
            alive: r.alive,
            exploded: r.exploded,
            visual: r.visual,
            source,
            diameter_m,
            thermal_signature,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MunitionReadingDto {
    pub munition_id: u64,
    pub kind: &'static str,
    pub position: PointDto,
    pub distance_m: i64,
    pub relative_heading: i32,
    pub visual: bool,
    pub exploded: bool,
}

impl MunitionReadingDto {
    fn new(id: u64, r: &MunitionReading) -> Self {
        let kind = match r.kind {
            MunitionReadingKind::MagnetMine => "magnet_mine",
            MunitionReadingKind::Emp => "emp",
            MunitionReadingKind::HunterDrone => "hunter_drone",
        };
        Self {
            munition_id: id,
            kind,
            position: r.position.into(),
            distance_m: r.distance_m,
            relative_heading: r.relative_heading,
            visual: r.visual,
            exploded: r.exploded,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerDto {
    pub name: &'static str,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeCostDto {
    pub ore_kg: f64,
    pub electricity: i64,
    pub seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeDto {
    pub slug: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub current_level: u8,
    pub max_level: u8,
    pub seconds_researched: Option<f64>,
    pub next_cost: Option<UpgradeCostDto>,
}

impl From<&UpgradeStatus> for UpgradeDto {
    fn from(status: &UpgradeStatus) -> Self {
        Self {
            slug: status.kind.slug(),
            name: status.kind.name(),
            kind: match status.kind {
                UpgradeKind::Core(_) => "core",
                UpgradeKind::Ship(_) => "ship",
            },
            current_level: status.current_level,
            max_level: status.max_level,
            seconds_researched: status.seconds_researched,
            next_cost: status.next_cost.map(|c| UpgradeCostDto {
                ore_kg: c.ore_kg,
                electricity: c.electricity,
                seconds: c.seconds,
            }),
        }
    }
}

/// Full ship state as broadcast to every subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct ShipDto {
    pub ship_id: u64,
    pub player_id: String,
    pub team: Option<u32>,
    pub designator: String,
    pub position: PointDto,
    pub heading: i32,
    pub velocity: (f64, f64),
    pub outline: [PointDto; 4],

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
    pub scanner_mode: ScannerModeDto,
    pub scanner_locked: bool,
    pub scanner_lock_target: Option<u64>,
    pub ebeam_charge: f64,
    pub ebeam_charging: bool,
    pub ebeam_firing: bool,
    pub ebeam_autofire: bool,
    pub gravity_brake_position: i64,
    pub autopilot: Option<AutopilotProgramDto>,
    pub thermal_signature: i64,

    pub docked_at: Option<String>,
    pub parked_at: Option<String>,
    pub mining: bool,
    pub fueling: bool,
    pub scouted_ore: Vec<OreDto>,

    pub magnet_mines_loaded: u32,
    pub emps_loaded: u32,
    pub hunter_drones_loaded: u32,
    pub last_tube_fire_frame: Option<u64>,

    pub ship_readings: Vec<ShipReadingDto>,
    pub munition_readings: Vec<MunitionReadingDto>,
    pub timers: Vec<TimerDto>,
    pub upgrades: Vec<UpgradeDto>,
}

impl From<&ShipSnapshot> for ShipDto {
    fn from(s: &ShipSnapshot) -> Self {
        Self {
            ship_id: s.id.0,
            player_id: s.player_id.to_string(),
            team: s.team_id,
            designator: s.designator.clone(),
            position: s.position.into(),
            heading: s.heading,
            velocity: s.velocity,
            outline: s.outline.map(PointDto::from),
            alive: s.alive,
            aflame: s.aflame,
            exploded: s.exploded,
            removed_from_map: s.removed_from_map,
            died_on_frame: s.died_on_frame,
            battery: s.battery,
            battery_capacity: s.battery_capacity,
            fuel: s.fuel,
            fuel_capacity: s.fuel_capacity,
            cargo_ore_kg: s.cargo_ore_kg,
            virtual_ore_kg: s.virtual_ore_kg,
            engine_online: s.engine_online,
            engine_lit: s.engine_lit,
            apu_online: s.apu_online,
            reaction_wheel_online: s.reaction_wheel_online,
            scanner_online: s.scanner_online,
            scanner_mode: s.scanner_mode.into(),
            scanner_locked: s.scanner_locked,
            scanner_lock_target: s.scanner_lock_target.map(|id| id.0),
            ebeam_charge: s.ebeam_charge,
            ebeam_charging: s.ebeam_charging,
            ebeam_firing: s.ebeam_firing,
            ebeam_autofire: s.ebeam_autofire,
            gravity_brake_position: s.gravity_brake_position,
            autopilot: s.autopilot.as_ref().map(AutopilotProgramDto::from),
            thermal_signature: s.thermal_signature,
            docked_at: s.docked_at.clone(),
            parked_at: s.parked_at.clone(),
            mining: s.mining,
            fueling: s.fueling,
            scouted_ore: s
                .scouted_ore
                .iter()
                .map(|(id, kg)| OreDto {
                    feature_id: id.clone(),
                    ore_kg: *kg,
                })
                .collect(),
            magnet_mines_loaded: s.magnet_mines_loaded,
            emps_loaded: s.emps_loaded,
            hunter_drones_loaded: s.hunter_drones_loaded,
            last_tube_fire_frame: s.last_tube_fire_frame,
            ship_readings: s
                .readings
                .ships
                .iter()
                .map(|(id, r)| ShipReadingDto::new(*id, r))
                .collect(),
            munition_readings: s
                .readings
                .munitions
                .iter()
                .map(|(id, r)| MunitionReadingDto::new(id.0, r))
                .collect(),
            timers: s
                .timers
                .iter()
                .map(|t| TimerDto {
                    name: t.name,
                    percent: t.percent,
                })
                .collect(),
            upgrades: s.upgrades.iter().map(UpgradeDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OreDto {
    pub feature_id: String,
    pub ore_kg: f64,
}

fn munition_kind_name(kind: MunitionKind) -> &'static str {
    match kind {
        MunitionKind::MagnetMine => "magnet_mine",
        MunitionKind::Emp => "emp",
        MunitionKind::HunterDrone => "hunter_drone",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MunitionDto {
    pub munition_id: u64,
    pub kind: &'static str,
    pub launched_by: u64,
    pub position: PointDto,
    pub velocity: (f64, f64),
    pub heading: Option<i32>,
    pub armed: bool,
    pub percent_armed: u8,
    pub target: Option<u64>,
}

impl From<&MunitionSnapshot> for MunitionDto {
    fn from(m: &MunitionSnapshot) -> Self {
        Self {
            munition_id: m.id.0,
            kind: munition_kind_name(m.kind),
            launched_by: m.launched_by.0,
            position: m.position.into(),
            velocity: m.velocity,
            heading: m.heading,
            armed: m.armed,
            percent_armed: m.percent_armed,
            target: m.target.map(|id| id.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplosionDto {
    pub id: u64,
    pub origin: PointDto,
    pub radius_m: f64,
    pub flame_ms: f64,
    pub fade_ms: f64,
    pub elapsed_ms: f64,
}

impl From<&ExplosionSnapshot> for ExplosionDto {
    fn from(e: &ExplosionSnapshot) -> Self {
        Self {
            id: e.id,
            origin: e.origin.into(),
            radius_m: e.radius_m,
            flame_ms: e.flame_ms,
            fade_ms: e.fade_ms,
            elapsed_ms: e.elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShockwaveDto {
    pub id: u64,
    pub origin: PointDto,
    pub radius_m: f64,
}

impl From<&ShockwaveSnapshot> for ShockwaveDto {
    fn from(s: &ShockwaveSnapshot) -> Self {
        Self {
            id: s.id,
            origin: s.origin.into(),
            radius_m: s.radius_m,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EbeamRayDto {
    pub ship_id: u64,
    pub start: PointDto,
    pub heading: i32,
    pub hit: Option<u64>,
}

impl From<&EbeamRay> for EbeamRayDto {
    fn from(r: &EbeamRay) -> Self {
        Self {
            ship_id: r.ship_id.0,
            start: r.start.into(),
            heading: r.heading,
            hit: r.hit.map(|id| id.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KillFeedDto {
    pub victim: u64,
    pub victim_designator: String,
    pub cause: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shooter: Option<u64>,
    pub created_frame: u64,
}

impl From<&KillFeedEntry> for KillFeedDto {
    fn from(k: &KillFeedEntry) -> Self {
        let (cause, shooter) = match k.cause {
            KillCause::Ebeam { shooter } => ("ebeam", Some(shooter.0)),
            KillCause::MapBoundary => ("map_boundary", None),
            KillCause::StationCollision => ("station_collision", None),
            KillCause::OreMineCollision => ("ore_mine_collision", None),
            KillCause::MagnetMine => ("magnet_mine", None),
            KillCause::HunterDrone => ("hunter_drone", None),
            KillCause::Shockwave => ("shockwave", None),
            KillCause::Abandoned => ("abandoned", None),
        };
        Self {
            victim: k.victim.0,
            victim_designator: k.victim_designator.clone(),
            cause,
            shooter,
            created_frame: k.created_frame,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectionDto {
    pub player_id: String,
    pub command: &'static str,
    pub error: String,
}

impl From<&CommandRejection> for RejectionDto {
    fn from(r: &CommandRejection) -> Self {
        Self {
            player_id: r.player_id.to_string(),
            command: r.command,
            error: r.error.to_string(),
        }
    }
}

/// One frame as sent to clients.
#[derive(Debug, Clone, Serialize)]
pub struct FrameDto {
    pub frame: u64,
    pub phase: String,
    pub fps: u32,
    pub winning_team: Option<u32>,
    pub map_name: Option<String>,
    pub map_units_per_meter: Option<i64>,
    pub ships: Vec<ShipDto>,
    pub munitions: Vec<MunitionDto>,
    pub explosions: Vec<ExplosionDto>,
    pub emp_blasts: Vec<ExplosionDto>,
    pub shockwaves: Vec<ShockwaveDto>,
    pub ebeam_rays: Vec<EbeamRayDto>,
    pub kill_feed: Vec<KillFeedDto>,
    pub ore_remaining: Vec<OreDto>,
    pub rejections: Vec<RejectionDto>,
}

impl From<FrameUpdate> for FrameDto {
    fn from(update: FrameUpdate) -> Self {
        let s = update.snapshot;
        Self {
            frame: s.frame,
            phase: s.phase.to_string(),
            fps: s.fps,
            winning_team: s.winning_team,
            map_name: s.map_name,
            map_units_per_meter: s.map_units_per_meter,
            ships: s.ships.iter().map(ShipDto::from).collect(),
            munitions: s.munitions.iter().map(MunitionDto::from).collect(),
            explosions: s.explosions.iter().map(ExplosionDto::from).collect(),
            emp_blasts: s.emp_blasts.iter().map(ExplosionDto::from).collect(),
            shockwaves: s.shockwaves.iter().map(ShockwaveDto::from).collect(),
            ebeam_rays: s.ebeam_rays.iter().map(EbeamRayDto::from).collect(),
            kill_feed: s.kill_feed.iter().map(KillFeedDto::from).collect(),
            ore_remaining: s
                .ore_remaining
                .into_iter()
                .map(|(feature_id, ore_kg)| OreDto { feature_id, ore_kg })
                .collect(),
            rejections: update.rejections.iter().map(RejectionDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_command_has_args_then_they_map_onto_the_ship_command() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"Command","data":{"ship_command":"set_heading","args":{"heading":270}}}"#,
        )
        .expect("valid command");
        let ClientMessage::Command(dto) = msg;
        assert_eq!(ShipCommand::from(dto), ShipCommand::SetHeading { heading: 270 });
    }

    #[test]
    fn when_command_has_no_args_then_tag_alone_is_enough() {
        let dto: ShipCommandDto =
            serde_json::from_str(r#"{"ship_command":"buy_emp"}"#).expect("valid command");
        assert_eq!(
            ShipCommand::from(dto),
            ShipCommand::BuyMunition {
                kind: MunitionKind::Emp
            }
        );
    }

    #[test]
    fn when_autopilot_waypoint_is_sent_then_feature_id_survives() {
        let dto: ShipCommandDto = serde_json::from_str(
            r#"{"ship_command":"run_autopilot","args":{"program":{"waypoint":{"feature_id":"st-1"}}}}"#,
        )
        .expect("valid command");
        assert_eq!(
            ShipCommand::from(dto),
            ShipCommand::RunAutopilot {
                program: AutopilotProgram::Waypoint {
                    feature_id: "st-1".to_string()
                }
            }
        );
    }

    #[test]
    fn when_wire_name_matches_command_name_then_names_agree() {
        let cases = [
            (r#"{"ship_command":"launch_hunter_drone","args":{"velocity":40}}"#, "launch_hunter_drone"),
            (r#"{"ship_command":"set_scanner_mode","args":{"mode":"ir"}}"#, "set_scanner_mode"),
            (r#"{"ship_command":"set_scanner_lock_target","args":{"ship_id":4}}"#, "set_scanner_lock_target"),
            (r#"{"ship_command":"extend_gravity_brake"}"#, "extend_gravity_brake"),
            (r#"{"ship_command":"set_ebeam_autofire","args":{"enabled":true}}"#, "set_ebeam_autofire"),
            (r#"{"ship_command":"start_core_upgrade","args":{"upgrade":"titanium_alloy_hull"}}"#, "start_core_upgrade"),
            (r#"{"ship_command":"cancel_ship_upgrade","args":{"upgrade":"scanner_range"}}"#, "cancel_ship_upgrade"),
        ];
        for (json, name) in cases {
            let dto: ShipCommandDto = serde_json::from_str(json).expect("valid command");
            assert_eq!(ShipCommand::from(dto).name(), name);
        }
    }

    #[test]
    fn when_ship_upgrade_is_started_then_slug_maps_onto_the_upgrade() {
        let dto: ShipCommandDto = serde_json::from_str(
            r#"{"ship_command":"start_ship_upgrade","args":{"upgrade":"radar_sensitivity"}}"#,
        )
        .expect("valid command");
        assert_eq!(
            ShipCommand::from(dto),
            ShipCommand::StartUpgrade {
                upgrade: UpgradeKind::Ship(ShipUpgrade::RadarSensitivity)
            }
        );
    }

    #[test]
    fn when_upgrade_status_is_serialized_then_kind_and_cost_are_flat() {
        let status = UpgradeStatus {
            kind: UpgradeKind::Core(CoreUpgrade::AdvancedElectronics),
            current_level: 0,
            max_level: 1,
            seconds_researched: Some(12.5),
            next_cost: Some(CoreUpgrade::AdvancedElectronics.cost()),
        };
        let json = serde_json::to_value(UpgradeDto::from(&status)).expect("serializable");
        assert_eq!(json["slug"], "advanced_electronics");
        assert_eq!(json["kind"], "core");
        assert_eq!(json["seconds_researched"], 12.5);
        assert_eq!(json["next_cost"]["electricity"], 30000);
    }

    #[test]
    fn when_command_name_is_unknown_then_parsing_fails() {
        let parsed = serde_json::from_str::<ClientMessage>(
            r#"{"type":"Command","data":{"ship_command":"self_destruct"}}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn when_identity_is_serialized_then_it_uses_the_tagged_layout() {
        let msg = ServerMessage::Identity {
            player_id: "42".to_string(),
            spectator: false,
        };
        let json = serde_json::to_value(&msg).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({"type": "Identity", "data": {"player_id": "42", "spectator": false}})
        );
    }
}
