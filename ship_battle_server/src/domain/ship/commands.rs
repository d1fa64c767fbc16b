use super::autopilot::AutopilotProgram;
use super::scanner::ScannerMode;
use super::tubes::MunitionKind;
use super::upgrades::UpgradeKind;
use crate::domain::ids::{FeatureId, ShipId};
use std::fmt;

/// Everything a player can ask of their ship.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipCommand {
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
    SetScannerMode { mode: ScannerMode },
    SetScannerLockTarget { target: ShipId },
    ChargeEbeam,
    PauseChargeEbeam,
    FireEbeam,
    SetEbeamAutofire { enabled: bool },
    RunAutopilot { program: AutopilotProgram },
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
    BuyMunition { kind: MunitionKind },
    LaunchMunition { kind: MunitionKind, velocity: i64 },
    StartUpgrade { upgrade: UpgradeKind },
    CancelUpgrade { upgrade: UpgradeKind },
}

impl ShipCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ShipCommand::SetHeading { .. } => "set_heading",
            ShipCommand::ActivateEngine => "activate_engine",
            ShipCommand::DeactivateEngine => "deactivate_engine",
            ShipCommand::LightEngine => "light_engine",
            ShipCommand::UnlightEngine => "unlight_engine",
            ShipCommand::BoostEngine => "boost_engine",
            ShipCommand::ActivateApu => "activate_apu",
            ShipCommand::DeactivateApu => "deactivate_apu",
            ShipCommand::ActivateScanner => "activate_scanner",
            ShipCommand::DeactivateScanner => "deactivate_scanner",
            ShipCommand::SetScannerMode { .. } => "set_scanner_mode",
            ShipCommand::SetScannerLockTarget { .. } => "set_scanner_lock_target",
            ShipCommand::ChargeEbeam => "charge_ebeam",
            ShipCommand::PauseChargeEbeam => "pause_charge_ebeam",
            ShipCommand::FireEbeam => "fire_ebeam",
            ShipCommand::SetEbeamAutofire { .. } => "set_ebeam_autofire",
            ShipCommand::RunAutopilot { .. } => "run_autopilot",
            ShipCommand::DisableAutopilot => "disable_autopilot",
            ShipCommand::ExtendGravityBrake => "extend_gravity_brake",
            ShipCommand::RetractGravityBrake => "retract_gravity_brake",
            ShipCommand::ActivateReactionWheel => "activate_reaction_wheel",
            ShipCommand::DeactivateReactionWheel => "deactivate_reaction_wheel",
            ShipCommand::StartMining => "start_mining",
            ShipCommand::StopMining => "stop_mining",
            ShipCommand::TradeOre => "trade_ore",
            ShipCommand::StartFueling => "start_fueling",
            ShipCommand::StopFueling => "stop_fueling",
            ShipCommand::BuyMunition { kind } => match kind {
                MunitionKind::MagnetMine => "buy_magnet_mine",
                MunitionKind::Emp => "buy_emp",
                MunitionKind::HunterDrone => "buy_hunter_drone",
            },
            ShipCommand::LaunchMunition { kind, .. } => match kind {
                MunitionKind::MagnetMine => "launch_magnet_mine",
                MunitionKind::Emp => "launch_emp",
                MunitionKind::HunterDrone => "launch_hunter_drone",
            },
            ShipCommand::StartUpgrade { upgrade } => match upgrade {
                UpgradeKind::Core(_) => "start_core_upgrade",
                UpgradeKind::Ship(_) => "start_ship_upgrade",
            },
            ShipCommand::CancelUpgrade { upgrade } => match upgrade {
                UpgradeKind::Core(_) => "cancel_core_upgrade",
                UpgradeKind::Ship(_) => "cancel_ship_upgrade",
            },
        }
    }
}

/// Why a command was refused. The ship is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ShipCommandError {
    InvalidHeading(i32),
    AutopilotEngaged,
    ReactionWheelOffline,
    EngineOffline,
    EngineNotLit,
    ScannerOffline,
    AlreadyLocking,
    TargetNotInReadings(ShipId),
    NoScannerLock,
    InsufficientCharge { charge: i64, required: i64 },
    UnknownFeature(FeatureId),
    NotParked,
    NotDocked,
    GravityBrakeNotDeployed,
    TubesFull,
    TubeBusy,
    NoneLoaded(MunitionKind),
    InsufficientOre { required_kg: f64, available_kg: f64 },
    InsufficientPower { required: i64, available: i64 },
    UpgradeComplete(UpgradeKind),
    AlreadyResearching(UpgradeKind),
    NotResearching(UpgradeKind),
    MissingCoreUpgrade(UpgradeKind),
}

impl fmt::Display for ShipCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipCommandError::InvalidHeading(h) => write!(f, "heading {h} is outside 0..=359"),
            ShipCommandError::AutopilotEngaged => write!(f, "autopilot is engaged"),
            ShipCommandError::ReactionWheelOffline => write!(f, "reaction wheel is offline"),
            ShipCommandError::EngineOffline => write!(f, "engine is offline"),
            ShipCommandError::EngineNotLit => write!(f, "engine is not lit"),
            ShipCommandError::ScannerOffline => write!(f, "scanner is offline"),
            ShipCommandError::AlreadyLocking => write!(f, "scanner is already acquiring a lock"),
            ShipCommandError::TargetNotInReadings(id) => {
                write!(f, "{id} is not in scanner readings")
            }
            ShipCommandError::NoScannerLock => write!(f, "scanner has no lock"),
            ShipCommandError::InsufficientCharge { charge, required } => {
                write!(f, "e-beam charge {charge} is below {required}")
            }
            ShipCommandError::UnknownFeature(id) => write!(f, "no map feature named {id}"),
            ShipCommandError::NotParked => write!(f, "not parked at an ore mine"),
            ShipCommandError::NotDocked => write!(f, "not docked at a station"),
            ShipCommandError::GravityBrakeNotDeployed => write!(f, "gravity brake is not deployed"),
            ShipCommandError::TubesFull => write!(f, "all tubes are loaded"),
            ShipCommandError::TubeBusy => write!(f, "a launch is already queued"),
            ShipCommandError::NoneLoaded(kind) => write!(f, "no {kind} loaded"),
            ShipCommandError::InsufficientOre {
                required_kg,
                available_kg,
            } => write!(f, "needs {required_kg} kg ore, {available_kg} kg available"),
            ShipCommandError::InsufficientPower {
                required,
                available,
            } => write!(f, "needs {required} battery power, {available} available"),
            ShipCommandError::UpgradeComplete(u) => write!(f, "{u} is fully researched"),
            ShipCommandError::AlreadyResearching(u) => write!(f, "{u} is already being researched"),
            ShipCommandError::NotResearching(u) => write!(f, "{u} is not being researched"),
            ShipCommandError::MissingCoreUpgrade(u) => write!(f, "requires core upgrade {u}"),
        }
    }
}

impl std::error::Error for ShipCommandError {}
