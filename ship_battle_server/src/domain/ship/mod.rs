// Ship aggregate: kinematics, resource pools and the subsystems drawing on them.

pub mod apu;
pub mod autopilot;
pub mod commands;
pub mod damage;
pub mod ebeam;
pub mod engine;
pub mod gravity_brake;
pub mod hull;
pub mod mining;
pub mod reaction_wheel;
pub mod scanner;
pub mod tubes;
pub mod upgrades;

pub use apu::Apu;
pub use autopilot::{AutopilotAction, AutopilotInputs, AutopilotProgram};
pub use commands::{ShipCommand, ShipCommandError};
pub use damage::{Damage, DeathStage, DeathVisual};
pub use ebeam::Ebeam;
pub use engine::{Engine, EngineState};
pub use gravity_brake::{BrakeMotion, GravityBrake};
pub use hull::Hull;
pub use mining::{Mining, OreHold};
pub use reaction_wheel::ReactionWheel;
pub use scanner::{
    LockState, MunitionReading, MunitionReadingKind, ReadingPayload, Readings, Scanner,
    ScannerMode, ScannerPower, ShipReading,
};
pub use tubes::{MunitionKind, TubeLaunch, Tubes};
pub use upgrades::{
    CoreUpgrade, Research, ShipUpgrade, UpgradeCost, UpgradeKind, UpgradeStatus,
};

use crate::domain::geometry::{
    Point, heading_to_point, heading_to_vector, resultant_vector, translate_point,
};
use crate::domain::ids::{FeatureId, PlayerId, ShipId, TeamId};
use crate::domain::map::GameMap;
use crate::domain::resources::ResourcePool;
use crate::domain::tuning::ShipTuning;
use std::collections::BTreeMap;
use tracing::info;

/// An in-progress timer exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipTimer {
    pub name: &'static str,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub id: ShipId,
    pub player_id: PlayerId,

    /// `None` once the team has been eliminated by players leaving.
    pub team_id: Option<TeamId>,

    pub designator: String,

    /// Map units.
    pub position: Point,

    /// Whole degrees, `[0, 360)`.
    pub heading: i32,

    /// Meters per second.
    pub velocity: (f64, f64),

    pub hull: Hull,
    pub battery: ResourcePool,
    pub fuel: ResourcePool,
    pub ore: OreHold,

    pub engine: Engine,
    pub apu: Apu,
    pub scanner: Scanner,
    pub ebeam: Ebeam,
    pub gravity_brake: GravityBrake,
    pub reaction_wheel: ReactionWheel,
    pub mining: Mining,
    pub tubes: Tubes,
    pub research: Research,
    pub autopilot: Option<AutopilotProgram>,
    pub damage: Damage,

    pub thermal_signature: i64,
    pub anti_radar_coating: i64,

    /// Station whose gravity field caught the ship; docked once stationary.
    pub docking_at: Option<FeatureId>,
    pub docked_at: Option<FeatureId>,

    /// Last frame this ship saw a catch at each station.
    pub station_catch_frames: BTreeMap<FeatureId, u64>,

    pub tuning: ShipTuning,
}

/// Inputs to [`Ship::spawn`].
#[derive(Debug, Clone)]
pub struct ShipSpawn {
    pub id: ShipId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub designator: String,
    pub position: Point,
    pub units_per_meter: i64,
    pub seconds_to_aflame: f64,
    pub seconds_to_explode: f64,
}

impl Ship {
    pub fn spawn(spawn: ShipSpawn, tuning: ShipTuning) -> Self {
        let upm = spawn.units_per_meter as f64;
        let hull = Hull::new(
            (tuning.hull.width_m * upm).round() as i64,
            (tuning.hull.length_m * upm).round() as i64,
        );
        Self {
            id: spawn.id,
            player_id: spawn.player_id,
            team_id: Some(spawn.team_id),
            designator: spawn.designator,
            position: spawn.position,
            heading: 0,
            velocity: (0.0, 0.0),
            hull,
            battery: ResourcePool::new(tuning.power.battery_start, tuning.power.battery_capacity),
            fuel: ResourcePool::new(tuning.power.fuel_start, tuning.power.fuel_capacity),
            ore: OreHold::default(),
            engine: Engine::default(),
            apu: Apu::default(),
            scanner: Scanner::default(),
            ebeam: Ebeam::default(),
            gravity_brake: GravityBrake::default(),
            reaction_wheel: ReactionWheel { online: true },
            mining: Mining::default(),
            tubes: Tubes::new(&tuning.tubes),
            research: Research::default(),
            autopilot: None,
            damage: Damage::new(spawn.seconds_to_aflame, spawn.seconds_to_explode),
            thermal_signature: 0,
            anti_radar_coating: 0,
            docking_at: None,
            docked_at: None,
            station_catch_frames: BTreeMap::new(),
            tuning,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.damage.is_alive()
    }

    pub fn is_stationary(&self) -> bool {
        self.velocity.0 == 0.0 && self.velocity.1 == 0.0
    }

    /// Total mass in kilograms.
    pub fn mass(&self) -> f64 {
        let h = &self.tuning.hull;
        (h.hull_mass_kg + h.pilot_mass_kg + h.battery_mass_kg + h.engine_mass_kg) as f64
            + self.ore.cargo_kg
            + self.fuel.level() as f64 / h.fuel_units_per_kg.max(1) as f64
    }

    pub fn nose(&self) -> Point {
        self.hull.nose_at(self.position)
    }

    pub fn outline(&self) -> [Point; 4] {
        self.hull.outline_at(self.position)
    }

    /// Rotates the ship and its hull. Callers check for the reaction wheel.
    pub fn set_heading(&mut self, heading: i32) {
        self.heading = heading.rem_euclid(360);
        self.hull.set_heading(self.heading);
    }

    /// Pushes the ship along `heading` by `delta_v` meters per second.
    pub fn push(&mut self, heading: f64, delta_v: f64) {
        let (dx, dy) = heading_to_vector(delta_v, heading);
        self.velocity.0 += dx;
        self.velocity.1 += dy;
    }

    /// Battery and fuel accounting for one tick, subsystem by subsystem.
    pub fn adjust_resources(&mut self, fps: u32, frame: u64) {
        let t = self.tuning;
        self.ebeam.tick(&t.ebeam, fps, &mut self.battery);
        self.mining.tick(&t.services, fps, &mut self.battery);

        let at_station = self.docked_at.is_some()
            && self.gravity_brake.is_deployed(&t.services)
            && self.is_stationary();
        self.mining
            .refuel(&t.services, fps, &mut self.fuel, &mut self.ore, at_station);

        self.scanner.tick(&t.scanner, fps, &mut self.battery);
        self.engine
            .tick(&t.engine, fps, frame, &mut self.battery, &mut self.fuel);
        self.apu.tick(&t.apu, fps, &mut self.battery, &mut self.fuel);
        self.reaction_wheel
            .tick(&t.services, fps, &mut self.battery);
    }

    /// Moves research along one tick; finished ship upgrades land in the tuning.
    pub fn advance_research(&mut self, fps: u32) {
        for upgrade in self.research.tick(fps, &mut self.tuning) {
            info!(ship = %self.id, %upgrade, "upgrade researched");
        }
    }

    pub fn advance_gravity_brake(&mut self, fps: u32) {
        self.gravity_brake.tick(&self.tuning.services, fps);
    }

    /// Integrates thrust and moves the ship one tick.
    pub fn calculate_physics(&mut self, fps: u32, units_per_meter: i64) {
        let fps_f = fps.max(1) as f64;

        if self.gravity_brake.active {
            self.velocity.0 = gravity_brake::bleed_velocity(self.velocity.0, fps);
            self.velocity.1 = gravity_brake::bleed_velocity(self.velocity.1, fps);
            if self.is_stationary() {
                self.gravity_brake.active = false;
                self.docked_at = self.docking_at.take();
                return;
            }
        } else if self.engine.is_lit() && self.docked_at.is_none() {
            let boost = if self.engine.boosted {
                self.tuning.engine.boost_multiple
            } else {
                1.0
            };
            let accel = self.tuning.engine.newtons * boost / self.mass() / fps_f;
            self.push(self.heading as f64, accel);
        }

        if self.is_stationary() {
            return;
        }
        let (speed, heading) = resultant_vector(self.velocity.0, self.velocity.1);
        let distance = (speed * units_per_meter as f64 / fps_f).round();
        self.position = translate_point(self.position, heading as f64, distance);
    }

    pub fn advance_thermal(&mut self, fps: u32) {
        let fps = fps.max(1) as f64;
        let t = &self.tuning;
        let mut delta = -t.services.thermal_dissipation_rate / fps;
        if self.engine.is_lit() {
            let boost = if self.engine.boosted {
                t.engine.boost_multiple
            } else {
                1.0
            };
            delta += boost * t.engine.thermal_rate / fps;
        }
        if self.ebeam.charging {
            delta += t.ebeam.thermal_rate / fps;
        }
        if self.apu.is_online() {
            delta += t.apu.thermal_rate / fps;
        }
        self.thermal_signature = ((self.thermal_signature as f64 + delta).round() as i64).max(0);
    }

    pub fn advance_damage(&mut self, frame: u64, fps: u32) -> Option<DeathVisual> {
        self.damage.advance(frame, fps)
    }

    /// Kills the ship and shuts every subsystem down. False if already dead.
    pub fn die(&mut self, frame: u64) -> bool {
        if !self.damage.die(frame) {
            return false;
        }
        self.engine.shut_down();
        self.scanner.shut_down();
        self.ebeam.shut_down();
        self.autopilot = None;
        self.gravity_brake.reset();
        self.mining.active = false;
        self.mining.fueling = false;
        self.mining.parked_at = None;
        self.tubes.pending = None;
        true
    }

    /// Wreck blows apart and stops dead.
    pub fn explode(&mut self) {
        self.damage.explode();
        self.velocity = (0.0, 0.0);
    }

    /// Electromagnetic pulse: everything off, battery drained (saturating).
    /// The brake arm collapses, releasing any station hold.
    pub fn emp(&mut self, battery_drain: i64) {
        self.engine.shut_down();
        self.apu.deactivate();
        self.scanner.shut_down();
        self.ebeam.shut_down();
        self.ebeam.charge = 0.0;
        self.reaction_wheel.deactivate();
        self.mining.active = false;
        self.mining.fueling = false;
        self.autopilot = None;
        self.gravity_brake.reset();
        self.docking_at = None;
        self.docked_at = None;
        self.battery.drain(battery_drain);
    }

    /// Heading the e-beam fires along: the lock bearing under lock-target
    /// autopilot, otherwise the ship heading.
    pub fn ebeam_heading(&self) -> i32 {
        if self.autopilot == Some(AutopilotProgram::LockTarget) {
            if let Some(reading) = self
                .scanner
                .lock
                .target()
                .filter(|_| self.scanner.is_locked())
                .and_then(|t| self.scanner.readings.ships.get(&t))
            {
                return reading.relative_heading;
            }
        }
        self.heading
    }

    pub fn run_autopilot(&mut self, map: Option<&GameMap>) {
        let Some(program) = self.autopilot.clone() else {
            return;
        };
        let lock_heading = if self.scanner.is_locked() {
            self.scanner
                .lock
                .target()
                .and_then(|t| self.scanner.readings.ships.get(&t))
                .map(|r| r.relative_heading)
        } else {
            None
        };
        let waypoint_heading = match &program {
            AutopilotProgram::Waypoint { feature_id } => map
                .and_then(|m| m.feature_position(feature_id))
                .map(|p| heading_to_point(self.position, p)),
            _ => None,
        };
        let inputs = AutopilotInputs {
            velocity: self.velocity,
            engine_online: self.engine.is_online(),
            lock_heading,
            waypoint_heading,
            hold_threshold_mps: self.tuning.services.position_hold_threshold_mps,
        };

        match autopilot::plan(&program, &inputs) {
            AutopilotAction::Hold => {}
            AutopilotAction::Steer { heading } => {
                if !self.steer(heading) {
                    self.disable_autopilot();
                }
            }
            AutopilotAction::SteerAndBurn { heading } => {
                if self.steer(heading) {
                    let _ = self.engine.light();
                } else {
                    self.disable_autopilot();
                }
            }
            AutopilotAction::Finish => {
                self.velocity = (0.0, 0.0);
                self.engine.unlight();
                self.autopilot = None;
            }
            AutopilotAction::Disengage => self.disable_autopilot(),
        }
    }

    fn steer(&mut self, heading: i32) -> bool {
        if !self.reaction_wheel.online {
            return false;
        }
        if heading != self.heading {
            self.set_heading(heading);
        }
        true
    }

    fn disable_autopilot(&mut self) {
        if self.autopilot == Some(AutopilotProgram::PositionHold) {
            self.engine.unlight();
        }
        self.autopilot = None;
    }

    /// Applies one player command. Dead ships ignore commands.
    pub fn apply_command(
        &mut self,
        command: &ShipCommand,
        map: Option<&GameMap>,
        frame: u64,
    ) -> Result<(), ShipCommandError> {
        if !self.is_alive() {
            return Ok(());
        }
        let t = self.tuning;
        match command {
            ShipCommand::SetHeading { heading } => {
                if self.autopilot.is_some() {
                    return Err(ShipCommandError::AutopilotEngaged);
                }
                if !(0..=359).contains(heading) {
                    return Err(ShipCommandError::InvalidHeading(*heading));
                }
                if !self.reaction_wheel.online {
                    return Err(ShipCommandError::ReactionWheelOffline);
                }
                if *heading != self.heading {
                    self.set_heading(*heading);
                }
            }
            ShipCommand::ActivateEngine => self.engine.activate(),
            ShipCommand::DeactivateEngine => {
                self.engine.deactivate();
                if self.autopilot == Some(AutopilotProgram::PositionHold) {
                    self.autopilot = None;
                }
            }
            ShipCommand::LightEngine => self.engine.light()?,
            ShipCommand::UnlightEngine => self.engine.unlight(),
            ShipCommand::BoostEngine => self.engine.boost()?,
            ShipCommand::ActivateApu => self.apu.activate(),
            ShipCommand::DeactivateApu => self.apu.deactivate(),
            ShipCommand::ActivateScanner => self.scanner.activate(),
            ShipCommand::DeactivateScanner => self.scanner.deactivate(),
            ShipCommand::SetScannerMode { mode } => self.scanner.set_mode(*mode),
            ShipCommand::SetScannerLockTarget { target } => self.scanner.set_lock_target(*target)?,
            ShipCommand::ChargeEbeam => self.ebeam.start_charging(),
            ShipCommand::PauseChargeEbeam => self.ebeam.pause_charging(),
            ShipCommand::FireEbeam => self.ebeam.fire(&t.ebeam)?,
            ShipCommand::SetEbeamAutofire { enabled } => self.ebeam.set_autofire(*enabled),
            ShipCommand::RunAutopilot { program } => {
                match program {
                    AutopilotProgram::PositionHold if !self.engine.is_online() => {
                        return Err(ShipCommandError::EngineOffline);
                    }
                    AutopilotProgram::LockTarget if !self.scanner.is_locked() => {
                        return Err(ShipCommandError::NoScannerLock);
                    }
                    AutopilotProgram::Waypoint { feature_id }
                        if map.and_then(|m| m.feature_position(feature_id)).is_none() =>
                    {
                        return Err(ShipCommandError::UnknownFeature(feature_id.clone()));
                    }
                    _ => {}
                }
                self.autopilot = Some(program.clone());
            }
            ShipCommand::DisableAutopilot => self.disable_autopilot(),
            ShipCommand::ExtendGravityBrake => self.gravity_brake.extend(&t.services),
            ShipCommand::RetractGravityBrake => {
                if !self.gravity_brake.is_moving() {
                    self.docked_at = None;
                    self.docking_at = None;
                    self.mining.fueling = false;
                }
                self.gravity_brake.retract();
            }
            ShipCommand::ActivateReactionWheel => {
                self.reaction_wheel.activate(&t.services, &mut self.battery)
            }
            ShipCommand::DeactivateReactionWheel => self.reaction_wheel.deactivate(),
            ShipCommand::StartMining => {
                if self.mining.parked_at.is_none() {
                    return Err(ShipCommandError::NotParked);
                }
                self.mining.active = true;
            }
            ShipCommand::StopMining => self.mining.stop(),
            ShipCommand::TradeOre => {
                if self.docked_at.is_none() {
                    return Err(ShipCommandError::NotDocked);
                }
                if self.ore.deposit_cargo() > 0.0 {
                    self.mining.last_ore_deposit_frame = Some(frame);
                }
            }
            ShipCommand::StartFueling => {
                if self.docked_at.is_none() {
                    return Err(ShipCommandError::NotDocked);
                }
                if !self.gravity_brake.is_deployed(&t.services) {
                    return Err(ShipCommandError::GravityBrakeNotDeployed);
                }
                self.mining.fueling = true;
            }
            ShipCommand::StopFueling => self.mining.fueling = false,
            ShipCommand::BuyMunition { kind } => {
                if self.docked_at.is_none() {
                    return Err(ShipCommandError::NotDocked);
                }
                self.tubes.buy(*kind, &t.tubes, &mut self.ore)?;
            }
            ShipCommand::LaunchMunition { kind, velocity } => {
                self.tubes.launch(*kind, *velocity, &t.tubes)?
            }
            ShipCommand::StartUpgrade { upgrade } => self.research.start(
                *upgrade,
                self.docked_at.is_some(),
                &mut self.battery,
                &mut self.ore,
            )?,
            ShipCommand::CancelUpgrade { upgrade } => {
                self.research
                    .cancel(*upgrade, &mut self.battery, &mut self.ore)?
            }
        }
        Ok(())
    }

    /// In-progress timers as name + percent pairs.
    pub fn timers(&self) -> Vec<ShipTimer> {
        let t = &self.tuning;
        [
            ("Engine", self.engine.startup_percent(&t.engine)),
            ("Scanner", self.scanner.startup_percent(&t.scanner)),
            ("Locking", self.scanner.lock_percent(&t.scanner)),
            ("E-beam charge", self.ebeam.charge_percent(&t.ebeam)),
            ("APU", self.apu.startup_percent(&t.apu)),
            ("Brake", self.gravity_brake.deploy_percent(&t.services)),
        ]
        .into_iter()
        .filter_map(|(name, percent)| percent.map(|percent| ShipTimer { name, percent }))
        .chain(
            self.research
                .progress()
                .map(|(kind, percent)| ShipTimer {
                    name: kind.name(),
                    percent,
                }),
        )
        .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_ship(id: u64, position: Point, upm: i64) -> Ship {
        Ship::spawn(
            ShipSpawn {
                id: ShipId(id),
                player_id: id,
                team_id: id as TeamId,
                designator: format!("TEST {id}"),
                position,
                units_per_meter: upm,
                seconds_to_aflame: 0.5,
                seconds_to_explode: 4.0,
            },
            ShipTuning::default(),
        )
    }

    #[test]
    fn when_coasting_then_position_moves_by_velocity_in_map_units() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.velocity = (0.0, 240.0);
        ship.calculate_physics(2, 10);
        assert_eq!(ship.position, Point::new(0, 1200));
        assert_eq!(ship.velocity, (0.0, 240.0));
    }

    #[test]
    fn when_engine_is_lit_then_thrust_accelerates_along_heading() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.engine.state = EngineState::Lit;
        ship.set_heading(90);
        let mass = ship.mass();
        ship.calculate_physics(1, 10);
        let expected = 28_000.0 / mass;
        assert!((ship.velocity.0 - expected).abs() < 1e-6);
        assert!(ship.velocity.1.abs() < 1e-6);
        assert!(ship.position.x > 0);
    }

    #[test]
    fn when_engine_starts_through_adjust_resources_then_budget_matches() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.tuning.engine.activation_rate = 2000.0;
        ship.reaction_wheel.online = false;
        ship.battery.set_level(5000);
        ship.apply_command(&ShipCommand::ActivateEngine, None, 0).unwrap();

        ship.adjust_resources(2, 0);
        ship.adjust_resources(2, 1);
        assert_eq!(ship.engine.state, EngineState::Starting { power_used: 2000 });
        ship.adjust_resources(2, 2);
        ship.adjust_resources(2, 3);
        assert_eq!(ship.engine.state, EngineState::Online);
        assert_eq!(ship.battery.level(), 5000 - 3050);
    }

    #[test]
    fn when_heading_is_invalid_or_wheel_offline_then_command_is_rejected() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        assert_eq!(
            ship.apply_command(&ShipCommand::SetHeading { heading: 360 }, None, 0),
            Err(ShipCommandError::InvalidHeading(360))
        );
        ship.apply_command(&ShipCommand::SetHeading { heading: 45 }, None, 0)
            .unwrap();
        assert_eq!(ship.heading, 45);

        ship.reaction_wheel.online = false;
        assert_eq!(
            ship.apply_command(&ShipCommand::SetHeading { heading: 50 }, None, 0),
            Err(ShipCommandError::ReactionWheelOffline)
        );
        assert_eq!(ship.heading, 45);
    }

    #[test]
    fn when_autopilot_is_engaged_then_manual_heading_is_refused() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.apply_command(
            &ShipCommand::RunAutopilot {
                program: AutopilotProgram::Prograde,
            },
            None,
            0,
        )
        .unwrap();
        assert_eq!(
            ship.apply_command(&ShipCommand::SetHeading { heading: 10 }, None, 0),
            Err(ShipCommandError::AutopilotEngaged)
        );
    }

    #[test]
    fn when_ship_is_dead_then_commands_are_ignored() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.engine.state = EngineState::Lit;
        ship.scanner.power = ScannerPower::Online;
        assert!(ship.die(5));
        assert_eq!(ship.engine.state, EngineState::Off);
        assert!(!ship.scanner.is_online());

        ship.apply_command(&ShipCommand::ActivateEngine, None, 6)
            .unwrap();
        assert_eq!(ship.engine.state, EngineState::Off);
        assert_eq!(ship.damage.died_on_frame, Some(5));
    }

    #[test]
    fn when_position_hold_runs_then_ship_burns_retrograde_then_stops() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.engine.state = EngineState::Online;
        ship.velocity = (0.0, 40.0);
        ship.apply_command(
            &ShipCommand::RunAutopilot {
                program: AutopilotProgram::PositionHold,
            },
            None,
            0,
        )
        .unwrap();
        ship.run_autopilot(None);
        assert_eq!(ship.heading, 180);
        assert!(ship.engine.is_lit());

        ship.velocity = (1.0, 2.0);
        ship.run_autopilot(None);
        assert_eq!(ship.velocity, (0.0, 0.0));
        assert!(!ship.engine.is_lit());
        assert_eq!(ship.autopilot, None);
    }

    #[test]
    fn when_thermal_sources_run_then_signature_rises_and_never_goes_negative() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.advance_thermal(10);
        assert_eq!(ship.thermal_signature, 0);

        ship.engine.state = EngineState::Lit;
        ship.apu = Apu::Online;
        ship.advance_thermal(10);
        // (600 + 300 - 400) / 10
        assert_eq!(ship.thermal_signature, 50);
    }

    #[test]
    fn when_emp_hits_then_systems_stop_and_battery_saturates() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.engine.state = EngineState::Lit;
        ship.apu = Apu::Online;
        ship.ebeam.charge = 9000.0;
        ship.battery.set_level(10_000);
        ship.emp(25_000);
        assert_eq!(ship.battery.level(), 0);
        assert_eq!(ship.engine.state, EngineState::Off);
        assert_eq!(ship.apu, Apu::Off);
        assert_eq!(ship.ebeam.charge, 0.0);
        assert!(!ship.reaction_wheel.online);
        assert!(ship.is_alive());
    }

    #[test]
    fn when_docked_ship_is_hit_by_emp_then_it_is_released_with_brake_retracted() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.gravity_brake.position = 100;
        ship.docked_at = Some("st-1".to_string());
        ship.mining.fueling = true;
        ship.emp(25_000);
        assert_eq!(ship.docked_at, None);
        assert_eq!(ship.docking_at, None);
        assert!(ship.gravity_brake.is_retracted());
        assert!(!ship.gravity_brake.is_moving());
        assert!(!ship.mining.fueling);

        let mut catching = test_ship(2, Point::new(0, 0), 10);
        catching.gravity_brake.active = true;
        catching.gravity_brake.motion = BrakeMotion::Extending;
        catching.docking_at = Some("st-1".to_string());
        catching.emp(100);
        assert!(!catching.gravity_brake.active);
        assert_eq!(catching.gravity_brake.motion, BrakeMotion::Idle);
        assert_eq!(catching.docking_at, None);
    }

    #[test]
    fn when_core_upgrade_is_requested_away_from_station_then_it_is_refused() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.ore.virtual_kg = 500.0;
        let upgrade = UpgradeKind::Core(CoreUpgrade::TitaniumAlloyHull);
        assert_eq!(
            ship.apply_command(&ShipCommand::StartUpgrade { upgrade }, None, 0),
            Err(ShipCommandError::NotDocked)
        );

        ship.docked_at = Some("st-1".to_string());
        ship.apply_command(&ShipCommand::StartUpgrade { upgrade }, None, 1)
            .unwrap();
        assert_eq!(ship.battery.level(), 20_000);
        assert_eq!(ship.ore.virtual_kg, 300.0);
        assert_eq!(
            ship.timers(),
            vec![ShipTimer {
                name: "Titanium Alloy Hull",
                percent: 0
            }]
        );
    }

    #[test]
    fn when_engine_upgrade_finishes_then_thrust_rises() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.battery.set_level(40_000);
        ship.ore.cargo_kg = 100.0;
        let upgrade = UpgradeKind::Ship(ShipUpgrade::EngineNewtons);
        ship.apply_command(&ShipCommand::StartUpgrade { upgrade }, None, 0)
            .unwrap();
        assert_eq!(ship.battery.level(), 0);
        for _ in 0..59 {
            ship.advance_research(2);
        }
        assert_eq!(ship.research.level(ShipUpgrade::EngineNewtons), 0);
        ship.advance_research(2);
        assert_eq!(ship.research.level(ShipUpgrade::EngineNewtons), 1);
        assert_eq!(ship.tuning.engine.newtons, 28_900.0);
        assert!(ship.timers().is_empty());
    }

    #[test]
    fn when_brake_is_active_then_ship_bleeds_speed_and_docks() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.gravity_brake.active = true;
        ship.docking_at = Some("st-1".to_string());
        ship.velocity = (0.0, 12.0);
        ship.calculate_physics(30, 10);
        assert_eq!(ship.velocity, (0.0, 7.0));
        assert!(ship.docked_at.is_none());
        ship.calculate_physics(30, 10);
        assert!(ship.is_stationary());
        assert_eq!(ship.docked_at.as_deref(), Some("st-1"));
        assert!(!ship.gravity_brake.active);
    }

    #[test]
    fn when_docked_then_cargo_trades_into_the_bank() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        ship.ore.cargo_kg = 120.0;
        assert_eq!(
            ship.apply_command(&ShipCommand::TradeOre, None, 3),
            Err(ShipCommandError::NotDocked)
        );
        ship.docked_at = Some("st-1".to_string());
        ship.apply_command(&ShipCommand::TradeOre, None, 4).unwrap();
        assert_eq!(ship.ore.virtual_kg, 120.0);
        assert_eq!(ship.ore.cargo_kg, 0.0);
        assert_eq!(ship.mining.last_ore_deposit_frame, Some(4));
    }

    #[test]
    fn when_timers_run_then_they_are_reported_by_name() {
        let mut ship = test_ship(1, Point::new(0, 0), 10);
        assert!(ship.timers().is_empty());
        ship.engine.state = EngineState::Starting { power_used: 1500 };
        ship.ebeam.charging = true;
        ship.ebeam.charge = 3000.0;
        let timers = ship.timers();
        assert_eq!(
            timers,
            vec![
                ShipTimer {
                    name: "Engine",
                    percent: 50
                },
                ShipTimer {
                    name: "E-beam charge",
                    percent: 25
                },
            ]
        );
    }
}
