// Game orchestrator: phase machine, registration and the fixed per-tick pipeline.

use super::coord_cache::CoordCache;
use super::designator;
use super::effects::{BlastSpec, Effects};
use super::errors::GameError;
use super::ids::{FeatureId, PlayerId, ShipId, TeamId};
use super::killfeed::{KillCause, KillFeed, KillFeedEntry};
use super::map::{GameMap, MapSpec};
use super::munitions::Munitions;
use super::ship::{DeathVisual, Ship, ShipCommand, ShipCommandError, ShipSpawn};
use super::state::{ExplosionSnapshot, GameSnapshot, MunitionSnapshot, ShipSnapshot, ShockwaveSnapshot};
use super::systems::explosions::{advance_explosions, advance_shockwaves, register_blasts};
use super::systems::munitions::{
    MunitionWorld, advance_emps, advance_hunter_drones, advance_magnet_mines,
};
use super::systems::scanner::update_scanner_readings;
use super::systems::stations::{
    advance_mining, check_gravity_brake_catch, check_ore_parking, update_scouted_ore,
};
use super::systems::weapons::{fire_ebeams, launch_munitions, resolve_collisions};
use super::systems::{FrameEvents, Kill};
use super::tuning::{GameTuning, MunitionTuning, ShipTuning};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Lobby,
    Starting,
    Live,
    Complete,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Lobby => "lobby",
            GamePhase::Starting => "starting",
            GamePhase::Live => "live",
            GamePhase::Complete => "complete",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a game needs at construction.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Seeds the game RNG; equal seeds and command streams replay identically.
    pub seed: u64,
    pub fps: u32,
    pub game: GameTuning,
    pub ship: ShipTuning,
    pub munitions: MunitionTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            fps: 30,
            game: GameTuning::default(),
            ship: ShipTuning::default(),
            munitions: MunitionTuning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDetails {
    pub player_id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
}

/// One command in a tick's batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameCommand {
    pub player_id: PlayerId,
    pub command: ShipCommand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    UnknownPlayer(PlayerId),
    Ship(ShipCommandError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownPlayer(id) => write!(f, "player {id} has no ship in this game"),
            CommandError::Ship(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CommandError {}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandRejection {
    pub player_id: PlayerId,
    pub command: &'static str,
    pub error: CommandError,
}

/// What one `run_frame` call did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// The frame that was simulated.
    pub frame: u64,
    pub rejections: Vec<CommandRejection>,
    pub kills: Vec<Kill>,
}

pub struct Game {
    config: GameConfig,
    rng: ChaCha8Rng,
    phase: GamePhase,
    frame: u64,
    countdown: u32,

    /// Registration order; ships spawn in this order.
    players: Vec<PlayerDetails>,
    player_ships: BTreeMap<PlayerId, ShipId>,
    ships: BTreeMap<ShipId, Ship>,

    map: Option<GameMap>,
    ore_remaining: BTreeMap<FeatureId, f64>,

    munitions: Munitions,
    effects: Effects,
    kill_feed: KillFeed,
    winning_team: Option<TeamId>,
    cache: CoordCache,
    next_id: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            phase: GamePhase::Lobby,
            frame: 0,
            countdown: 0,
            players: Vec::new(),
            player_ships: BTreeMap::new(),
            ships: BTreeMap::new(),
            map: None,
            ore_remaining: BTreeMap::new(),
            munitions: Munitions::default(),
            effects: Effects::default(),
            kill_feed: KillFeed::default(),
            winning_team: None,
            cache: CoordCache::new(),
            next_id: 1,
        }
    }

    fn require_phase(&self, expected: GamePhase, operation: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        info!(from = %self.phase, to = %phase, frame = self.frame, "game phase changed");
        self.phase = phase;
    }

    fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn register_player(&mut self, details: PlayerDetails) -> Result<(), GameError> {
        self.require_phase(GamePhase::Lobby, "register a player")?;
        if self.players.iter().any(|p| p.player_id == details.player_id) {
            return Err(GameError::PlayerAlreadyRegistered(details.player_id));
        }
        let max_players = self.config.game.max_players;
        if self.players.len() >= max_players {
            return Err(GameError::RoomFull { max_players });
        }
        info!(player_id = details.player_id, team_id = details.team_id, "player registered");
        self.players.push(details);
        Ok(())
    }

    /// Removes a player. Outside the lobby their ship dies with them, and a
    /// team left without players loses its claim on the match. A started
    /// game with nobody left completes; an empty lobby stays open.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        let Some(index) = self.players.iter().position(|p| p.player_id == player_id) else {
            return Err(GameError::UnknownPlayer(player_id));
        };
        let leaving = self.players.remove(index);
        info!(player_id, phase = %self.phase, "player left");

        if self.phase != GamePhase::Lobby {
            let team_empty = !self.players.iter().any(|p| p.team_id == leaving.team_id);
            if let Some(ship) = self
                .player_ships
                .get(&player_id)
                .and_then(|id| self.ships.get_mut(id))
            {
                if ship.die(self.frame) {
                    self.kill_feed.push(KillFeedEntry {
                        victim: ship.id,
                        victim_designator: ship.designator.clone(),
                        cause: KillCause::Abandoned,
                        created_frame: self.frame,
                    });
                }
                if team_empty {
                    ship.team_id = None;
                }
            }
        }

        if self.players.is_empty() && matches!(self.phase, GamePhase::Starting | GamePhase::Live) {
            self.set_phase(GamePhase::Complete);
        }
        Ok(())
    }

    pub fn set_map(&mut self, spec: MapSpec) -> Result<(), GameError> {
        self.require_phase(GamePhase::Lobby, "configure the map")?;
        if self.map.is_some() {
            return Err(GameError::MapAlreadyConfigured);
        }
        let map = GameMap::from_spec(spec, self.config.game.default_map_units_per_meter)?;
        self.ore_remaining = map
            .ore_mines
            .iter()
            .map(|m| (m.feature.id.clone(), m.starting_ore_kg))
            .collect();
        info!(map = %map.name, units_per_meter = map.units_per_meter, "map configured");
        self.map = Some(map);
        Ok(())
    }

    pub fn map_is_configured(&self) -> bool {
        self.map.is_some()
    }

    /// Spawns one ship per player at the map's spawn points and starts the
    /// countdown.
    pub fn advance_to_starting(&mut self) -> Result<(), GameError> {
        self.require_phase(GamePhase::Lobby, "start the game")?;
        if self.players.len() < 2 {
            return Err(GameError::NotEnoughPlayers {
                registered: self.players.len(),
            });
        }
        let Some(map) = self.map.as_ref() else {
            return Err(GameError::MapNotConfigured);
        };
        if map.spawn_points.len() < self.players.len() {
            return Err(GameError::NotEnoughSpawnPoints {
                players: self.players.len(),
                spawn_points: map.spawn_points.len(),
            });
        }
        let designators = designator::assign(self.players.len(), &mut self.rng)?;

        let spawn_points = map.spawn_points.clone();
        let units_per_meter = map.units_per_meter;
        let players = self.players.clone();
        for ((player, designator), position) in players.iter().zip(designators).zip(spawn_points) {
            let id = ShipId(self.take_id());
            let seconds_to_aflame = self.rng.gen_range(0.0..=1.0);
            let seconds_to_explode = self.rng.gen_range(3.0..=6.0);
            let mut ship = Ship::spawn(
                ShipSpawn {
                    id,
                    player_id: player.player_id,
                    team_id: player.team_id,
                    designator,
                    position,
                    units_per_meter,
                    seconds_to_aflame,
                    seconds_to_explode,
                },
                self.config.ship,
            );
            ship.mining.scouted_ore = self.ore_remaining.clone();
            debug!(ship = %id, player_id = player.player_id, designator = %ship.designator, "ship spawned");
            self.player_ships.insert(player.player_id, id);
            self.ships.insert(id, ship);
        }

        self.countdown = self.config.game.countdown_seconds.max(1);
        self.set_phase(GamePhase::Starting);
        Ok(())
    }

    /// Counts the start countdown down by one. Goes live on reaching zero.
    pub fn decr_starting_countdown(&mut self) -> Result<u32, GameError> {
        self.require_phase(GamePhase::Starting, "count down")?;
        if self.countdown == 0 {
            return Err(GameError::CountdownFinished);
        }
        self.countdown -= 1;
        if self.countdown == 0 {
            self.set_phase(GamePhase::Live);
            self.frame += 1;
        }
        Ok(self.countdown)
    }

    /// Runs one tick. Commands are applied in order; a bad command is
    /// reported and skipped without aborting the batch.
    pub fn run_frame(&mut self, commands: Vec<FrameCommand>) -> Result<FrameReport, GameError> {
        self.require_phase(GamePhase::Live, "run a frame")?;
        let Some(map) = self.map.as_ref() else {
            return Err(GameError::MapNotConfigured);
        };
        let fps = self.config.fps;
        let frame = self.frame;
        let upm = map.units_per_meter;
        let mut events = FrameEvents::default();

        self.cache.clear();
        self.effects.ebeam_rays.clear();

        for ship in self.ships.values_mut() {
            if ship.advance_damage(frame, fps) == Some(DeathVisual::NewExplosion) {
                ship.explode();
                let fiery = ship.fuel.level() > ship.tuning.hull.fiery_explosion_fuel_level;
                events.blasts.push(BlastSpec::ship(ship.id, ship.position, fiery));
            }
            if !ship.is_alive() {
                ship.calculate_physics(fps, upm);
                continue;
            }
            ship.advance_gravity_brake(fps);
            ship.adjust_resources(fps, frame);
            ship.advance_research(fps);
            ship.calculate_physics(fps, upm);
            ship.advance_thermal(fps);
        }

        update_scanner_readings(&mut self.ships, &self.munitions, &mut self.cache, upm, fps);

        for ship in self.ships.values_mut().filter(|s| s.is_alive()) {
            ship.run_autopilot(Some(map));
        }

        let mut rejections = Vec::new();
        for FrameCommand { player_id, command } in commands {
            let result = match self
                .player_ships
                .get(&player_id)
                .and_then(|id| self.ships.get_mut(id))
            {
                None => Err(CommandError::UnknownPlayer(player_id)),
                Some(ship) => ship
                    .apply_command(&command, Some(map), frame)
                    .map_err(CommandError::Ship),
            };
            if let Err(error) = result {
                debug!(player_id, command = command.name(), %error, "command rejected");
                rejections.push(CommandRejection {
                    player_id,
                    command: command.name(),
                    error,
                });
            }
        }

        resolve_collisions(&mut self.ships, map, frame, &mut events);
        fire_ebeams(
            &mut self.ships,
            map.bounds,
            fps,
            frame,
            &mut self.effects.ebeam_rays,
            &mut events,
        );
        launch_munitions(
            &mut self.ships,
            &mut self.munitions,
            &mut self.next_id,
            &self.config.munitions,
            upm,
            frame,
        );
        check_gravity_brake_catch(&mut self.ships, map, &mut self.cache, frame);
        check_ore_parking(&mut self.ships, map, &mut self.cache);
        advance_mining(&mut self.ships, &mut self.ore_remaining, fps);
        update_scouted_ore(&mut self.ships, map, &self.ore_remaining);

        let tuning = self.config.munitions;
        let mut world = MunitionWorld {
            ships: &mut self.ships,
            units_per_meter: upm,
            fps,
            frame,
        };
        advance_magnet_mines(&mut world, &mut self.munitions, &tuning.magnet_mine, &mut events);
        advance_emps(&mut world, &mut self.munitions, &tuning.emp, &mut events);
        advance_hunter_drones(&mut world, &mut self.munitions, &tuning.hunter_drone, &mut events);

        register_blasts(
            &mut self.effects,
            &events.blasts,
            &events.emp_blasts,
            &mut self.next_id,
        );
        advance_explosions(&mut self.effects, &mut self.ships, fps);
        advance_shockwaves(
            &mut self.effects,
            &mut self.ships,
            &self.config.game,
            upm,
            fps,
            frame,
            &mut events,
        );

        for kill in &events.kills {
            let designator = self
                .ships
                .get(&kill.victim)
                .map(|s| s.designator.clone())
                .unwrap_or_default();
            info!(ship = %kill.victim, %designator, cause = ?kill.cause, frame, "ship destroyed");
            self.kill_feed.push(KillFeedEntry {
                victim: kill.victim,
                victim_designator: designator,
                cause: kill.cause,
                created_frame: frame,
            });
        }
        let lifetime_frames = u64::from(fps) * u64::from(self.config.game.kill_feed_lifetime_seconds);
        self.kill_feed.purge(frame, lifetime_frames);

        self.check_for_winner();
        self.frame += 1;

        Ok(FrameReport {
            frame,
            rejections,
            kills: events.kills,
        })
    }

    fn check_for_winner(&mut self) {
        let teams: BTreeSet<TeamId> = self
            .ships
            .values()
            .filter(|s| s.is_alive())
            .filter_map(|s| s.team_id)
            .collect();
        match teams.len() {
            0 => {
                info!(frame = self.frame, "no team left standing");
                self.set_phase(GamePhase::Complete);
            }
            1 => {
                self.winning_team = teams.first().copied();
                info!(winning_team = ?self.winning_team, frame = self.frame, "game won");
                self.set_phase(GamePhase::Complete);
            }
            _ => {}
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn fps(&self) -> u32 {
        self.config.fps
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn winning_team(&self) -> Option<TeamId> {
        self.winning_team
    }

    pub fn players(&self) -> &[PlayerDetails] {
        &self.players
    }

    pub fn map(&self) -> Option<&GameMap> {
        self.map.as_ref()
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    pub fn ship_for_player(&self, player_id: PlayerId) -> Option<&Ship> {
        self.player_ships
            .get(&player_id)
            .and_then(|id| self.ships.get(id))
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values()
    }

    pub fn munitions(&self) -> &Munitions {
        &self.munitions
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn kill_feed(&self) -> &KillFeed {
        &self.kill_feed
    }

    pub fn ore_remaining(&self, feature_id: &str) -> Option<f64> {
        self.ore_remaining.get(feature_id).copied()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let tuning = &self.config.munitions;
        let munitions = self
            .munitions
            .magnet_mines
            .values()
            .map(|m| MunitionSnapshot::magnet_mine(m, tuning))
            .chain(self.munitions.emps.values().map(|e| MunitionSnapshot::emp(e, tuning)))
            .chain(
                self.munitions
                    .hunter_drones
                    .values()
                    .map(|d| MunitionSnapshot::hunter_drone(d, tuning)),
            )
            .collect();
        GameSnapshot {
            phase: self.phase,
            frame: self.frame,
            fps: self.config.fps,
            countdown: self.countdown,
            winning_team: self.winning_team,
            map_name: self.map.as_ref().map(|m| m.name.clone()),
            map_units_per_meter: self.map.as_ref().map(|m| m.units_per_meter),
            ships: self.ships.values().map(ShipSnapshot::from).collect(),
            munitions,
            explosions: self.effects.explosions.iter().map(ExplosionSnapshot::from).collect(),
            emp_blasts: self.effects.emp_blasts.iter().map(ExplosionSnapshot::from).collect(),
            shockwaves: self.effects.shockwaves.iter().map(ShockwaveSnapshot::from).collect(),
            ebeam_rays: self.effects.ebeam_rays.clone(),
            kill_feed: self.kill_feed.entries().to_vec(),
            ore_remaining: self
                .ore_remaining
                .iter()
                .map(|(id, kg)| (id.clone(), *kg))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::map::{FeatureSpec, MiningLocationSpec};

    fn map_spec() -> MapSpec {
        MapSpec {
            name: "test belt".to_string(),
            meters_x: 10_000,
            meters_y: 10_000,
            units_per_meter: Some(10),
            spawn_points: vec![(1000, 1000), (1000, 9000), (9000, 1000), (9000, 9000)],
            space_stations: vec![FeatureSpec {
                id: "st-1".to_string(),
                name: "Station".to_string(),
                position_m: (5000, 5000),
                service_radius_m: 100.0,
                collision_radius_m: 10.0,
            }],
            mining_locations: vec![MiningLocationSpec {
                feature: FeatureSpec {
                    id: "ore-1".to_string(),
                    name: "Ore".to_string(),
                    position_m: (2000, 5000),
                    service_radius_m: 100.0,
                    collision_radius_m: 10.0,
                },
                starting_ore_kg: 1500.0,
            }],
        }
    }

    fn player(player_id: PlayerId, team_id: TeamId) -> PlayerDetails {
        PlayerDetails {
            player_id,
            name: format!("pilot {player_id}"),
            team_id,
        }
    }

    fn live_game(seed: u64) -> Game {
        let mut game = Game::new(GameConfig {
            seed,
            ..GameConfig::default()
        });
        game.register_player(player(1, 1)).unwrap();
        game.register_player(player(2, 2)).unwrap();
        game.set_map(map_spec()).unwrap();
        game.advance_to_starting().unwrap();
        while game.phase() == GamePhase::Starting {
            game.decr_starting_countdown().unwrap();
        }
        game
    }

    #[test]
    fn when_lobby_is_configured_then_game_counts_down_into_live() {
        let mut game = Game::new(GameConfig::default());
        game.register_player(player(1, 1)).unwrap();
        game.register_player(player(2, 2)).unwrap();
        game.set_map(map_spec()).unwrap();
        game.advance_to_starting().unwrap();

        assert_eq!(game.phase(), GamePhase::Starting);
        assert_eq!(game.countdown(), 5);
        assert_eq!(game.ships().count(), 2);

        for expected in (1..5).rev() {
            assert_eq!(game.decr_starting_countdown(), Ok(expected));
        }
        assert_eq!(game.decr_starting_countdown(), Ok(0));
        assert_eq!(game.phase(), GamePhase::Live);
        assert_eq!(game.frame(), 1);
        assert!(matches!(
            game.decr_starting_countdown(),
            Err(GameError::WrongPhase { .. })
        ));
    }

    #[test]
    fn when_registration_is_invalid_then_it_is_rejected() {
        let mut game = Game::new(GameConfig::default());
        game.register_player(player(1, 1)).unwrap();
        assert_eq!(
            game.register_player(player(1, 2)),
            Err(GameError::PlayerAlreadyRegistered(1))
        );
        assert_eq!(
            game.advance_to_starting(),
            Err(GameError::NotEnoughPlayers { registered: 1 })
        );
        game.register_player(player(2, 2)).unwrap();
        assert_eq!(game.advance_to_starting(), Err(GameError::MapNotConfigured));

        for id in 3..=8 {
            game.register_player(player(id, 1)).unwrap();
        }
        assert_eq!(
            game.register_player(player(9, 1)),
            Err(GameError::RoomFull { max_players: 8 })
        );
        game.set_map(map_spec()).unwrap();
        assert_eq!(game.set_map(map_spec()), Err(GameError::MapAlreadyConfigured));
        assert_eq!(
            game.advance_to_starting(),
            Err(GameError::NotEnoughSpawnPoints {
                players: 8,
                spawn_points: 4
            })
        );
        assert_eq!(game.phase(), GamePhase::Lobby);
        assert_eq!(game.ships().count(), 0);
    }

    #[test]
    fn when_game_is_live_then_lobby_operations_are_rejected() {
        let mut game = live_game(1);
        assert!(matches!(
            game.register_player(player(9, 9)),
            Err(GameError::WrongPhase {
                phase: GamePhase::Live,
                ..
            })
        ));
        assert!(matches!(game.set_map(map_spec()), Err(GameError::WrongPhase { .. })));
    }

    #[test]
    fn when_frames_run_then_counter_advances_and_ships_spawn_apart() {
        let mut game = live_game(1);
        let report = game.run_frame(vec![]).unwrap();
        assert_eq!(report.frame, 1);
        assert_eq!(game.frame(), 2);

        let positions: Vec<_> = game.ships().map(|s| s.position).collect();
        assert_ne!(positions[0], positions[1]);
        let designators: BTreeSet<_> = game.ships().map(|s| s.designator.clone()).collect();
        assert_eq!(designators.len(), 2);
    }

    #[test]
    fn when_command_is_for_unknown_player_then_only_that_command_fails() {
        let mut game = live_game(1);
        let report = game
            .run_frame(vec![
                FrameCommand {
                    player_id: 42,
                    command: ShipCommand::ActivateEngine,
                },
                FrameCommand {
                    player_id: 1,
                    command: ShipCommand::ActivateEngine,
                },
                FrameCommand {
                    player_id: 2,
                    command: ShipCommand::SetHeading { heading: 400 },
                },
            ])
            .unwrap();

        assert_eq!(report.rejections.len(), 2);
        assert_eq!(report.rejections[0].error, CommandError::UnknownPlayer(42));
        assert_eq!(report.rejections[1].command, "set_heading");
        assert!(game.ship_for_player(1).unwrap().engine.is_starting());
    }

    #[test]
    fn when_one_team_is_wiped_out_then_the_other_wins_on_the_next_check() {
        let mut game = live_game(3);
        game.run_frame(vec![]).unwrap();

        let victim = game.player_ships[&2];
        let frame = game.frame;
        game.ships.get_mut(&victim).unwrap().die(frame);
        assert_eq!(game.winning_team(), None);
        assert_eq!(game.phase(), GamePhase::Live);

        game.run_frame(vec![]).unwrap();
        assert_eq!(game.winning_team(), Some(1));
        assert_eq!(game.phase(), GamePhase::Complete);
        assert!(game.run_frame(vec![]).is_err());
    }

    #[test]
    fn when_player_leaves_then_ship_dies_and_empty_game_completes() {
        let mut game = live_game(4);
        game.remove_player(2).unwrap();

        let ship = game.ship_for_player(2).unwrap();
        assert!(!ship.is_alive());
        assert_eq!(ship.team_id, None);
        assert_eq!(game.kill_feed().entries()[0].cause, KillCause::Abandoned);

        game.run_frame(vec![]).unwrap();
        assert_eq!(game.winning_team(), Some(1));

        game.remove_player(1).unwrap();
        assert_eq!(game.phase(), GamePhase::Complete);
        assert_eq!(game.remove_player(1), Err(GameError::UnknownPlayer(1)));
    }

    #[test]
    fn when_player_leaves_the_lobby_then_nothing_else_changes() {
        let mut game = Game::new(GameConfig::default());
        game.register_player(player(1, 1)).unwrap();
        game.register_player(player(2, 2)).unwrap();
        game.remove_player(1).unwrap();
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.phase(), GamePhase::Lobby);

        game.remove_player(2).unwrap();
        assert_eq!(game.phase(), GamePhase::Lobby);
    }

    #[test]
    fn when_ship_drifts_off_the_map_then_kill_feed_records_it() {
        let mut game = live_game(5);
        let id = game.player_ships[&1];
        {
            let ship = game.ships.get_mut(&id).unwrap();
            ship.position.x = 5;
            ship.velocity = (-20.0, 0.0);
        }
        let report = game.run_frame(vec![]).unwrap();

        assert_eq!(report.kills.len(), 1);
        assert_eq!(report.kills[0].cause, KillCause::MapBoundary);
        assert_eq!(game.kill_feed().entries()[0].victim, id);
        assert_eq!(game.effects().explosions.len(), 1);
        assert_eq!(game.winning_team(), Some(2));
    }

    #[test]
    fn when_seeds_match_then_games_replay_identically() {
        let script = || {
            vec![
                FrameCommand {
                    player_id: 1,
                    command: ShipCommand::ActivateEngine,
                },
                FrameCommand {
                    player_id: 2,
                    command: ShipCommand::ActivateScanner,
                },
            ]
        };
        let mut a = live_game(77);
        let mut b = live_game(77);
        for _ in 0..90 {
            a.run_frame(script()).unwrap();
            b.run_frame(script()).unwrap();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn when_starting_then_scouted_ore_is_seeded_from_the_map() {
        let game = live_game(1);
        let ship = game.ship_for_player(1).unwrap();
        assert_eq!(ship.mining.scouted_ore.get("ore-1"), Some(&1500.0));
        assert_eq!(game.ore_remaining("ore-1"), Some(1500.0));
    }
}
