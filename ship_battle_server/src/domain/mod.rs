// Domain layer: the deterministic simulation. No async, no serialization.

pub mod coord_cache;
pub mod designator;
pub mod effects;
pub mod errors;
pub mod game;
pub mod geometry;
pub mod ids;
pub mod killfeed;
pub mod map;
pub mod munitions;
pub mod resources;
pub mod ship;
pub mod state;
pub mod systems;
pub mod tuning;

pub use errors::GameError;
pub use game::{
    CommandError, CommandRejection, FrameCommand, FrameReport, Game, GameConfig, GamePhase,
    PlayerDetails,
};
pub use ids::{FeatureId, MunitionId, PlayerId, ShipId, TeamId};
pub use map::{FeatureSpec, MapSpec, MiningLocationSpec};
pub use ship::{AutopilotProgram, MunitionKind, ScannerMode, ShipCommand, ShipCommandError};
pub use state::GameSnapshot;
