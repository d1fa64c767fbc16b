// Use-case level inputs/outputs for the room loop.

use crate::domain::{
    CommandRejection, FrameCommand, GameError, GamePhase, GameSnapshot, MapSpec, PlayerDetails,
    PlayerId, TeamId,
};
use tokio::sync::oneshot;

pub type Reply = oneshot::Sender<Result<(), GameError>>;

/// Everything the outside world can ask of a room task.
#[derive(Debug)]
pub enum RoomEvent {
    AddPlayer { details: PlayerDetails, reply: Reply },
    RemovePlayer { player_id: PlayerId, reply: Reply },
    SetMap { map: MapSpec, reply: Reply },
    Start { reply: Reply },
    // Queued for the next live frame; never answered directly.
    Command(FrameCommand),
}

/// One simulated frame as seen by subscribers.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub snapshot: GameSnapshot,
    pub rejections: Vec<CommandRejection>,
}

/// Lobby-level view of a room. Published on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub phase: GamePhase,
    pub frame: u64,
    pub countdown: u32,
    pub players: Vec<PlayerDetails>,
    pub winning_team: Option<TeamId>,
    pub map_configured: bool,
}

impl Default for RoomSummary {
    fn default() -> Self {
        Self {
            phase: GamePhase::Lobby,
            frame: 0,
            countdown: 0,
            players: Vec::new(),
            winning_team: None,
            map_configured: false,
        }
    }
}

impl RoomSummary {
    /// True when anything other than the frame counter differs.
    pub fn differs_beyond_frame(&self, other: &RoomSummary) -> bool {
        self.phase != other.phase
            || self.countdown != other.countdown
            || self.players != other.players
            || self.winning_team != other.winning_team
            || self.map_configured != other.map_configured
    }
}
