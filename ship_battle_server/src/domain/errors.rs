use super::game::GamePhase;
use super::ids::PlayerId;
use std::fmt;

/// Rejected game operations. A rejected operation leaves the game untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    WrongPhase {
        operation: &'static str,
        phase: GamePhase,
    },
    PlayerAlreadyRegistered(PlayerId),
    UnknownPlayer(PlayerId),
    RoomFull {
        max_players: usize,
    },
    MapAlreadyConfigured,
    MapNotConfigured,
    InvalidMap(String),
    NotEnoughPlayers {
        registered: usize,
    },
    NotEnoughSpawnPoints {
        players: usize,
        spawn_points: usize,
    },
    CountdownFinished,
    DesignatorsExhausted {
        requested: usize,
        available: usize,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::WrongPhase { operation, phase } => {
                write!(f, "cannot {operation} while the game is {phase}")
            }
            GameError::PlayerAlreadyRegistered(id) => {
                write!(f, "player {id} is already registered")
            }
            GameError::UnknownPlayer(id) => write!(f, "player {id} is not in this game"),
            GameError::RoomFull { max_players } => {
                write!(f, "game is full ({max_players} players)")
            }
            GameError::MapAlreadyConfigured => write!(f, "map is already configured"),
            GameError::MapNotConfigured => write!(f, "map is not configured"),
            GameError::InvalidMap(reason) => write!(f, "invalid map: {reason}"),
            GameError::NotEnoughPlayers { registered } => {
                write!(f, "at least 2 players are required, {registered} registered")
            }
            GameError::NotEnoughSpawnPoints {
                players,
                spawn_points,
            } => write!(
                f,
                "{players} players need spawn points but the map has {spawn_points}"
            ),
            GameError::CountdownFinished => write!(f, "countdown already reached zero"),
            GameError::DesignatorsExhausted {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} designators but only {available} exist"
            ),
        }
    }
}

impl std::error::Error for GameError {}
