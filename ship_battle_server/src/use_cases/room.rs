// Room orchestration for spawning and managing game tasks.

use super::game::room_task;
use super::types::{FrameUpdate, Reply, RoomEvent, RoomSummary};
use crate::domain::{
    FrameCommand, Game, GameConfig, GameError, GamePhase, MapSpec, PlayerDetails, PlayerId,
};
use axum::extract::ws::Utf8Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, Notify, RwLock, broadcast, mpsc, oneshot, watch};
use tracing::info;

/// Shared configuration for spawning room tasks.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    /// Capacity for inbound room events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast frame updates.
    pub frame_broadcast_capacity: usize,
    /// Base configuration for every new game. Its fps also sets the tick rate.
    pub game: GameConfig,
    /// Fixed seed for every room. `None` draws a fresh seed per room.
    pub seed: Option<u64>,
}

impl RoomSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.game.fps.max(1)))
    }
}

/// Errors returned by room registry and handle operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomError {
    /// Room already exists and cannot be re-created.
    AlreadyExists,
    NotFound,
    /// The room task has stopped.
    Closed,
    /// The game refused the operation.
    Rejected(GameError),
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::AlreadyExists => write!(f, "room already exists"),
            RoomError::NotFound => write!(f, "room not found"),
            RoomError::Closed => write!(f, "room is closed"),
            RoomError::Rejected(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for RoomError {}

/// Channel ends the creator must hand to a serializer so subscribers see
/// frames. Once every sender here is dropped the frame feed closes.
pub struct RoomFeed {
    pub frames_rx: broadcast::Receiver<FrameUpdate>,
    pub frame_bytes_tx: broadcast::Sender<Utf8Bytes>,
    pub frame_latest_tx: watch::Sender<Utf8Bytes>,
}

/// Per-room channels and connection bookkeeping.
#[derive(Clone)]
pub struct RoomHandle {
    /// Identifier clients use to target this room.
    pub room_id: Arc<str>,
    /// Sender for events into the room task.
    pub events_tx: mpsc::Sender<RoomEvent>,
    /// Template receiver; call `resubscribe` for a live feed of serialized frames.
    frame_bytes_rx: Arc<broadcast::Receiver<Utf8Bytes>>,
    /// Latest serialized frame for lag recovery.
    pub frame_latest_rx: watch::Receiver<Utf8Bytes>,
    /// Lobby-level summary. Closes when the room task exits.
    pub summary_rx: watch::Receiver<RoomSummary>,
    shutdown: Arc<Notify>,
    /// Active socket per player: ownership token and the signal that evicts it.
    connections: Arc<Mutex<HashMap<PlayerId, (u64, Arc<Notify>)>>>,
}

impl RoomHandle {
    pub fn subscribe_frames(&self) -> broadcast::Receiver<Utf8Bytes> {
        self.frame_bytes_rx.resubscribe()
    }

    pub fn summary(&self) -> RoomSummary {
        self.summary_rx.borrow().clone()
    }

    pub fn phase(&self) -> GamePhase {
        self.summary_rx.borrow().phase
    }

    pub fn is_player(&self, player_id: PlayerId) -> bool {
        self.summary_rx
            .borrow()
            .players
            .iter()
            .any(|p| p.player_id == player_id)
    }

    async fn request(&self, make: impl FnOnce(Reply) -> RoomEvent) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.events_tx
            .send(make(reply))
            .await
            .map_err(|_| RoomError::Closed)?;
        rx.await
            .map_err(|_| RoomError::Closed)?
            .map_err(RoomError::Rejected)
    }

    pub async fn add_player(&self, details: PlayerDetails) -> Result<(), RoomError> {
        self.request(|reply| RoomEvent::AddPlayer { details, reply })
            .await
    }

    pub async fn remove_player(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.request(|reply| RoomEvent::RemovePlayer { player_id, reply })
            .await
    }

    pub async fn set_map(&self, map: MapSpec) -> Result<(), RoomError> {
        self.request(|reply| RoomEvent::SetMap { map, reply }).await
    }

    pub async fn start(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomEvent::Start { reply }).await
    }

    /// Queues a command for the next frame without waiting.
    pub fn try_send_command(
        &self,
        command: FrameCommand,
    ) -> Result<(), TrySendError<RoomEvent>> {
        self.events_tx.try_send(RoomEvent::Command(command))
    }

    /// Makes `token` the owner of the player's slot. Any previous owner is
    /// signalled to disconnect.
    pub async fn register_or_replace_player_connection(
        &self,
        player_id: PlayerId,
        token: u64,
    ) -> Arc<Notify> {
        let shutdown = Arc::new(Notify::new());
        let mut connections = self.connections.lock().await;
        if let Some((_, previous)) = connections.insert(player_id, (token, shutdown.clone())) {
            previous.notify_one();
        }
        shutdown
    }

    pub async fn unregister_player_connection_if_owner(&self, player_id: PlayerId, token: u64) {
        let mut connections = self.connections.lock().await;
        if connections
            .get(&player_id)
            .is_some_and(|(owner, _)| *owner == token)
        {
            connections.remove(&player_id);
        }
    }
}

/// Thread-safe registry for active rooms.
#[derive(Debug)]
pub struct RoomRegistry {
    /// Global settings applied to newly created rooms.
    settings: RoomSettings,
    /// Map of room id to active handle.
    rooms: RwLock<HashMap<String, RoomHandle>>,
}

impl fmt::Debug for RoomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomHandle")
            .field("room_id", &self.room_id)
            .finish_non_exhaustive()
    }
}

impl RoomRegistry {
    pub fn new(settings: RoomSettings) -> Self {
        Self {
            settings,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a room and spawns its task. The returned feed must be wired to
    /// a serializer before frames reach subscribers.
    pub async fn create_room(&self, room_id: String) -> Result<(RoomHandle, RoomFeed), RoomError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room_id) {
            return Err(RoomError::AlreadyExists);
        }

        let (events_tx, events_rx) =
            mpsc::channel::<RoomEvent>(self.settings.input_channel_capacity);
        let (frame_tx, frames_rx) =
            broadcast::channel::<FrameUpdate>(self.settings.frame_broadcast_capacity);
        let (frame_bytes_tx, frame_bytes_rx) =
            broadcast::channel::<Utf8Bytes>(self.settings.frame_broadcast_capacity);
        let (frame_latest_tx, frame_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
        let (summary_tx, summary_rx) = watch::channel(RoomSummary::default());
        let shutdown = Arc::new(Notify::new());

        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let config = GameConfig {
            seed,
            ..self.settings.game
        };
        let room_id: Arc<str> = Arc::from(room_id.as_str());
        info!(%room_id, seed, "room created");

        tokio::spawn(room_task(
            room_id.clone(),
            Game::new(config),
            events_rx,
            frame_tx,
            summary_tx,
            shutdown.clone(),
            self.settings.tick_interval(),
        ));

        let handle = RoomHandle {
            room_id: room_id.clone(),
            events_tx,
            frame_bytes_rx: Arc::new(frame_bytes_rx),
            frame_latest_rx,
            summary_rx,
            shutdown,
            connections: Arc::new(Mutex::new(HashMap::new())),
        };
        rooms.insert(room_id.to_string(), handle.clone());

        Ok((
            handle,
            RoomFeed {
                frames_rx,
                frame_bytes_tx,
                frame_latest_tx,
            },
        ))
    }

    /// Returns a room handle for the provided id, if it exists.
    pub async fn get_room(&self, room_id: &str) -> Option<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned()
    }

    /// Drops the room and tells its task to stop.
    pub async fn remove_room(&self, room_id: &str) -> Result<(), RoomError> {
        let removed = self.rooms.write().await.remove(room_id);
        match removed {
            Some(room) => {
                room.shutdown.notify_one();
                info!(room_id, "room removed");
                Ok(())
            }
            None => Err(RoomError::NotFound),
        }
    }

    pub async fn room_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rooms.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}
