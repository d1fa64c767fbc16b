// Use cases layer: room lifecycle and the per-room tick loop.

pub mod game;
pub mod room;
pub mod types;

pub use room::{RoomError, RoomFeed, RoomHandle, RoomRegistry, RoomSettings};
pub use types::{FrameUpdate, RoomEvent, RoomSummary};
