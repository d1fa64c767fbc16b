use crate::use_cases::RoomRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Every live room, keyed by the id the surrounding service chose.
    pub room_registry: Arc<RoomRegistry>,
}
