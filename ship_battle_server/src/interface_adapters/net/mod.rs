// Network adapter modules split by external client sockets vs internal HTTP routes.

pub mod client;
pub mod internal;

pub use client::{spawn_room_serializer, ws_handler};
pub use internal::{
    add_player_handler, create_room_handler, delete_room_handler, get_room_handler,
    health_handler, list_rooms_handler, remove_player_handler, set_map_handler,
    start_room_handler,
};
