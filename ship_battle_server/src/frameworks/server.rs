// Framework bootstrap for the game server runtime.

use crate::domain::GameConfig;
use crate::frameworks::config;
use crate::interface_adapters::net::{
    add_player_handler, create_room_handler, delete_room_handler, get_room_handler,
    health_handler, list_rooms_handler, remove_player_handler, set_map_handler,
    start_room_handler, ws_handler,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{RoomRegistry, RoomSettings};

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/rooms", post(create_room_handler).get(list_rooms_handler))
        .route(
            "/rooms/{room_id}",
            get(get_room_handler).delete(delete_room_handler),
        )
        .route("/rooms/{room_id}/players", post(add_player_handler))
        .route(
            "/rooms/{room_id}/players/{player_id}",
            delete(remove_player_handler),
        )
        .route("/rooms/{room_id}/map", put(set_map_handler))
        .route("/rooms/{room_id}/start", post(start_room_handler))
        .with_state(state)
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let app = router(build_state());

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    let settings = RoomSettings {
        input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
        frame_broadcast_capacity: config::FRAME_BROADCAST_CAPACITY,
        game: GameConfig {
            fps: config::tick_rate(),
            ..GameConfig::default()
        },
        seed: config::game_seed(),
    };
    tracing::debug!(
        fps = settings.game.fps,
        fixed_seed = ?settings.seed,
        "room settings configured"
    );

    Arc::new(AppState {
        room_registry: Arc::new(RoomRegistry::new(settings)),
    })
}
