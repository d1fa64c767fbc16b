use crate::domain::{FrameCommand, GamePhase, PlayerId, ShipCommand};
use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::protocol::{ClientMessage, FrameDto, RoomSummaryDto, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::rand_id;
use crate::use_cases::{FrameUpdate, RoomFeed, RoomHandle, RoomSummary};

use axum::{
    Error, Json,
    extract::{
        Query, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, broadcast, watch};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct RoomQuery {
    #[serde(default)]
    room_id: Option<String>,
    // Absent or unregistered ids connect as spectators.
    #[serde(default)]
    player_id: Option<PlayerId>,
}

pub async fn frame_serializer(
    mut frames_rx: broadcast::Receiver<FrameUpdate>,
    frame_bytes_tx: broadcast::Sender<Utf8Bytes>,
    frame_latest_tx: watch::Sender<Utf8Bytes>,
) {
    // Serialize each frame once and broadcast the shared bytes.
    loop {
        match frames_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::Frame(FrameDto::from(update));
                let txt = match serde_json::to_string(&msg) {
                    Ok(txt) => txt,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize frame");
                        continue;
                    }
                };

                let bytes = Utf8Bytes::from(txt);
                // Store the latest bytes for lag recovery.
                let _ = frame_latest_tx.send(bytes.clone());
                let _ = frame_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "frame serializer lagged; skipping to latest frame");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("frame channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_room_serializer(feed: RoomFeed) {
    tokio::spawn(frame_serializer(
        feed.frames_rx,
        feed.frame_bytes_tx,
        feed.frame_latest_tx,
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomQuery>,
) -> impl IntoResponse {
    let Some(room_id) = query.room_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "room_id is required".to_string(),
            }),
        )
            .into_response();
    };

    let Some(room) = state.room_registry.get_room(&room_id).await else {
        // Keep not-found responses consistent with the JSON error schema.
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "room not found".to_string(),
            }),
        )
            .into_response();
    };

    ws.on_upgrade(move |socket| {
        // Separate connection id for correlating logs of spectators and players alike.
        let conn_id = rand_id();
        let span = info_span!(
            "conn",
            conn_id,
            room_id = %room.room_id,
            player_id = tracing::field::Empty
        );
        handle_socket(socket, room, query.player_id).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, room: RoomHandle, player_id: Option<PlayerId>) {
    let mut ctx = match bootstrap_connection(&mut socket, &room, player_id).await {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(error = ?e, "failed to bootstrap connection");
            let _ = socket.close().await;
            return;
        }
    };

    if let Some(player_id) = ctx.player_id {
        Span::current().record("player_id", player_id);
    }
    info!(spectator = ctx.player_id.is_none(), "client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    // `None` for spectators.
    pub player_id: Option<PlayerId>,
    pub room: RoomHandle,
    // Token used to verify ownership of the player connection slot.
    pub player_conn_token: u64,
    // Fires when a newer socket for the same player takes over.
    pub player_conn_shutdown: Arc<Notify>,
    pub frame_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    pub frame_latest_rx: watch::Receiver<Utf8Bytes>,
    pub summary_rx: watch::Receiver<RoomSummary>,
    // Count lag recovery snapshots sent to this client.
    pub lag_recovery_count: u64,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,

    pub invalid_json: u32,

    pub last_command_full_log: Instant,
    pub last_frame_lag_log: Instant,
    pub last_invalid_command_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    room: &RoomHandle,
    requested_player_id: Option<PlayerId>,
) -> Result<ConnCtx, NetError> {
    // Subscribe before any await so no frame slips past.
    let frame_bytes_rx = room.subscribe_frames();
    let frame_latest_rx = room.frame_latest_rx.clone();
    let mut summary_rx = room.summary_rx.clone();

    let player_id = requested_player_id.filter(|id| room.is_player(*id));
    let player_conn_token = rand_id();
    let player_conn_shutdown = match player_id {
        Some(id) => {
            room.register_or_replace_player_connection(id, player_conn_token)
                .await
        }
        None => Arc::new(Notify::new()),
    };

    let release = |room: &RoomHandle| {
        let room = room.clone();
        async move {
            if let Some(id) = player_id {
                room.unregister_player_connection_if_owner(id, player_conn_token)
                    .await;
            }
        }
    };

    let identity = ServerMessage::Identity {
        player_id: requested_player_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("spectator-{player_conn_token}")),
        spectator: player_id.is_none(),
    };
    let mut bytes_out = match send_message(socket, &identity).await {
        Ok(bytes) => bytes as u64,
        Err(err) => {
            release(room).await;
            return Err(err);
        }
    };

    // Current lobby state, then the latest frame for late joiners.
    let summary = summary_rx.borrow_and_update().clone();
    match send_message(socket, &ServerMessage::Room(RoomSummaryDto::from(&summary))).await {
        Ok(bytes) => bytes_out += bytes as u64,
        Err(err) => {
            release(room).await;
            return Err(err);
        }
    }
    let mut msgs_out = 2;
    let latest = frame_latest_rx.borrow().clone();
    if !latest.is_empty() {
        let len = latest.len() as u64;
        if let Err(err) = socket.send(Message::Text(latest)).await {
            release(room).await;
            return Err(NetError::Ws(err));
        }
        msgs_out += 1;
        bytes_out += len;
    }

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        player_id,
        room: room.clone(),
        player_conn_token,
        player_conn_shutdown,
        frame_bytes_rx,
        frame_latest_rx,
        summary_rx,
        lag_recovery_count: 0,

        msgs_in: 0,
        msgs_out,
        bytes_in: 0,
        bytes_out,

        invalid_json: 0,

        last_command_full_log: now,
        last_frame_lag_log: now,
        last_invalid_command_log: now,

        close_frame: None,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn reject(
    socket: &mut WebSocket,
    error: String,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    match send_message(socket, &ServerMessage::CommandRejected { error }).await {
        Ok(bytes) => {
            *msgs_out += 1;
            *bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send command rejection");
            LoopControl::Disconnect
        }
    }
}

fn queue_command(
    room: &RoomHandle,
    player_id: PlayerId,
    command: ShipCommand,
    last_command_full_log: &mut Instant,
    close_frame: &mut Option<CloseFrame>,
) -> LoopControl {
    match room.try_send_command(FrameCommand { player_id, command }) {
        Ok(()) => LoopControl::Continue,
        Err(TrySendError::Full(_)) => {
            if should_log(last_command_full_log) {
                warn!(player_id, "room event channel full; dropping command");
            }
            LoopControl::Continue
        }
        Err(TrySendError::Closed(_)) => {
            *close_frame = Some(CloseFrame {
                code: close_code::NORMAL,
                reason: "room closed".into(),
            });
            LoopControl::Disconnect
        }
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let player_id = ctx.player_id;

    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        room,
        player_conn_token,
        player_conn_shutdown,
        frame_bytes_rx,
        frame_latest_rx,
        summary_rx,
        lag_recovery_count,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_json,
        last_command_full_log,
        last_frame_lag_log,
        last_invalid_command_log,
        close_frame,
        ..
    } = ctx;

    // The summary closes when the room task exits; frames keep flowing until
    // the serializer drains.
    let mut summary_open = true;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                matches!(
                    handle_incoming_ws(
                        socket,
                        incoming,
                        player_id,
                        room,
                        msgs_in,
                        msgs_out,
                        bytes_in,
                        bytes_out,
                        invalid_json,
                        last_command_full_log,
                        last_invalid_command_log,
                        close_frame,
                    ).await,
                    LoopControl::Disconnect
                )
            }

            frame_msg = frame_bytes_rx.recv() => {
                match frame_msg {
                    Ok(bytes) => matches!(
                        forward_frame_bytes(bytes, socket, msgs_out, bytes_out).await,
                        LoopControl::Disconnect
                    ),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if should_log(last_frame_lag_log) {
                            warn!(missed = n, "frames lagged; sending latest");
                        }

                        // Resync strategy: send the latest frame.
                        let latest = frame_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            false
                        } else {
                            *lag_recovery_count += 1;
                            let bytes_len = latest.len();
                            let outcome =
                                forward_frame_bytes(latest, socket, msgs_out, bytes_out).await;
                            if should_log(last_frame_lag_log) {
                                debug!(
                                    bytes = bytes_len,
                                    count = *lag_recovery_count,
                                    "sent lag recovery frame"
                                );
                            }
                            matches!(outcome, LoopControl::Disconnect)
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        // Game over: flush a pending summary, then close.
                        if summary_rx.has_changed().unwrap_or(false) {
                            let _ = forward_summary(summary_rx, socket, msgs_out, bytes_out).await;
                        }
                        *close_frame = Some(CloseFrame {
                            code: close_code::NORMAL,
                            reason: "room closed".into(),
                        });
                        true
                    }
                }
            }

            changed = summary_rx.changed(), if summary_open => {
                match changed {
                    Ok(()) => matches!(
                        forward_summary(summary_rx, socket, msgs_out, bytes_out).await,
                        LoopControl::Disconnect
                    ),
                    Err(_) => {
                        debug!("room summary closed");
                        summary_open = false;
                        false
                    }
                }
            }

            // Connection replacement signal for duplicate player ids.
            _ = player_conn_shutdown.notified() => {
                *close_frame = Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "connection replaced".into(),
                });
                info!("connection replaced by newer session");
                true
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    disconnect_cleanup(
        player_id,
        room,
        *player_conn_token,
        *msgs_in,
        *msgs_out,
        *bytes_in,
        *bytes_out,
        *invalid_json,
        *lag_recovery_count,
    )
    .await;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    player_id: Option<PlayerId>,
    room: &RoomHandle,
    msgs_in: &mut u64,
    msgs_out: &mut u64,
    bytes_in: &mut u64,
    bytes_out: &mut u64,
    invalid_json: &mut u32,
    last_command_full_log: &mut Instant,
    last_invalid_command_log: &mut Instant,
    close_frame: &mut Option<CloseFrame>,
) -> LoopControl {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                *msgs_in += 1;
                *bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Command(dto)) => {
                        let Some(player_id) = player_id else {
                            if should_log(last_invalid_command_log) {
                                warn!("spectator command ignored");
                            }
                            return reject(
                                socket,
                                "spectators cannot command ships".to_string(),
                                msgs_out,
                                bytes_out,
                            )
                            .await;
                        };
                        let phase = room.phase();
                        if phase != GamePhase::Live {
                            return reject(
                                socket,
                                format!("game is not live (phase {phase})"),
                                msgs_out,
                                bytes_out,
                            )
                            .await;
                        }
                        queue_command(
                            room,
                            player_id,
                            dto.into(),
                            last_command_full_log,
                            close_frame,
                        )
                    }
                    Err(parse_err) => {
                        *invalid_json += 1;
                        if should_log(last_invalid_command_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if *invalid_json > MAX_INVALID_JSON {
                            *close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return LoopControl::Disconnect;
                        }

                        reject(socket, parse_err.to_string(), msgs_out, bytes_out).await
                    }
                }
            }
            Message::Binary(_) => {
                *close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                LoopControl::Disconnect
            }
            Message::Ping(_) | Message::Pong(_) => LoopControl::Continue,
            Message::Close(_) => LoopControl::Disconnect,
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            LoopControl::Disconnect
        }
        None => {
            info!("websocket closed");
            LoopControl::Disconnect
        }
    }
}

async fn forward_frame_bytes(
    frame: Utf8Bytes,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let bytes_len = frame.len();
    match socket.send(Message::Text(frame)).await {
        Ok(()) => {
            *msgs_out += 1;
            *bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send frame");
            LoopControl::Disconnect
        }
    }
}

async fn forward_summary(
    summary_rx: &mut watch::Receiver<RoomSummary>,
    socket: &mut WebSocket,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> LoopControl {
    let summary = summary_rx.borrow_and_update().clone();
    let msg = ServerMessage::Room(RoomSummaryDto::from(&summary));
    match send_message(socket, &msg).await {
        Ok(bytes) => {
            *msgs_out += 1;
            *bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send room summary");
            LoopControl::Disconnect
        }
    }
}

// Leaving the socket never removes the player from the game; that is the
// surrounding service's call via the HTTP API.
#[allow(clippy::too_many_arguments)]
async fn disconnect_cleanup(
    player_id: Option<PlayerId>,
    room: &RoomHandle,
    player_conn_token: u64,
    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    invalid_json: u32,
    lag_recovery_count: u64,
) {
    if let Some(player_id) = player_id {
        room.unregister_player_connection_if_owner(player_id, player_conn_token)
            .await;
    }

    debug!(
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_json,
        lag_recovery_count,
        "connection stats"
    );
    info!("client disconnected");
}
