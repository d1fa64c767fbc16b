// Internal HTTP API used by the surrounding service to stage and start rooms.

use crate::domain::{
    FeatureSpec, GameError, MapSpec, MiningLocationSpec, PlayerDetails, PlayerId, TeamId,
};
use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::net::client::spawn_room_serializer;
use crate::interface_adapters::protocol::RoomSummaryDto;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{RoomError, RoomHandle};

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

#[derive(Debug, serde::Deserialize)]
pub struct RoomInitRequest {
    // Room id provided by the surrounding service.
    room_id: String,
}

#[derive(Debug, serde::Serialize)]
struct RoomInitResponse {
    room_id: String,
}

#[derive(Debug, serde::Serialize)]
struct RoomListResponse {
    rooms: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct AddPlayerRequest {
    player_id: PlayerId,
    name: String,
    team: TeamId,
}

#[derive(Debug, serde::Deserialize)]
pub struct SetMapRequest {
    map: MapSpecDto,
}

/// Map as authored by the surrounding service, in meters.
#[derive(Debug, serde::Deserialize)]
pub struct MapSpecDto {
    name: String,
    meters_x: i64,
    meters_y: i64,
    #[serde(default)]
    units_per_meter: Option<i64>,
    spawn_points: Vec<(i64, i64)>,
    #[serde(default)]
    space_stations: Vec<FeatureSpecDto>,
    #[serde(default)]
    mining_locations: Vec<MiningLocationSpecDto>,
}

#[derive(Debug, serde::Deserialize)]
pub struct FeatureSpecDto {
    id: String,
    name: String,
    position: (i64, i64),
    service_radius: f64,
    collision_radius: f64,
}

#[derive(Debug, serde::Deserialize)]
pub struct MiningLocationSpecDto {
    #[serde(flatten)]
    feature: FeatureSpecDto,
    starting_ore_kg: f64,
}

impl From<FeatureSpecDto> for FeatureSpec {
    fn from(f: FeatureSpecDto) -> Self {
        Self {
            id: f.id,
            name: f.name,
            position_m: f.position,
            service_radius_m: f.service_radius,
            collision_radius_m: f.collision_radius,
        }
    }
}

impl From<MapSpecDto> for MapSpec {
    fn from(m: MapSpecDto) -> Self {
        Self {
            name: m.name,
            meters_x: m.meters_x,
            meters_y: m.meters_y,
            units_per_meter: m.units_per_meter,
            spawn_points: m.spawn_points,
            space_stations: m.space_stations.into_iter().map(FeatureSpec::from).collect(),
            mining_locations: m
                .mining_locations
                .into_iter()
                .map(|l| MiningLocationSpec {
                    feature: l.feature.into(),
                    starting_ore_kg: l.starting_ore_kg,
                })
                .collect(),
        }
    }
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn room_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "room not found")
}

/// Maps room failures onto HTTP statuses.
fn room_error_response(err: RoomError) -> Response {
    let status = match &err {
        RoomError::AlreadyExists => StatusCode::CONFLICT,
        RoomError::NotFound => StatusCode::NOT_FOUND,
        RoomError::Closed => StatusCode::GONE,
        RoomError::Rejected(GameError::InvalidMap(_)) => StatusCode::BAD_REQUEST,
        RoomError::Rejected(GameError::UnknownPlayer(_)) => StatusCode::NOT_FOUND,
        RoomError::Rejected(_) => StatusCode::CONFLICT,
    };
    error_response(status, err)
}

async fn lookup(state: &AppState, room_id: &str) -> Result<RoomHandle, Response> {
    state
        .room_registry
        .get_room(room_id)
        .await
        .ok_or_else(room_not_found)
}

pub async fn create_room_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RoomInitRequest>,
) -> impl IntoResponse {
    let room_id = payload.room_id.trim().to_string();
    if room_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "room_id is required");
    }

    match state.room_registry.create_room(room_id.clone()).await {
        Ok((_room, feed)) => {
            // Wire the serializer so sockets can subscribe immediately.
            spawn_room_serializer(feed);
            (StatusCode::CREATED, Json(RoomInitResponse { room_id })).into_response()
        }
        Err(e) => room_error_response(e),
    }
}

pub async fn list_rooms_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RoomListResponse {
        rooms: state.room_registry.room_ids().await,
    })
}

pub async fn get_room_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    match lookup(&state, &room_id).await {
        Ok(room) => Json(RoomSummaryDto::from(&room.summary())).into_response(),
        Err(resp) => resp,
    }
}

pub async fn delete_room_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    match state.room_registry.remove_room(&room_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => room_error_response(e),
    }
}

pub async fn add_player_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(payload): Json<AddPlayerRequest>,
) -> impl IntoResponse {
    let room = match lookup(&state, &room_id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    let details = PlayerDetails {
        player_id: payload.player_id,
        name: payload.name,
        team_id: payload.team,
    };
    match room.add_player(details).await {
        Ok(()) => (StatusCode::CREATED, Json(RoomSummaryDto::from(&room.summary()))).into_response(),
        Err(e) => room_error_response(e),
    }
}

pub async fn remove_player_handler(
    State(state): State<Arc<AppState>>,
    Path((room_id, player_id)): Path<(String, PlayerId)>,
) -> impl IntoResponse {
    let room = match lookup(&state, &room_id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    match room.remove_player(player_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => room_error_response(e),
    }
}

pub async fn set_map_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(payload): Json<SetMapRequest>,
) -> impl IntoResponse {
    let room = match lookup(&state, &room_id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    match room.set_map(payload.map.into()).await {
        Ok(()) => Json(RoomSummaryDto::from(&room.summary())).into_response(),
        Err(e) => room_error_response(e),
    }
}

pub async fn start_room_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> impl IntoResponse {
    let room = match lookup(&state, &room_id).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    match room.start().await {
        Ok(()) => Json(RoomSummaryDto::from(&room.summary())).into_response(),
        Err(e) => room_error_response(e),
    }
}

pub async fn health_handler() -> impl IntoResponse {
    StatusCode::OK
}
