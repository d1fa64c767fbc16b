// Boots one server per test binary and shares its address.
#![allow(dead_code)]

use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

/// Ensure the test server is running and return its `http://` base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // A dedicated OS thread so the server outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                ship_battle_server::run(listener)
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

/// Same server, `ws://` scheme.
pub fn ws_url() -> String {
    ensure_server().replacen("http://", "ws://", 1)
}

pub fn unique_room_id() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

/// Two opposite spawn points on an otherwise empty map.
pub fn duel_map() -> serde_json::Value {
    serde_json::json!({
        "name": "duel",
        "meters_x": 20000,
        "meters_y": 20000,
        "units_per_meter": 10,
        "spawn_points": [[2000, 2000], [18000, 18000]],
        "space_stations": [{
            "id": "st-1",
            "name": "Waystation",
            "position": [10000, 10000],
            "service_radius": 150.0,
            "collision_radius": 20.0
        }],
        "mining_locations": [{
            "id": "ore-1",
            "name": "Rubble",
            "position": [5000, 15000],
            "service_radius": 150.0,
            "collision_radius": 20.0,
            "starting_ore_kg": 2000.0
        }]
    })
}

pub async fn create_room(client: &reqwest::Client, room_id: &str) -> reqwest::Response {
    client
        .post(format!("{}/rooms", ensure_server()))
        .json(&serde_json::json!({ "room_id": room_id }))
        .send()
        .await
        .expect("create room request")
}

pub async fn add_player(
    client: &reqwest::Client,
    room_id: &str,
    player_id: u64,
    team: u32,
) -> reqwest::Response {
    client
        .post(format!("{}/rooms/{room_id}/players", ensure_server()))
        .json(&serde_json::json!({
            "player_id": player_id,
            "name": format!("pilot {player_id}"),
            "team": team
        }))
        .send()
        .await
        .expect("add player request")
}

pub async fn set_map(client: &reqwest::Client, room_id: &str) -> reqwest::Response {
    client
        .put(format!("{}/rooms/{room_id}/map", ensure_server()))
        .json(&serde_json::json!({ "map": duel_map() }))
        .send()
        .await
        .expect("set map request")
}

fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
