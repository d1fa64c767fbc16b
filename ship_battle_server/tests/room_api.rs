mod support;

use reqwest::StatusCode;

#[tokio::test]
async fn when_room_is_created_then_it_can_be_fetched() {
    let client = reqwest::Client::new();
    let room_id = support::unique_room_id();

    let res = support::create_room(&client, &room_id).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.expect("json body");
    assert_eq!(body["room_id"], room_id.as_str());

    let res = client
        .get(format!("{}/rooms/{room_id}", support::ensure_server()))
        .send()
        .await
        .expect("get room");
    assert_eq!(res.status(), StatusCode::OK);
    let summary: serde_json::Value = res.json().await.expect("json body");
    assert_eq!(summary["phase"], "lobby");
    assert_eq!(summary["players"], serde_json::json!([]));
    assert_eq!(summary["map_configured"], false);
}

#[tokio::test]
async fn when_room_id_is_reused_then_conflict() {
    let client = reqwest::Client::new();
    let room_id = support::unique_room_id();
    support::create_room(&client, &room_id).await;

    let res = support::create_room(&client, &room_id).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.expect("json body");
    assert_eq!(body["error"], "room already exists");
}

#[tokio::test]
async fn when_room_id_is_blank_then_bad_request() {
    let client = reqwest::Client::new();
    let res = support::create_room(&client, "   ").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn when_room_is_missing_then_not_found() {
    let client = reqwest::Client::new();
    let res = support::add_player(&client, "no-such-room", 1, 1).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.expect("json body");
    assert_eq!(body["error"], "room not found");
}

#[tokio::test]
async fn when_players_join_then_summary_lists_them_and_duplicates_conflict() {
    let client = reqwest::Client::new();
    let room_id = support::unique_room_id();
    support::create_room(&client, &room_id).await;

    let res = support::add_player(&client, &room_id, 11, 1).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let summary: serde_json::Value = res.json().await.expect("json body");
    assert_eq!(summary["players"][0]["player_id"], "11");
    assert_eq!(summary["players"][0]["team"], 1);

    let res = support::add_player(&client, &room_id, 11, 2).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .delete(format!(
            "{}/rooms/{room_id}/players/11",
            support::ensure_server()
        ))
        .send()
        .await
        .expect("remove player");
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .delete(format!(
            "{}/rooms/{room_id}/players/11",
            support::ensure_server()
        ))
        .send()
        .await
        .expect("remove player again");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn when_map_is_invalid_then_bad_request() {
    let client = reqwest::Client::new();
    let room_id = support::unique_room_id();
    support::create_room(&client, &room_id).await;

    let mut map = support::duel_map();
    map["spawn_points"] = serde_json::json!([[999999, 0]]);
    let res = client
        .put(format!("{}/rooms/{room_id}/map", support::ensure_server()))
        .json(&serde_json::json!({ "map": map }))
        .send()
        .await
        .expect("set map");
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = support::set_map(&client, &room_id).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = support::set_map(&client, &room_id).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn when_start_lacks_players_then_conflict() {
    let client = reqwest::Client::new();
    let room_id = support::unique_room_id();
    support::create_room(&client, &room_id).await;
    support::add_player(&client, &room_id, 1, 1).await;
    support::set_map(&client, &room_id).await;

    let res = client
        .post(format!("{}/rooms/{room_id}/start", support::ensure_server()))
        .send()
        .await
        .expect("start");
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.expect("json body");
    assert_eq!(body["error"], "at least 2 players are required, 1 registered");
}

#[tokio::test]
async fn when_room_is_deleted_then_it_disappears() {
    let client = reqwest::Client::new();
    let room_id = support::unique_room_id();
    support::create_room(&client, &room_id).await;

    let res = client
        .get(format!("{}/rooms", support::ensure_server()))
        .send()
        .await
        .expect("list rooms");
    let body: serde_json::Value = res.json().await.expect("json body");
    let rooms = body["rooms"].as_array().expect("room list");
    assert!(rooms.iter().any(|r| r == room_id.as_str()));

    let url = format!("{}/rooms/{room_id}", support::ensure_server());
    let res = client.delete(&url).send().await.expect("delete room");
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = client.get(&url).send().await.expect("get room");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn when_health_is_checked_then_ok() {
    let res = reqwest::get(format!("{}/health", support::ensure_server()))
        .await
        .expect("health");
    assert_eq!(res.status(), StatusCode::OK);
}
