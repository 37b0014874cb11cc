use hypersweeper_common::Coord;
use hypersweeper_server::{
    Registry, build,
    config::{Config, GameConfig},
    cors::create_cors,
    logic::{generator::generate, topology::neighbor_mine_count},
    routes::SESSION_COOKIE,
};
use rocket::{
    http::{Cookie, Status},
    local::blocking::Client,
};
use serde_json::Value;

fn server() -> rocket::Rocket<rocket::Build> {
    let config = Config::default();
    let cors = create_cors(&config.cors_origins).expect("valid cors");
    build(Registry::new(GameConfig::default()), cors)
}

fn tracked_client() -> Client {
    Client::tracked(server()).expect("valid rocket instance")
}

fn reveal_uri(coord: Coord) -> String {
    format!(
        "/api/reveal?x={}&y={}&z={}&w={}&v={}",
        coord.x, coord.y, coord.z, coord.w, coord.v
    )
}

fn flag_uri(coord: Coord) -> String {
    format!(
        "/api/flag?x={}&y={}&z={}&w={}&v={}",
        coord.x, coord.y, coord.z, coord.w, coord.v
    )
}

#[test]
fn test_health() {
    let client = tracked_client();
    let response = client.get("/api/health").dispatch();

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["game_config"]["board_size"], 3);
    assert_eq!(body["game_config"]["mine_count"], 60);
    assert_eq!(body["game_config"]["total_cells"], 243);
    assert_eq!(body["active_sessions"], 0);
}

#[test]
fn test_restart_issues_cookie_and_session() {
    let client = tracked_client();

    let response = client.post("/api/restart").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert!(response.cookies().get(SESSION_COOKIE).is_some());
    let body: Value = response.into_json().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["board_size"], 3);
    assert_eq!(body["mine_count"], 60);

    let stats: Value = client.get("/api/stats").dispatch().into_json().unwrap();
    assert_eq!(stats["revealed_cells"], 0);
    assert_eq!(stats["reveals_used"], 0);
    assert_eq!(stats["game_state"], "PLAYING");
    assert_eq!(stats["board_metadata"]["total_cells"], 243);

    let health: Value = client.get("/api/health").dispatch().into_json().unwrap();
    assert_eq!(health["active_sessions"], 1);
}

#[test]
fn test_out_of_range_reveal_is_bad_request() {
    let client = tracked_client();

    let response = client.get(reveal_uri(Coord::new(3, 0, 0, 0, 0))).dispatch();

    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Invalid coordinates"));

    let stats: Value = client.get("/api/stats").dispatch().into_json().unwrap();
    assert_eq!(stats["revealed_cells"], 0);
}

#[test]
fn test_mines_hidden_while_playing() {
    let client = tracked_client();
    let response = client.get("/api/mines").dispatch();
    assert_eq!(response.status(), Status::Forbidden);
}

#[test]
fn test_seeded_mine_hit_then_game_over() {
    let client = tracked_client();
    let (board, _) = generate(3, 60, Some(5)).unwrap();
    let mine = board.mine_coordinates()[0];

    assert_eq!(
        client.post("/api/restart?seed=5").dispatch().status(),
        Status::Ok
    );

    let body: Value = client.get(reveal_uri(mine)).dispatch().into_json().unwrap();
    assert_eq!(body["is_mine"], true);
    assert_eq!(body["game_over"], true);
    assert_eq!(body["game_state"], "LOST");
    assert_eq!(body["total_reveals"], 1);
    assert_eq!(body["mine_hit_coords"], serde_json::to_value(mine).unwrap());

    let mines = client.get("/api/mines").dispatch();
    assert_eq!(mines.status(), Status::Ok);
    let mines: Value = mines.into_json().unwrap();
    assert_eq!(mines["total_mines"], 60);
    assert_eq!(mines["game_state"], "LOST");

    let other = Coord::new(1, 1, 1, 1, 1);
    let response = client.get(reveal_uri(other)).dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Game is over"));

    let response = client.post(flag_uri(other)).dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
fn test_double_reveal_rejected() {
    let client = tracked_client();
    let (board, _) = generate(3, 60, Some(8)).unwrap();
    let numbered = (0..board.total_cells())
        .map(|index| board.coord_at(index))
        .find(|&coord| !board.is_mine(coord) && neighbor_mine_count(&board, coord) > 0)
        .unwrap();

    client.post("/api/restart?seed=8").dispatch();

    let first: Value = client
        .get(reveal_uri(numbered))
        .dispatch()
        .into_json()
        .unwrap();
    assert_eq!(first["is_mine"], false);
    assert_eq!(first["cascade_size"], 0);
    assert_eq!(first["game_state"], "PLAYING");

    let second = client.get(reveal_uri(numbered)).dispatch();
    assert_eq!(second.status(), Status::BadRequest);
    let body: Value = second.into_json().unwrap();
    assert!(body["detail"].as_str().unwrap().contains("already revealed"));

    let stats: Value = client.get("/api/stats").dispatch().into_json().unwrap();
    assert_eq!(stats["revealed_cells"], 1);
    assert_eq!(stats["reveals_used"], 1);
}

#[test]
fn test_flag_toggles() {
    let client = tracked_client();
    let coord = Coord::new(0, 1, 2, 0, 1);

    let first: Value = client.post(flag_uri(coord)).dispatch().into_json().unwrap();
    assert_eq!(first["is_flagged"], true);
    assert_eq!(first["action"], "flagged");
    assert_eq!(first["total_flagged"], 1);

    let second: Value = client.post(flag_uri(coord)).dispatch().into_json().unwrap();
    assert_eq!(second["is_flagged"], false);
    assert_eq!(second["action"], "unflagged");
    assert_eq!(second["total_flagged"], 0);
}

#[test]
fn test_sessions_follow_cookie() {
    let client = Client::untracked(server()).expect("valid rocket instance");
    let (board, _) = generate(3, 60, Some(21)).unwrap();
    let safe = (0..board.total_cells())
        .map(|index| board.coord_at(index))
        .find(|&coord| !board.is_mine(coord))
        .unwrap();

    client
        .post("/api/restart?seed=21")
        .cookie(Cookie::new(SESSION_COOKIE, "alice"))
        .dispatch();
    let response = client
        .get(reveal_uri(safe))
        .cookie(Cookie::new(SESSION_COOKIE, "alice"))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let alice: Value = client
        .get("/api/stats")
        .cookie(Cookie::new(SESSION_COOKIE, "alice"))
        .dispatch()
        .into_json()
        .unwrap();
    let bob: Value = client
        .get("/api/stats")
        .cookie(Cookie::new(SESSION_COOKIE, "bob"))
        .dispatch()
        .into_json()
        .unwrap();

    assert!(alice["revealed_cells"].as_u64().unwrap() >= 1);
    assert_eq!(bob["revealed_cells"], 0);
}
