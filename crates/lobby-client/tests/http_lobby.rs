//! `NetClient` and `ClientController` against an in-process axum mock of the
//! lobby API.

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use lobby_client::net_client::NetClient;
use lobby_client::{ClientController, ClientOptions, Command, PollResult};
use lobby_core::protocol::Id;
use lobby_core::transport::{LobbyApi, TransportError};
use lobby_core::view::View;

type Params = Query<HashMap<String, String>>;

const TOKEN: &str = "token-Ann";

fn authorized(params: &HashMap<String, String>) -> Result<(), StatusCode> {
    match params.get("authToken") {
        Some(token) if token == TOKEN => Ok(()),
        _ => Err(StatusCode::FORBIDDEN),
    }
}

async fn register(Query(params): Params) -> Json<Value> {
    let name = params.get("name").cloned().unwrap_or_default();
    Json(json!(format!("token-{name}")))
}

async fn get_me(Query(params): Params) -> Result<Json<Value>, StatusCode> {
    authorized(&params)?;
    Ok(Json(json!({"id": 7, "name": "Ann"})))
}

async fn create(Query(params): Params) -> Result<Json<Value>, StatusCode> {
    authorized(&params)?;
    Ok(Json(json!(42)))
}

async fn acknowledge(Query(params): Params) -> Result<Json<Value>, StatusCode> {
    authorized(&params)?;
    Ok(Json(Value::Null))
}

async fn game_state(Query(params): Params) -> Result<Json<Value>, StatusCode> {
    authorized(&params)?;
    let id = params.get("id").cloned().unwrap_or_default();
    Ok(Json(json!({
        "id": id,
        "players": [
            {"name": "Ann", "hand": [{"text": "A"}, {"text": "B"}]},
            {"name": "Bob", "hand": []}
        ],
        "status": "created",
        "hostId": 7
    })))
}

/// Serve the mock lobby on an ephemeral port and return its API base URL.
async fn spawn_lobby() -> String {
    let app = Router::new()
        .route("/api/players/add", get(register))
        .route("/api/players/getMe", get(get_me))
        .route("/api/games/create", get(create))
        .route("/api/games/join", get(acknowledge))
        .route("/api/games/leave", get(acknowledge))
        .route("/api/games/start", get(acknowledge))
        .route("/api/games/get", get(game_state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn expect_update(result: PollResult) {
    assert!(
        matches!(result, PollResult::Updated(_)),
        "expected an update, got {result:?}"
    );
}

#[tokio::test]
async fn register_create_and_poll_over_http() {
    let base = spawn_lobby().await;
    let mut ctrl = ClientController::new(NetClient::new(), base, ClientOptions::default());

    ctrl.dispatch(Command::Register {
        name: "Ann".to_string(),
    });
    expect_update(ctrl.recv().await);
    assert_eq!(ctrl.session().auth_token(), Some(TOKEN));

    expect_update(ctrl.recv().await);
    assert_eq!(ctrl.session().user_id(), Some(&Id::from("7")));
    assert_eq!(ctrl.current_view(), Some(View::ChooseGameType));

    ctrl.dispatch(Command::CreateGame);
    expect_update(ctrl.recv().await);
    assert_eq!(ctrl.session().game_id(), Some(&Id::from("42")));
    assert_eq!(ctrl.current_view(), Some(View::Game));

    ctrl.poll_tick();
    expect_update(ctrl.recv().await);
    let text = ctrl.rendered_text();
    assert!(text.contains("42"));
    assert!(text.contains("Ann"));
    assert!(text.contains("Bob"));
    assert!(text.contains("A"));
    assert!(text.contains("7"));
    assert!(ctrl.start_visible());

    ctrl.dispatch(Command::StartGame);
    expect_update(ctrl.recv().await);

    ctrl.dispatch(Command::LeaveGame);
    expect_update(ctrl.recv().await);
    assert_eq!(ctrl.session().game_id(), None);
    assert_eq!(ctrl.current_view(), Some(View::ChooseGameType));
}

#[tokio::test]
async fn join_then_poll_over_http() {
    let base = spawn_lobby().await;
    let mut ctrl = ClientController::new(NetClient::new(), base, ClientOptions::default());
    ctrl.session_mut().set_auth_token(TOKEN);

    ctrl.dispatch(Command::ChooseGameType);
    ctrl.dispatch(Command::JoinGame {
        id: "17".to_string(),
    });
    expect_update(ctrl.recv().await);
    assert_eq!(ctrl.session().game_id(), Some(&Id::from("17")));

    ctrl.poll_tick();
    expect_update(ctrl.recv().await);
    assert!(ctrl.rendered_text().starts_with("Room: 17"));
}

#[tokio::test]
async fn rejected_token_leaves_state_alone() {
    let base = spawn_lobby().await;
    let mut ctrl = ClientController::new(NetClient::new(), base, ClientOptions::default());
    ctrl.session_mut().set_auth_token("stale");

    ctrl.dispatch(Command::CreateGame);
    assert!(matches!(ctrl.recv().await, PollResult::Failed(_)));
    assert_eq!(ctrl.session().game_id(), None);
    assert_eq!(ctrl.current_view(), Some(View::Login));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let base = spawn_lobby().await;
    let err = NetClient::new()
        .get(
            &format!("{base}/games/create"),
            &[("authToken", "wrong".to_string())],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status { code: 403 }));

    let missing = NetClient::new()
        .get(&format!("{base}/games/nope"), &[])
        .await
        .unwrap_err();
    assert!(matches!(missing, TransportError::Status { code: 404 }));
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = NetClient::new()
        .get(&format!("http://{addr}/api/players/add"), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Connection(_)));
}
