use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use devrev_api::{ApiConfig, ApiError, DevRevClient, RemoteClient};
use serde_json::{Map, Value, json};

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn works_get(State(captured): State<Captured>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    captured.requests.lock().unwrap().push((authorization, body));
    (StatusCode::OK, json!({ "work": { "id": "ISS-1" } }).to_string())
}

async fn parts_create() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "{\"message\":\"owned_by is required\"}")
}

async fn spawn_stub() -> (SocketAddr, Captured) {
    let captured = Captured::default();
    let router = Router::new()
        .route("/works.get", post(works_get))
        .route("/parts.create", post(parts_create))
        .with_state(captured.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    (address, captured)
}

fn client_for(address: SocketAddr) -> DevRevClient {
    let config = ApiConfig::new("test-token", &format!("http://{address}")).unwrap();
    DevRevClient::new(&config).unwrap()
}

#[tokio::test]
async fn posts_json_body_with_bearer_credential() {
    let (address, captured) = spawn_stub().await;
    let client = client_for(address);

    let mut body = Map::new();
    body.insert("id".to_string(), json!("ISS-1"));
    let result = client.call("works.get", &body).await.expect("remote call");

    assert_eq!(result.status_code, 200);
    assert_eq!(result.json().unwrap()["work"]["id"], json!("ISS-1"));

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("Bearer test-token"));
    assert_eq!(requests[0].1, json!({ "id": "ISS-1" }));
}

#[tokio::test]
async fn non_success_status_is_returned_not_raised() {
    let (address, _captured) = spawn_stub().await;
    let client = client_for(address);

    let result = client.call("parts.create", &Map::new()).await.expect("remote call");

    assert_eq!(result.status_code, 400);
    assert!(result.body.contains("owned_by is required"));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(address);
    let error = client.call("works.get", &Map::new()).await.unwrap_err();

    assert!(matches!(error, ApiError::Transport { ref endpoint, .. } if endpoint == "works.get"));
}
