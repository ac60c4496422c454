use std::net::SocketAddr;
use std::sync::Arc;

use github_store::{MockStore, UserStore};
use serde_json::{json, Value};
use users_relay::server::{self, state::AppState};

/// Bind the app on an ephemeral port and serve it in the background.
async fn spawn_app(store: Option<Arc<MockStore>>) -> SocketAddr {
    let state = AppState {
        store: store.map(|store| store as Arc<dyn UserStore>),
    };
    let app = server::create_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn users_url(addr: SocketAddr) -> String {
    format!("http://{}/api/users", addr)
}

#[tokio::test]
async fn test_get_users_returns_document_and_sha() {
    let store = Arc::new(MockStore::with_document(json!([{"name": "Alice"}]), "abc123"));
    let addr = spawn_app(Some(store)).await;

    let response = reqwest::get(users_url(addr)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["users"], json!([{"name": "Alice"}]));
    assert_eq!(body["sha"], json!("abc123"));
}

#[tokio::test]
async fn test_update_then_fetch_round_trips() {
    let store = Arc::new(MockStore::with_document(json!([]), "abc123"));
    let addr = spawn_app(Some(store)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(users_url(addr))
        .json(&json!({
            "users": [{"name": "Alice"}],
            "sha": "abc123",
            "commitMessage": "add alice"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    let new_sha = body["sha"].as_str().unwrap().to_string();
    assert_ne!(new_sha, "abc123");

    let body: Value = reqwest::get(users_url(addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["users"], json!([{"name": "Alice"}]));
    assert_eq!(body["sha"], json!(new_sha));
}

#[tokio::test]
async fn test_stale_sha_write_rejected_and_document_preserved() {
    let store = Arc::new(MockStore::with_document(json!([]), "abc123"));
    let addr = spawn_app(Some(store.clone())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(users_url(addr))
        .json(&json!({
            "users": [{"name": "Alice"}],
            "sha": "abc123",
            "commitMessage": "add alice"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The original sha is now stale; the write must fail and the first
    // writer's document must survive.
    let response = client
        .post(users_url(addr))
        .json(&json!({
            "users": [{"name": "Mallory"}],
            "sha": "abc123",
            "commitMessage": "clobber"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Could not write to GitHub."));

    assert_eq!(store.current().users, json!([{"name": "Alice"}]));
}

#[tokio::test]
async fn test_update_with_missing_field_rejected_without_store_call() {
    let store = Arc::new(MockStore::with_document(json!([]), "abc123"));
    let addr = spawn_app(Some(store.clone())).await;
    let client = reqwest::Client::new();

    let bodies = [
        json!({ "sha": "abc123", "commitMessage": "no users" }),
        json!({ "users": [], "commitMessage": "no sha" }),
        json!({ "users": [], "sha": "abc123" }),
        json!({ "users": null, "sha": "abc123", "commitMessage": "null users" }),
        json!({ "users": [], "sha": "", "commitMessage": "empty sha" }),
    ];

    for body in bodies {
        let response = client
            .post(users_url(addr))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "body: {}", body);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Invalid request body."));
    }

    assert_eq!(store.read_calls(), 0);
    assert_eq!(store.write_calls(), 0);
}

#[tokio::test]
async fn test_requests_without_credential_get_configuration_error() {
    let addr = spawn_app(None).await;
    let client = reqwest::Client::new();

    let response = reqwest::get(users_url(addr)).await.unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!("GitHub PAT not configured on server."));

    let response = client
        .post(users_url(addr))
        .json(&json!({
            "users": [{"name": "Alice"}],
            "sha": "abc123",
            "commitMessage": "add alice"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!("GitHub PAT not configured on server."));
}

#[tokio::test]
async fn test_remote_read_failure_collapses_to_generic_error() {
    let store = Arc::new(MockStore::with_document(json!([]), "abc123"));
    store.set_fail_reads(true);
    let addr = spawn_app(Some(store)).await;

    let response = reqwest::get(users_url(addr)).await.unwrap();
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Could not read from GitHub."));
}

#[tokio::test]
async fn test_concurrent_writers_exactly_one_succeeds() {
    let store = Arc::new(MockStore::with_document(json!([]), "abc123"));
    let addr = spawn_app(Some(store.clone())).await;
    let client = reqwest::Client::new();

    let post = |users: Value, message: &str| {
        let client = client.clone();
        let body = json!({ "users": users, "sha": "abc123", "commitMessage": message });
        async move {
            client
                .post(users_url(addr))
                .json(&body)
                .send()
                .await
                .unwrap()
                .json::<Value>()
                .await
                .unwrap()
        }
    };

    let (a, b) = tokio::join!(
        post(json!([{"name": "Alice"}]), "add alice"),
        post(json!([{"name": "Bob"}]), "add bob"),
    );

    let responses = [&a, &b];
    let winners = responses
        .iter()
        .filter(|body| body["success"] == json!(true))
        .count();
    assert_eq!(winners, 1);

    let losers = responses
        .iter()
        .filter(|body| body["error"] == json!("Could not write to GitHub."))
        .count();
    assert_eq!(losers, 1);

    assert_eq!(store.write_calls(), 2);
}

#[tokio::test]
async fn test_health_check() {
    let addr = spawn_app(None).await;

    let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(response.status(), 200);
}
