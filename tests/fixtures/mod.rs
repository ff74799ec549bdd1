//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use campus_chat::{
    domain::{UserId, UserProfile, UserRole},
    infrastructure::repository::InMemoryUserDirectory,
    server::{ServerConfig, serve},
    ui::state::AppState,
};

/// A real server instance bound to a fixed per-test port.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Boot the router with in-memory stores and the seeded test
    /// directory, then wait for the health endpoint to answer.
    pub async fn start(port: u16) -> Self {
        let directory = InMemoryUserDirectory::new(seed_profiles());
        let state = Arc::new(AppState::in_memory(Arc::new(directory)));
        let config = ServerConfig::new("127.0.0.1".to_string(), port);
        tokio::spawn(async move {
            if let Err(e) = serve(&config, state).await {
                panic!("test server failed: {e}");
            }
        });
        wait_until_ready(port).await;
        Self { port }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self, user_id: &str) -> String {
        format!("ws://127.0.0.1:{}/api/ws?user_id={}", self.port, user_id)
    }
}

/// Known users of every test server: a few named members plus numbered
/// students for crowd scenarios.
fn seed_profiles() -> Vec<UserProfile> {
    let named = [
        ("alice", "Alice", UserRole::Faculty),
        ("bob", "Bob", UserRole::Student),
        ("carol", "Carol", UserRole::Student),
        ("dave", "Dave", UserRole::Hod),
    ];
    let mut profiles: Vec<UserProfile> = named
        .into_iter()
        .filter_map(|(id, name, role)| {
            UserId::new(id.to_string())
                .ok()
                .map(|user_id| UserProfile::new(user_id, name.to_string(), role))
        })
        .collect();
    for i in 0..12 {
        if let Ok(user_id) = UserId::new(format!("stu-{i:02}")) {
            profiles.push(UserProfile::new(
                user_id,
                format!("Student {i:02}"),
                UserRole::Student,
            ));
        }
    }
    profiles
}

async fn wait_until_ready(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{port}/api/health");
    for _ in 0..100 {
        if let Ok(response) = client.get(&url).send().await
            && response.status() == 200
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("test server did not become ready on port {port}");
}

/// Create a room as `user` and return the response body.
pub async fn create_room(
    client: &reqwest::Client,
    base_url: &str,
    user: &str,
    name: &str,
    max_members: usize,
) -> serde_json::Value {
    let response = client
        .post(format!("{base_url}/api/rooms"))
        .header("x-user-id", user)
        .json(&serde_json::json!({
            "name": name,
            "kind": "group",
            "max_members": max_members,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201, "room creation must succeed");
    response.json().await.expect("Failed to parse JSON")
}

/// Join `user` into a room, returning the raw response.
pub async fn join_room(
    client: &reqwest::Client,
    base_url: &str,
    user: &str,
    room_id: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/rooms/{room_id}/join"))
        .header("x-user-id", user)
        .send()
        .await
        .expect("Failed to send request")
}

/// Send a text message, returning the raw response.
pub async fn send_text(
    client: &reqwest::Client,
    base_url: &str,
    user: &str,
    room_id: &str,
    content: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/rooms/{room_id}/messages"))
        .header("x-user-id", user)
        .json(&serde_json::json!({"content": content}))
        .send()
        .await
        .expect("Failed to send request")
}

/// Fetch one page of messages, returning the raw response.
pub async fn list_messages(
    client: &reqwest::Client,
    base_url: &str,
    user: &str,
    room_id: &str,
) -> reqwest::Response {
    client
        .get(format!("{base_url}/api/rooms/{room_id}/messages"))
        .header("x-user-id", user)
        .send()
        .await
        .expect("Failed to send request")
}

/// Fetch the caller's unread count for a room.
pub async fn unread_count(
    client: &reqwest::Client,
    base_url: &str,
    user: &str,
    room_id: &str,
) -> usize {
    let response = client
        .get(format!("{base_url}/api/rooms/{room_id}/unread"))
        .header("x-user-id", user)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    body["unread"].as_u64().expect("unread must be a number") as usize
}
