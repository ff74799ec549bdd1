//! Router construction and server bootstrap.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{UserId, UserProfile, UserRole},
    infrastructure::repository::InMemoryUserDirectory,
    ui::{handler, state::AppState},
};

/// Listen address configuration for the server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the chat facade router on top of the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_check))
        .route(
            "/api/rooms",
            get(handler::list_rooms).post(handler::create_room),
        )
        .route("/api/rooms/{room_id}", get(handler::get_room_detail))
        .route(
            "/api/rooms/{room_id}/messages",
            get(handler::list_messages).post(handler::send_message),
        )
        .route("/api/rooms/{room_id}/unread", get(handler::get_unread_count))
        .route("/api/rooms/{room_id}/join", post(handler::join_room))
        .route(
            "/api/rooms/{room_id}/membership",
            delete(handler::leave_room),
        )
        .route("/api/ws", get(handler::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the given state on the configured address until shutdown.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<(), std::io::Error> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}

/// Run the server with in-memory stores and the demo campus directory.
pub async fn run_server(config: ServerConfig) -> Result<(), std::io::Error> {
    let state = Arc::new(AppState::in_memory(Arc::new(demo_directory())));
    serve(&config, state).await
}

/// Stand-in identity provider until the campus SSO integration lands.
fn demo_directory() -> InMemoryUserDirectory {
    let seeds = [
        ("admin-registrar", "Registrar", UserRole::Admin),
        ("hod-cse", "Prof. Meera Iyer", UserRole::Hod),
        ("fac-rao", "Dr. Anil Rao", UserRole::Faculty),
        ("stu-ankit", "Ankit Sharma", UserRole::Student),
        ("stu-priya", "Priya Nair", UserRole::Student),
    ];
    let profiles = seeds
        .into_iter()
        .filter_map(|(id, name, role)| {
            UserId::new(id.to_string())
                .ok()
                .map(|user_id| UserProfile::new(user_id, name.to_string(), role))
        })
        .collect();
    InMemoryUserDirectory::new(profiles)
}
