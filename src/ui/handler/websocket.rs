//! WebSocket connection handlers.
//!
//! Connection lifecycle: identity check → register in the gateway →
//! frame loop (subscribe/unsubscribe) → disconnect cleanup. Events
//! reach the socket through the per-connection channel registered in
//! the gateway; the handler itself never fans out.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{RoomId, UserId, UserProfile},
    infrastructure::{
        dto::websocket::{ClientFrame, ConnectedMessage, ErrorMessage, EventType, SubscriptionAck},
        gateway::ConnectionId,
    },
    ui::state::{AppState, ConnectQuery},
    usecase::require_active_member,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let raw_user_id = query.user_id;

    // Convert String -> UserId (Domain Model)
    let user_id = match UserId::new(raw_user_id.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid user_id format: '{}'", raw_user_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Unauthenticated upgrade attempts are rejected before registration.
    let profile = match state.users.find_user(&user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::warn!("Rejecting connection for unknown user '{}'", raw_user_id);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(e) => {
            tracing::error!("Directory lookup failed for '{}': {}", raw_user_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Create the channel this connection receives events on and enter
    // the registry.
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.gateway.register(profile.id.clone(), tx).await;
    tracing::info!(
        "User '{}' connected as connection {}",
        profile.id,
        connection_id
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, profile, connection_id, rx)))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    profile: UserProfile,
    connection_id: ConnectionId,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Confirm the handshake to the client
    let connected = ConnectedMessage {
        r#type: EventType::Connected,
        user_id: profile.id.as_str().to_string(),
    };
    match serde_json::to_string(&connected) {
        Ok(json) => {
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::error!("Failed to send connected frame to '{}': {}", profile.id, e);
                state.gateway.disconnect(connection_id).await;
                return;
            }
        }
        Err(e) => {
            tracing::error!("Failed to serialize connected frame: {}", e);
            state.gateway.disconnect(connection_id).await;
            return;
        }
    }

    let recv_state = state.clone();
    let recv_user = profile.id.clone();

    // Task receiving frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on connection {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_frame(&recv_state, connection_id, &recv_user, &text).await;
                }
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping on connection {}", connection_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Task pushing gateway events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove the connection from every channel it joined
    state.gateway.disconnect(connection_id).await;
    tracing::info!(
        "User '{}' disconnected (connection {})",
        profile.id,
        connection_id
    );
}

/// Dispatch one inbound text frame.
async fn handle_client_frame(
    state: &AppState,
    connection_id: ConnectionId,
    user_id: &UserId,
    text: &str,
) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Failed to parse client frame as JSON: {}", e);
            send_error(state, connection_id, "malformed frame").await;
            return;
        }
    };

    match frame {
        ClientFrame::Subscribe { room_id } => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(_) => {
                    send_error(state, connection_id, "invalid room id").await;
                    return;
                }
            };
            // Joining a room channel requires an active membership.
            match require_active_member(state.memberships.as_ref(), &room_id, user_id).await {
                Ok(_) => {
                    state.gateway.subscribe(connection_id, room_id.clone()).await;
                    tracing::info!(
                        "Connection {} subscribed to room '{}'",
                        connection_id,
                        room_id
                    );
                    send_ack(state, connection_id, EventType::Subscribed, &room_id).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Subscribe to room '{}' rejected for '{}': {}",
                        room_id,
                        user_id,
                        e
                    );
                    send_error(state, connection_id, &e.to_string()).await;
                }
            }
        }
        ClientFrame::Unsubscribe { room_id } => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(_) => {
                    send_error(state, connection_id, "invalid room id").await;
                    return;
                }
            };
            state.gateway.unsubscribe(connection_id, &room_id).await;
            send_ack(state, connection_id, EventType::Unsubscribed, &room_id).await;
        }
    }
}

async fn send_ack(
    state: &AppState,
    connection_id: ConnectionId,
    event: EventType,
    room_id: &RoomId,
) {
    let ack = SubscriptionAck {
        r#type: event,
        room_id: room_id.as_str().to_string(),
    };
    if let Ok(json) = serde_json::to_string(&ack)
        && !state.gateway.send_to(connection_id, json).await
    {
        tracing::warn!("Failed to ack on connection {}", connection_id);
    }
}

async fn send_error(state: &AppState, connection_id: ConnectionId, message: &str) {
    let frame = ErrorMessage {
        r#type: EventType::Error,
        message: message.to_string(),
    };
    if let Ok(json) = serde_json::to_string(&frame)
        && !state.gateway.send_to(connection_id, json).await
    {
        tracing::warn!("Failed to send error frame on connection {}", connection_id);
    }
}
