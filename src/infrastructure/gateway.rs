//! リアルタイム Fan-out Gateway 実装
//!
//! 接続レジストリ（コネクション → 購読ルーム集合）を 1 プロセスに 1 つ
//! 所有し、保存済みメッセージを購読中の全コネクションへ配信します。
//! レジストリはインメモリの一時状態であり、永続化されません。

use std::collections::{HashMap, HashSet};
use std::fmt;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::{
    domain::{RoomId, UserId},
    usecase::MessageFanout,
};

/// Identifier of one WebSocket connection. A user may hold several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered connection: the authenticated user, its outbound
/// channel, and the rooms it subscribed to.
struct GatewayConnection {
    user_id: UserId,
    sender: UnboundedSender<String>,
    rooms: HashSet<RoomId>,
}

#[derive(Default)]
struct GatewayRegistry {
    next_connection_id: u64,
    connections: HashMap<ConnectionId, GatewayConnection>,
    /// Reverse index: room → subscribed connections
    channels: HashMap<RoomId, HashSet<ConnectionId>>,
}

/// 接続レジストリ本体。`AppState` に 1 インスタンスだけ保持されます。
pub struct FanoutGateway {
    registry: Mutex<GatewayRegistry>,
}

impl FanoutGateway {
    /// 新しい FanoutGateway を作成
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(GatewayRegistry::default()),
        }
    }

    /// Register an authenticated connection and hand back its id.
    pub async fn register(&self, user_id: UserId, sender: UnboundedSender<String>) -> ConnectionId {
        let mut registry = self.registry.lock().await;
        registry.next_connection_id += 1;
        let connection_id = ConnectionId(registry.next_connection_id);
        registry.connections.insert(
            connection_id,
            GatewayConnection {
                user_id,
                sender,
                rooms: HashSet::new(),
            },
        );
        connection_id
    }

    /// Subscribe a connection to a room channel. Idempotent; returns false
    /// for an unknown connection.
    pub async fn subscribe(&self, connection_id: ConnectionId, room_id: RoomId) -> bool {
        let mut registry = self.registry.lock().await;
        let Some(connection) = registry.connections.get_mut(&connection_id) else {
            return false;
        };
        connection.rooms.insert(room_id.clone());
        registry
            .channels
            .entry(room_id)
            .or_default()
            .insert(connection_id);
        true
    }

    /// Remove a connection from a room channel. Idempotent.
    pub async fn unsubscribe(&self, connection_id: ConnectionId, room_id: &RoomId) {
        let mut registry = self.registry.lock().await;
        if let Some(connection) = registry.connections.get_mut(&connection_id) {
            connection.rooms.remove(room_id);
        }
        if let Some(subscribers) = registry.channels.get_mut(room_id) {
            subscribers.remove(&connection_id);
            if subscribers.is_empty() {
                registry.channels.remove(room_id);
            }
        }
    }

    /// Drop a connection from the registry and from every channel it
    /// joined. No persisted side effect.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let Some(connection) = registry.connections.remove(&connection_id) else {
            return;
        };
        for room_id in connection.rooms {
            if let Some(subscribers) = registry.channels.get_mut(&room_id) {
                subscribers.remove(&connection_id);
                if subscribers.is_empty() {
                    registry.channels.remove(&room_id);
                }
            }
        }
    }

    /// Push a payload to one connection (acks, error frames).
    pub async fn send_to(&self, connection_id: ConnectionId, payload: String) -> bool {
        let registry = self.registry.lock().await;
        match registry.connections.get(&connection_id) {
            Some(connection) => connection.sender.send(payload).is_ok(),
            None => false,
        }
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.connections.len()
    }

    /// Number of connections subscribed to a room.
    pub async fn subscriber_count(&self, room_id: &RoomId) -> usize {
        let registry = self.registry.lock().await;
        registry
            .channels
            .get(room_id)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

impl Default for FanoutGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageFanout for FanoutGateway {
    async fn broadcast(&self, room_id: RoomId, payload: String) {
        let registry = self.registry.lock().await;
        let Some(subscribers) = registry.channels.get(&room_id) else {
            return;
        };
        for connection_id in subscribers {
            let Some(connection) = registry.connections.get(connection_id) else {
                continue;
            };
            // A failed send to one recipient must not block the others.
            if connection.sender.send(payload.clone()).is_err() {
                tracing::warn!(
                    "Failed to deliver event to connection {} (user '{}') in room '{}'",
                    connection_id,
                    connection.user_id,
                    room_id
                );
            }
        }
    }
}
