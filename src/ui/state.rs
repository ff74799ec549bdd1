//! Server state and connection management.

use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::{MembershipRepository, MessageRepository, RoomRepository, UserDirectory},
    infrastructure::{
        gateway::FanoutGateway,
        repository::{InMemoryMessageStore, InMemoryRoomStore},
    },
    usecase::RoomLocks,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
}

/// Shared application state
pub struct AppState {
    /// Room document store
    pub rooms: Arc<dyn RoomRepository>,
    /// Membership record store
    pub memberships: Arc<dyn MembershipRepository>,
    /// Message log store
    pub messages: Arc<dyn MessageRepository>,
    /// Identity collaborator
    pub users: Arc<dyn UserDirectory>,
    /// The one fan-out registry of this process
    pub gateway: Arc<FanoutGateway>,
    /// Per-room serialization for membership mutation
    pub room_locks: Arc<RoomLocks>,
}

impl AppState {
    /// Wire up the in-memory stores around the given user directory.
    pub fn in_memory(users: Arc<dyn UserDirectory>) -> Self {
        let store = Arc::new(InMemoryRoomStore::new());
        Self {
            rooms: store.clone(),
            memberships: store,
            messages: Arc::new(InMemoryMessageStore::new()),
            users,
            gateway: Arc::new(FanoutGateway::new()),
            room_locks: Arc::new(RoomLocks::new()),
        }
    }
}
