//! Server state and connection management.

use std::sync::Arc;

use crate::{
    domain::{Alias, ContactRepository, RoomId},
    infrastructure::registry::{ConnectionHandle, ConnectionRegistry, RoomRegistry},
};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn ContactRepository>,
    /// Live connections per alias
    pub connections: Arc<ConnectionRegistry>,
    /// Live connections per room
    pub rooms: Arc<RoomRegistry>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self {
            repository,
            connections: Arc::new(ConnectionRegistry::new()),
            rooms: Arc::new(RoomRegistry::new()),
        }
    }
}

/// Per-connection state, owned by the task serving the connection
#[derive(Debug)]
pub struct ConnectionState {
    /// Sending half and id of this connection
    pub handle: ConnectionHandle,
    /// Alias bound by `register`, if any
    pub alias: Option<Alias>,
    /// Room joined by `join`, if any
    pub room: Option<RoomId>,
}

impl ConnectionState {
    pub fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            alias: None,
            room: None,
        }
    }
}
