//! In-memory registries of live connections.
//!
//! Nothing here is persisted: both registries start empty on every process start.
//! They hold only sender handles; the connection itself is owned by its
//! WebSocket task, which must remove itself from every registry on disconnect.

pub mod connection;
pub mod room;

pub use connection::ConnectionRegistry;
pub use room::RoomRegistry;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{ConnectionId, ConnectionIdFactory};

/// Sending half of a live connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    /// Frames pushed here are written to the socket by the connection's send task
    pub sender: UnboundedSender<String>,
}

impl ConnectionHandle {
    /// Wrap a sender with a freshly generated connection id
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self {
            id: ConnectionIdFactory::generate(),
            sender,
        }
    }

    /// Best-effort delivery; `false` once the connection has gone away
    pub fn send(&self, frame: &str) -> bool {
        self.sender.send(frame.to_string()).is_ok()
    }
}
