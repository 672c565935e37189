//! Domain factories for generating identifiers.

use super::{ConnectionId, RequestId};

/// Factory for generating RequestId instances.
///
/// Used when a client sends a request without supplying its own id.
pub struct RequestIdFactory;

impl RequestIdFactory {
    /// Generate a new RequestId with a random UUID v4.
    pub fn generate() -> RequestId {
        RequestId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating ConnectionId instances.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}
