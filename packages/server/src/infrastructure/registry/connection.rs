//! Alias → live connections.

use std::collections::HashMap;

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::{
    domain::{Alias, ConnectionId},
    infrastructure::dto::websocket::ServerMessage,
};

use super::ConnectionHandle;

/// Presence registry.
///
/// An alias may have any number of live connections (several devices or tabs).
/// An alias with no connection left has no entry at all.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<Alias, HashMap<ConnectionId, UnboundedSender<String>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the alias's set.
    ///
    /// Returns the number of live connections of the alias afterwards.
    pub async fn register(&self, alias: Alias, handle: &ConnectionHandle) -> usize {
        self.register_with(alias, handle, async { Vec::new() }).await
    }

    /// Queue `greeting` on the connection, then add it to the alias's set, both
    /// under the registry lock.
    ///
    /// A push to the alias cannot interleave, so the connection always receives
    /// the greeting before any push. Returns the number of live connections of
    /// the alias afterwards.
    pub async fn register_with<F>(
        &self,
        alias: Alias,
        handle: &ConnectionHandle,
        greeting: F,
    ) -> usize
    where
        F: Future<Output = Vec<ServerMessage>>,
    {
        let mut connections = self.connections.lock().await;
        for message in greeting.await {
            handle.send(&message.to_json());
        }
        let set = connections.entry(alias).or_default();
        set.insert(handle.id, handle.sender.clone());
        set.len()
    }

    /// Remove a connection from the alias's set, dropping the alias when the set
    /// becomes empty.
    ///
    /// Returns the number of live connections the alias still has.
    pub async fn unregister(&self, alias: &Alias, id: &ConnectionId) -> usize {
        let mut connections = self.connections.lock().await;
        let Some(set) = connections.get_mut(alias) else {
            return 0;
        };
        set.remove(id);
        let remaining = set.len();
        if remaining == 0 {
            connections.remove(alias);
        }
        remaining
    }

    /// Deliver a message to every live connection of `alias`.
    ///
    /// Returns whether at least one connection was reached. Closed connections
    /// are skipped silently.
    pub async fn push(&self, alias: &Alias, message: &ServerMessage) -> bool {
        self.push_raw(alias, &message.to_json()).await
    }

    /// Deliver an already encoded frame to every live connection of `alias`
    pub async fn push_raw(&self, alias: &Alias, frame: &str) -> bool {
        let connections = self.connections.lock().await;
        let Some(set) = connections.get(alias) else {
            return false;
        };
        let mut reached = false;
        for (id, sender) in set {
            if sender.send(frame.to_string()).is_ok() {
                reached = true;
            } else {
                tracing::debug!("Connection {} of '{}' is already closed", id, alias);
            }
        }
        reached
    }

    pub async fn connection_count(&self, alias: &Alias) -> usize {
        let connections = self.connections.lock().await;
        connections.get(alias).map_or(0, HashMap::len)
    }

    pub async fn is_online(&self, alias: &Alias) -> bool {
        self.connection_count(alias).await > 0
    }

    /// Number of aliases with at least one live connection
    pub async fn online_alias_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}
