//! Room → joined connections.

use std::collections::HashMap;

use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{ConnectionId, RoomId};

use super::ConnectionHandle;

/// Registry of relay rooms.
///
/// A room exists only while it has members; it is removed as soon as its last
/// member leaves.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, HashMap<ConnectionId, UnboundedSender<String>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a connection into `room`, leaving `previous` first.
    ///
    /// Returns the number of members of `room` afterwards.
    pub async fn join(
        &self,
        handle: &ConnectionHandle,
        previous: Option<&RoomId>,
        room: RoomId,
    ) -> usize {
        let mut rooms = self.rooms.lock().await;
        if let Some(previous) = previous
            && previous != &room
        {
            Self::remove_member(&mut rooms, previous, &handle.id);
        }
        let members = rooms.entry(room).or_default();
        members.insert(handle.id, handle.sender.clone());
        members.len()
    }

    /// Remove a connection from `room`.
    ///
    /// Returns the number of members left in the room.
    pub async fn leave(&self, id: &ConnectionId, room: &RoomId) -> usize {
        let mut rooms = self.rooms.lock().await;
        Self::remove_member(&mut rooms, room, id)
    }

    /// Send `frame` verbatim to every member of `room` except `from`.
    ///
    /// Returns the number of members reached.
    pub async fn broadcast(&self, room: &RoomId, from: &ConnectionId, frame: &str) -> usize {
        let rooms = self.rooms.lock().await;
        let Some(members) = rooms.get(room) else {
            return 0;
        };
        members
            .iter()
            .filter(|(id, _)| *id != from)
            .filter(|(_, sender)| sender.send(frame.to_string()).is_ok())
            .count()
    }

    pub async fn member_count(&self, room: &RoomId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room).map_or(0, HashMap::len)
    }

    /// Number of rooms with at least one member
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    fn remove_member(
        rooms: &mut HashMap<RoomId, HashMap<ConnectionId, UnboundedSender<String>>>,
        room: &RoomId,
        id: &ConnectionId,
    ) -> usize {
        let Some(members) = rooms.get_mut(room) else {
            return 0;
        };
        members.remove(id);
        let remaining = members.len();
        if remaining == 0 {
            rooms.remove(room);
        }
        remaining
    }
}
