//! Domain layer for the relay.
//!
//! This module contains the contact request state machine and the value objects
//! it is built from. It is independent of data transfer objects (DTOs), sockets
//! and the on-disk format.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{ContactBook, ContactRemoval, ContactRequest, RequestStatus};
pub use error::{ContactError, StoreError, ValueObjectError};
pub use factory::{ConnectionIdFactory, RequestIdFactory};
pub use repository::{ContactRepository, ContactStore};
#[cfg(test)]
pub use repository::MockContactStore;
pub use value_object::{Alias, ConnectionId, RequestId, RoomId, Timestamp};
