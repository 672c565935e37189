//! Infrastructure layer.
//!
//! Implementations of the domain's storage traits, the in-memory connection
//! registries, and the DTOs exchanged over the wire and written to disk.

pub mod dto;
pub mod registry;
pub mod repository;
pub mod store;
