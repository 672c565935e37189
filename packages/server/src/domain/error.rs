//! Domain layer error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Alias is empty after trimming surrounding whitespace
    #[error("Alias cannot be empty")]
    AliasEmpty,

    /// Alias too long error
    #[error("Alias cannot exceed {max} characters (got {actual})")]
    AliasTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// RequestId validation error
    #[error("RequestId cannot be empty")]
    RequestIdEmpty,

    /// RequestId too long error
    #[error("RequestId cannot exceed {max} characters (got {actual})")]
    RequestIdTooLong { max: usize, actual: usize },
}

/// Policy violations of the contact request state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// Alias or request id is missing or invalid (e.g. the connection never registered)
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    /// Both sides of the operation are the same alias
    #[error("An alias cannot be its own contact")]
    SameAlias,

    /// The two aliases are already mutual contacts
    #[error("'{from}' and '{to}' are already contacts")]
    AlreadyContacts { from: String, to: String },

    /// A pending request already exists between the two aliases (either direction)
    #[error("A pending request between '{from}' and '{to}' already exists")]
    AlreadyPending { from: String, to: String },

    /// The request id is already used by another pending request to the same recipient
    #[error("Request id '{0}' is already in use")]
    RequestIdInUse(String),

    /// No pending request with the given id is addressed to the alias
    #[error("No pending request '{id}' addressed to '{to}'")]
    RequestNotFound { id: String, to: String },
}

/// Errors raised by the durable contact store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing document failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The contact book could not be encoded as JSON
    #[error("Failed to encode contact book: {0}")]
    Encode(#[from] serde_json::Error),
}
