//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum number of characters in an alias
pub const ALIAS_MAX_LENGTH: usize = 100;

/// Maximum number of characters in a room identifier
pub const ROOM_ID_MAX_LENGTH: usize = 256;

/// Maximum number of characters in a request identifier
pub const REQUEST_ID_MAX_LENGTH: usize = 128;

/// Separator between the two aliases of a two-party room identifier
pub const ROOM_ID_SEPARATOR: char = '_';

/// Alias value object.
///
/// A caller-chosen identity. It is not authenticated and it is shared by every
/// connection that registered it. Surrounding whitespace is trimmed on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alias(String);

impl Alias {
    /// Create a new Alias.
    ///
    /// # Arguments
    ///
    /// * `alias` - The raw alias string (whitespace around it is removed)
    ///
    /// # Returns
    ///
    /// A Result containing the Alias or an error if validation fails
    pub fn new(alias: String) -> Result<Self, ValueObjectError> {
        let trimmed = alias.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::AliasEmpty);
        }
        let len = trimmed.chars().count();
        if len > ALIAS_MAX_LENGTH {
            return Err(ValueObjectError::AliasTooLong {
                max: ALIAS_MAX_LENGTH,
                actual: len,
            });
        }
        if trimmed.len() == alias.len() {
            Ok(Self(alias))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Alias {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Alias {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Alias> for String {
    fn from(alias: Alias) -> Self {
        alias.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Clients may join any room id. Two-party chat rooms use the id derived by
/// [`RoomId::for_pair`], which both parties can compute independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Arguments
    ///
    /// * `id` - The room identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.chars().count();
        if len > ROOM_ID_MAX_LENGTH {
            return Err(ValueObjectError::RoomIdTooLong {
                max: ROOM_ID_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Derive the room of a two-party conversation.
    ///
    /// The aliases are sorted before joining, so `for_pair(a, b) == for_pair(b, a)`.
    pub fn for_pair(a: &Alias, b: &Alias) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!(
            "{}{}{}",
            first.as_str(),
            ROOM_ID_SEPARATOR,
            second.as_str()
        ))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contact request identifier value object.
///
/// Either supplied by the requesting client or generated by
/// [`RequestIdFactory`](super::factory::RequestIdFactory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

impl RequestId {
    /// Create a new RequestId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RequestIdEmpty);
        }
        let len = id.chars().count();
        if len > REQUEST_ID_MAX_LENGTH {
            return Err(ValueObjectError::RequestIdTooLong {
                max: REQUEST_ID_MAX_LENGTH,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Build a RequestId from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RequestId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single live connection.
///
/// Connections are never persisted; the id only has to be unique within the
/// running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Wrap a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current time.
    pub fn now() -> Self {
        Self(timechat_shared::time::get_unix_timestamp_millis())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
