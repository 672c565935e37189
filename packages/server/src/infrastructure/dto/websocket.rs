//! WebSocket message DTOs.
//!
//! Every frame is a single JSON object with a `type` discriminator.

use serde::{Deserialize, Serialize};

use crate::domain::{ContactError, ContactRequest, RequestStatus};

/// Messages sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Bind the connection to an alias
    Register { alias: String },
    /// Join a relay room, leaving the previous one
    Join { room: String },
    /// Ask another alias to become a contact
    RequestSend {
        to: String,
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
    },
    RequestAccept {
        #[serde(rename = "requestId", default)]
        request_id: String,
    },
    RequestReject {
        #[serde(rename = "requestId", default)]
        request_id: String,
    },
    ContactDelete { with: String },
    /// Opaque chat payload, relayed verbatim within the room
    Message {},
    /// Opaque typing indicator, relayed verbatim within the room
    Typing {},
    /// Opaque "left the chat" notice, relayed verbatim within the room
    Left {},
}

/// Machine readable reason of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    BadRequest,
    AlreadyContacts,
    AlreadyPending,
    NotFound,
}

impl From<&ContactError> for FailureReason {
    fn from(error: &ContactError) -> Self {
        match error {
            ContactError::InvalidInput(_)
            | ContactError::SameAlias
            | ContactError::RequestIdInUse(_) => Self::BadRequest,
            ContactError::AlreadyContacts { .. } => Self::AlreadyContacts,
            ContactError::AlreadyPending { .. } => Self::AlreadyPending,
            ContactError::RequestNotFound { .. } => Self::NotFound,
        }
    }
}

/// Contact request as seen by clients and as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestDto {
    pub id: String,
    pub from: String,
    pub to: String,
    pub status: RequestStatus,
    /// Unix timestamp (milliseconds)
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl From<&ContactRequest> for ContactRequestDto {
    fn from(request: &ContactRequest) -> Self {
        Self {
            id: request.id.as_str().to_string(),
            from: request.from.as_str().to_string(),
            to: request.to.as_str().to_string(),
            status: request.status,
            created_at: request.created_at.value(),
            updated_at: request.updated_at.map(|t| t.value()),
        }
    }
}

/// Messages pushed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Acknowledges `register`
    Registered { alias: String },
    /// Initial snapshot sent to a connection right after it registers
    Bootstrap {
        alias: String,
        contacts: Vec<String>,
        #[serde(rename = "pendingRequests")]
        pending_requests: Vec<ContactRequestDto>,
    },
    /// Acknowledges `request_send`
    RequestSent {
        ok: bool,
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<FailureReason>,
    },
    /// Pushed to every connection of the recipient
    RequestReceived { request: ContactRequestDto },
    /// Acknowledges `request_accept`
    RequestAcceptOk {
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        with: Option<String>,
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<FailureReason>,
    },
    /// Acknowledges `request_reject`
    RequestRejectOk {
        ok: bool,
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<FailureReason>,
    },
    /// Pushed to the original sender when the recipient accepts
    RequestAccepted {
        by: String,
        #[serde(rename = "requestId")]
        request_id: String,
    },
    /// Pushed to the original sender when the recipient rejects
    RequestRejected {
        by: String,
        #[serde(rename = "requestId")]
        request_id: String,
    },
    ContactAdded { with: String },
    ContactRemoved { with: String },
    /// Tells both parties which room to join for their conversation
    OpenChat { with: String, room: String },
    /// Acknowledges `contact_delete`
    ContactDeleteOk {
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        with: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<FailureReason>,
    },
}

impl ServerMessage {
    /// Encode as a JSON text frame
    pub fn to_json(&self) -> String {
        // Every variant is plain data with string keys, so encoding cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
