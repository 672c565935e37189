//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Relay statistics for the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    /// Aliases with at least one live connection
    pub online_aliases: usize,
    /// Rooms with at least one member
    pub rooms: usize,
    /// Pending contact requests in the contact book
    pub pending_requests: usize,
    /// Aliases with at least one contact
    pub contact_aliases: usize,
    pub generated_at: String, // RFC 3339
}
