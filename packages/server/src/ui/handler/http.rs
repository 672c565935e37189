//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use timechat_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::Timestamp, infrastructure::dto::http::StatsDto, ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current relay statistics
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    let book = state.repository.snapshot().await;

    Json(StatsDto {
        online_aliases: state.connections.online_alias_count().await,
        rooms: state.rooms.room_count().await,
        pending_requests: book.pending_count(),
        contact_aliases: book.contact_alias_count(),
        generated_at: timestamp_to_rfc3339(Timestamp::now().value()),
    })
}
