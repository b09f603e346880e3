//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::{http::LobbyStatsDto, websocket::SnapshotDto},
    ui::state::AppState,
};
use pairhub_shared::time::millis_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current waiting queue and room occupancy
pub async fn get_lobby(State(state): State<Arc<AppState>>) -> Json<SnapshotDto> {
    let snapshot = state.get_lobby_state_usecase.snapshot().await;

    // Domain Model から DTO への変換
    Json(SnapshotDto::from(&snapshot))
}

/// Live counters for dashboards
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<LobbyStatsDto> {
    let (stats, generated_at) = state.get_lobby_state_usecase.stats().await;
    Json(LobbyStatsDto::from_stats(
        stats,
        millis_to_rfc3339(generated_at.value()),
    ))
}
