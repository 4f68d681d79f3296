//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    domain::RoundStatus,
    infrastructure::dto::{
        conversion::{leaderboard_to_dto, status_label},
        http::{GameSummaryDto, WorldSnapshotDto},
        websocket::CollectibleDto,
    },
    ui::state::AppState,
};
use coin_dash_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current round summary with a ranked leaderboard
pub async fn get_game(State(state): State<Arc<AppState>>) -> Json<GameSummaryDto> {
    let game_state = state.get_game_state_usecase.execute().await;
    let snapshot = &game_state.snapshot;

    // Domain Model から DTO への変換
    let finished_at = match &snapshot.status {
        RoundStatus::Active => None,
        RoundStatus::Finished { finished_at, .. } => {
            Some(timestamp_to_rfc3339(finished_at.value()))
        }
    };

    Json(GameSummaryDto {
        status: status_label(&snapshot.status).to_string(),
        winner_id: snapshot.status.winner().map(|w| w.as_str().to_string()),
        player_count: snapshot.players.len(),
        leaderboard: leaderboard_to_dto(&snapshot.leaderboard()),
        collectible: snapshot.collectible.as_ref().map(CollectibleDto::from),
        started_at: timestamp_to_rfc3339(game_state.started_at.value()),
        finished_at,
    })
}

/// Debug endpoint to get the raw world snapshot (for testing purposes)
pub async fn debug_game_state(State(state): State<Arc<AppState>>) -> Json<WorldSnapshotDto> {
    let game_state = state.get_game_state_usecase.execute().await;
    Json(WorldSnapshotDto::from(&game_state.snapshot))
}
