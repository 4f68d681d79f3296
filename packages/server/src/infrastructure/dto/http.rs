//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::{CollectibleDto, PlayerDto};

/// Summary returned by `GET /api/game`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummaryDto {
    /// "active" or "finished"
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    pub player_count: usize,
    pub leaderboard: Vec<LeaderboardEntryDto>,
    pub collectible: Option<CollectibleDto>,
    /// RFC 3339
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    /// 1-based
    pub rank: usize,
    pub id: String,
    pub score: u32,
}

/// Raw world state returned by `GET /debug/game`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshotDto {
    pub players: Vec<PlayerDto>,
    pub collectible: Option<CollectibleDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
}
