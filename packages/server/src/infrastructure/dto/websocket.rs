//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `type` with camelCase fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    InitPlayer(InitPlayerPayload),
    #[serde(alias = "update")]
    Move(MovePayload),
    #[serde(alias = "hit-coin")]
    Claim(ClaimPayload),
}

/// Requested start state. Numeric fields may be numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitPlayerPayload {
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub y: Option<Value>,
    #[serde(default)]
    pub score: Option<Value>,
}

/// Proposed player state. `id` is accepted for compatibility and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub y: Option<Value>,
    #[serde(default)]
    pub score: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPayload {
    pub player_id: String,
    #[serde(alias = "coinId")]
    pub collectible_id: u64,
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Init {
        id: String,
        players: Vec<PlayerDto>,
        collectible: Option<CollectibleDto>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner_id: Option<String>,
    },
    NewPlayer(PlayerDto),
    PlayerUpdated(PlayerDto),
    PlayerRemoved {
        id: String,
    },
    NewCollectible {
        collectible: CollectibleDto,
        player_id: String,
        players: Vec<PlayerDto>,
    },
    GameOver {
        winner_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectibleDto {
    pub id: u64,
    pub x: i64,
    pub y: i64,
    pub value: u32,
}
