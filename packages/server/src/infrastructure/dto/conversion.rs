//! Conversion logic between DTOs and domain types.

use serde_json::Value;

use crate::domain::{
    ClaimOutcome, Collectible, CollectibleClaim, CollectibleId, GameEvent, Player, PlayerDelta,
    PlayerId, PlayerInit, RoundStatus, ValueObjectError, WorldSnapshot,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

/// Read a client-supplied number the way a lenient JavaScript client would
/// produce it: integers, floats (truncated) or numeric strings.
fn lenient_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

fn lenient_u32(value: Option<&Value>) -> Option<u32> {
    lenient_i64(value).and_then(|n| u32::try_from(n).ok())
}

impl From<dto::InitPlayerPayload> for PlayerInit {
    fn from(payload: dto::InitPlayerPayload) -> Self {
        Self {
            x: lenient_i64(payload.x.as_ref()),
            y: lenient_i64(payload.y.as_ref()),
            score: lenient_u32(payload.score.as_ref()),
        }
    }
}

impl From<dto::MovePayload> for PlayerDelta {
    fn from(payload: dto::MovePayload) -> Self {
        Self {
            x: lenient_i64(payload.x.as_ref()),
            y: lenient_i64(payload.y.as_ref()),
            score: lenient_u32(payload.score.as_ref()),
        }
    }
}

impl TryFrom<dto::ClaimPayload> for CollectibleClaim {
    type Error = ValueObjectError;

    fn try_from(payload: dto::ClaimPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            player_id: PlayerId::new(payload.player_id)?,
            collectible_id: CollectibleId::new(payload.collectible_id),
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Player> for dto::PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.as_str().to_string(),
            x: player.position.x,
            y: player.position.y,
            score: player.score.value(),
        }
    }
}

impl From<&Collectible> for dto::CollectibleDto {
    fn from(collectible: &Collectible) -> Self {
        Self {
            id: collectible.id.value(),
            x: collectible.position.x,
            y: collectible.position.y,
            value: collectible.value.value(),
        }
    }
}

fn players_to_dto(players: &[Player]) -> Vec<dto::PlayerDto> {
    players.iter().map(dto::PlayerDto::from).collect()
}

impl From<&GameEvent> for dto::ServerMessage {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::Init { id, snapshot } => dto::ServerMessage::Init {
                id: id.as_str().to_string(),
                players: players_to_dto(&snapshot.players),
                collectible: snapshot.collectible.as_ref().map(dto::CollectibleDto::from),
                winner_id: snapshot.status.winner().map(|w| w.as_str().to_string()),
            },
            GameEvent::NewPlayer(player) => dto::ServerMessage::NewPlayer(player.into()),
            GameEvent::PlayerUpdated(player) => dto::ServerMessage::PlayerUpdated(player.into()),
            GameEvent::PlayerRemoved(id) => dto::ServerMessage::PlayerRemoved {
                id: id.as_str().to_string(),
            },
            GameEvent::NewCollectible {
                collectible,
                player_id,
                players,
            } => dto::ServerMessage::NewCollectible {
                collectible: collectible.into(),
                player_id: player_id.as_str().to_string(),
                players: players_to_dto(players),
            },
            GameEvent::GameOver { winner } => dto::ServerMessage::GameOver {
                winner_id: winner.as_str().to_string(),
            },
        }
    }
}

impl From<&WorldSnapshot> for http::WorldSnapshotDto {
    fn from(snapshot: &WorldSnapshot) -> Self {
        Self {
            players: players_to_dto(&snapshot.players),
            collectible: snapshot.collectible.as_ref().map(dto::CollectibleDto::from),
            winner_id: snapshot.status.winner().map(|w| w.as_str().to_string()),
        }
    }
}

/// Build the leaderboard section of the game summary from ranked players.
pub fn leaderboard_to_dto(ranked: &[Player]) -> Vec<http::LeaderboardEntryDto> {
    ranked
        .iter()
        .enumerate()
        .map(|(index, player)| http::LeaderboardEntryDto {
            rank: index + 1,
            id: player.id.as_str().to_string(),
            score: player.score.value(),
        })
        .collect()
}

/// Wire label of a round status.
pub fn status_label(status: &RoundStatus) -> &'static str {
    match status {
        RoundStatus::Active => "active",
        RoundStatus::Finished { .. } => "finished",
    }
}

/// Short label of a claim outcome, used for logging.
pub fn claim_outcome_label(outcome: &ClaimOutcome) -> &'static str {
    match outcome {
        ClaimOutcome::RoundOver => "round-over",
        ClaimOutcome::Stale => "stale",
        ClaimOutcome::UnknownPlayer => "unknown-player",
        ClaimOutcome::Awarded { .. } => "awarded",
        ClaimOutcome::AwardedAndRespawned { .. } => "awarded-and-respawned",
    }
}
