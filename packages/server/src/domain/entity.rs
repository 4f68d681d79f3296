//! Entities of the game domain.

use super::value_object::{CollectibleId, CollectibleValue, PlayerId, Position, Score};

/// A connected player's authoritative record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub position: Position,
    pub score: Score,
}

impl Player {
    pub fn new(id: PlayerId, position: Position, score: Score) -> Self {
        Self {
            id,
            position,
            score,
        }
    }
}

/// The single item players race to pick up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collectible {
    pub id: CollectibleId,
    pub position: Position,
    pub value: CollectibleValue,
}

impl Collectible {
    pub fn new(id: CollectibleId, position: Position, value: CollectibleValue) -> Self {
        Self {
            id,
            position,
            value,
        }
    }
}
