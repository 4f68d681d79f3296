//! Events pushed from the server to connected clients.

use super::{
    entity::{Collectible, Player},
    game::WorldSnapshot,
    value_object::PlayerId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Full world state, sent only to the client that asked to join.
    Init { id: PlayerId, snapshot: WorldSnapshot },
    NewPlayer(Player),
    PlayerUpdated(Player),
    PlayerRemoved(PlayerId),
    NewCollectible {
        collectible: Collectible,
        player_id: PlayerId,
        players: Vec<Player>,
    },
    GameOver { winner: PlayerId },
}

impl GameEvent {
    /// Wire name of the event, used for logging.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Init { .. } => "init",
            GameEvent::NewPlayer(_) => "new-player",
            GameEvent::PlayerUpdated(_) => "player-updated",
            GameEvent::PlayerRemoved(_) => "player-removed",
            GameEvent::NewCollectible { .. } => "new-collectible",
            GameEvent::GameOver { .. } => "game-over",
        }
    }
}
