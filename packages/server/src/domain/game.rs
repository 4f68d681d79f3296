//! The `Game` aggregate.
//!
//! Owns every piece of shared mutable state of a round: the session registry
//! (connected players in insertion order) and the game state coordinator (the
//! single live collectible, scoring and the win condition). All mutation goes
//! through `&mut self`, so whoever holds the aggregate serializes events and
//! two claims on one collectible can never both be awarded.

use std::sync::Arc;

use super::{
    entity::{Collectible, Player},
    policy::{MovePolicy, PlayerDelta, PositionSource, SpawnArea, TrustedMovePolicy},
    value_object::{CollectibleId, CollectibleValue, PlayerId, Position, Score, Timestamp},
};

/// Round tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub spawn_area: SpawnArea,
    /// A claim that brings a player to this score ends the round.
    pub win_threshold: Score,
    pub collectible_value: CollectibleValue,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            spawn_area: SpawnArea::default(),
            win_threshold: Score::new(10),
            collectible_value: CollectibleValue::default(),
        }
    }
}

/// Start state requested by a joining client. Absent fields are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerInit {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub score: Option<u32>,
}

/// A client's assertion that `player_id` touched collectible `collectible_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectibleClaim {
    pub player_id: PlayerId,
    pub collectible_id: CollectibleId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStatus {
    Active,
    Finished {
        winner: PlayerId,
        finished_at: Timestamp,
    },
}

impl RoundStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, RoundStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        match self {
            RoundStatus::Active => None,
            RoundStatus::Finished { winner, .. } => Some(winner),
        }
    }
}

/// Full world state: every player in insertion order plus the live collectible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSnapshot {
    pub players: Vec<Player>,
    /// `None` once the round is finished.
    pub collectible: Option<Collectible>,
    pub status: RoundStatus,
}

impl WorldSnapshot {
    /// Players by descending score; ties keep join order.
    pub fn leaderboard(&self) -> Vec<Player> {
        let mut ranked = self.players.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }
}

/// Result of `Game::register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub player: Player,
    /// `false` when the connection was already registered.
    pub created: bool,
    /// World state taken right after registration.
    pub snapshot: WorldSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The round already has a winner.
    RoundOver,
    /// The claimed id is not the live collectible (replayed, forged or lost a race).
    Stale,
    /// The claimant is not registered.
    UnknownPlayer,
    /// Winning claim: the round is now finished and no collectible is respawned.
    Awarded { player: Player, new_score: Score },
    /// Non-winning claim: a fresh collectible replaced the claimed one.
    AwardedAndRespawned {
        player: Player,
        new_score: Score,
        collectible: Collectible,
        players: Vec<Player>,
    },
}

pub struct Game {
    players: Vec<Player>,
    collectible: Option<Collectible>,
    status: RoundStatus,
    started_at: Timestamp,
    next_collectible_id: u64,
    settings: GameSettings,
    positions: Arc<dyn PositionSource>,
    move_policy: Arc<dyn MovePolicy>,
}

impl Game {
    /// Start a round with one collectible and no players.
    ///
    /// Collectible ids count up from `started_at` so they never repeat within a
    /// process and are unlikely to repeat across restarts.
    pub fn new(
        settings: GameSettings,
        started_at: Timestamp,
        positions: Arc<dyn PositionSource>,
    ) -> Self {
        let mut game = Self {
            players: Vec::new(),
            collectible: None,
            status: RoundStatus::Active,
            started_at,
            next_collectible_id: u64::try_from(started_at.value()).unwrap_or_default(),
            settings,
            positions,
            move_policy: Arc::new(TrustedMovePolicy),
        };
        game.collectible = Some(game.spawn_collectible());
        game
    }

    /// Replace the policy used by `apply_move`.
    pub fn with_move_policy(mut self, move_policy: Arc<dyn MovePolicy>) -> Self {
        self.move_policy = move_policy;
        self
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn status(&self) -> &RoundStatus {
        &self.status
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn current_collectible(&self) -> Option<&Collectible> {
        self.collectible.as_ref()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            players: self.players.clone(),
            collectible: self.collectible.clone(),
            status: self.status.clone(),
        }
    }

    /// Register the player for `id`, or return the existing record unchanged.
    pub fn register(&mut self, id: PlayerId, init: PlayerInit) -> Registration {
        if let Some(existing) = self.player(&id) {
            return Registration {
                player: existing.clone(),
                created: false,
                snapshot: self.snapshot(),
            };
        }

        let spawn = self.positions.next_position(&self.settings.spawn_area);
        let player = Player::new(
            id,
            Position::new(init.x.unwrap_or(spawn.x), init.y.unwrap_or(spawn.y)),
            init.score.map(Score::new).unwrap_or_else(Score::zero),
        );
        self.players.push(player.clone());

        Registration {
            player,
            created: true,
            snapshot: self.snapshot(),
        }
    }

    /// Merge `delta` into the player's record. Unknown ids are ignored.
    pub fn apply_move(&mut self, id: &PlayerId, delta: &PlayerDelta) -> Option<Player> {
        let slot = self.players.iter_mut().find(|p| &p.id == id)?;
        let mut merged = self.move_policy.apply(slot, delta);
        // identity is never taken from the policy or the client
        merged.id = slot.id.clone();
        *slot = merged.clone();
        Some(merged)
    }

    pub fn remove(&mut self, id: &PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| &p.id == id)?;
        Some(self.players.remove(index))
    }

    /// Arbitrate a pickup claim against the live collectible.
    pub fn claim(&mut self, claim: &CollectibleClaim, now: Timestamp) -> ClaimOutcome {
        if self.status.is_finished() {
            return ClaimOutcome::RoundOver;
        }
        let value = match &self.collectible {
            Some(live) if live.id == claim.collectible_id => live.value,
            _ => return ClaimOutcome::Stale,
        };
        let Some(slot) = self.players.iter_mut().find(|p| p.id == claim.player_id) else {
            return ClaimOutcome::UnknownPlayer;
        };

        slot.score = slot.score.award(value);
        let player = slot.clone();
        let new_score = player.score;

        if new_score >= self.settings.win_threshold {
            self.collectible = None;
            self.status = RoundStatus::Finished {
                winner: player.id.clone(),
                finished_at: now,
            };
            return ClaimOutcome::Awarded { player, new_score };
        }

        let collectible = self.spawn_collectible();
        self.collectible = Some(collectible.clone());
        ClaimOutcome::AwardedAndRespawned {
            player,
            new_score,
            collectible,
            players: self.players.clone(),
        }
    }

    fn spawn_collectible(&mut self) -> Collectible {
        let id = CollectibleId::new(self.next_collectible_id);
        self.next_collectible_id = self.next_collectible_id.wrapping_add(1);
        Collectible::new(
            id,
            self.positions.next_position(&self.settings.spawn_area),
            self.settings.collectible_value,
        )
    }
}
