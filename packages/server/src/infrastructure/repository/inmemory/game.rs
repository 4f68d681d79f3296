//! InMemory Game Repository 実装
//!
//! ドメイン層が定義する GameRepository trait の具体的な実装。
//! `Game` 集約を `tokio::sync::Mutex` で保持し、全ての操作をロック内で
//! 完結させることでイベントを到着順に 1 つずつ適用します。
//! 再起動をまたいだ永続化は行いません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClaimOutcome, CollectibleClaim, Game, GameRepository, Player, PlayerDelta, PlayerId,
    PlayerInit, Registration, Timestamp, WorldSnapshot,
};

/// インメモリ Game Repository 実装
pub struct InMemoryGameRepository {
    /// Game ドメインモデル
    game: Arc<Mutex<Game>>,
}

impl InMemoryGameRepository {
    /// 新しい InMemoryGameRepository を作成
    pub fn new(game: Arc<Mutex<Game>>) -> Self {
        Self { game }
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn register_player(&self, id: PlayerId, init: PlayerInit) -> Registration {
        let mut game = self.game.lock().await;
        game.register(id, init)
    }

    async fn apply_move(&self, id: &PlayerId, delta: PlayerDelta) -> Option<Player> {
        let mut game = self.game.lock().await;
        game.apply_move(id, &delta)
    }

    async fn remove_player(&self, id: &PlayerId) -> Option<Player> {
        let mut game = self.game.lock().await;
        game.remove(id)
    }

    async fn claim_collectible(&self, claim: CollectibleClaim, now: Timestamp) -> ClaimOutcome {
        let mut game = self.game.lock().await;
        game.claim(&claim, now)
    }

    async fn snapshot(&self) -> WorldSnapshot {
        let game = self.game.lock().await;
        game.snapshot()
    }

    async fn started_at(&self) -> Timestamp {
        let game = self.game.lock().await;
        game.started_at()
    }

    async fn count_players(&self) -> usize {
        let game = self.game.lock().await;
        game.players().len()
    }
}
