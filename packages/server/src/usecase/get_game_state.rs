//! UseCase: ゲーム状態の取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{GameRepository, Timestamp, WorldSnapshot};

/// ある時点のゲーム状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub snapshot: WorldSnapshot,
    pub started_at: Timestamp,
}

/// ゲーム状態取得のユースケース
pub struct GetGameStateUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn GameRepository>,
}

impl GetGameStateUseCase {
    /// 新しい GetGameStateUseCase を作成
    pub fn new(repository: Arc<dyn GameRepository>) -> Self {
        Self { repository }
    }

    /// 現在のゲーム状態を取得（副作用なし）
    pub async fn execute(&self) -> GameState {
        GameState {
            snapshot: self.repository.snapshot().await,
            started_at: self.repository.started_at().await,
        }
    }
}
