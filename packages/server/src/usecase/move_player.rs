//! UseCase: プレイヤー移動処理（move）
//!
//! 移動の内容は検証せずに受け入れる（`MovePolicy` の既定動作）。
//! ただし ID は常にサーバーが割り当てた値を維持する。

use std::sync::Arc;

use crate::domain::{GameEvent, GameRepository, MessagePusher, Player, PlayerDelta, PlayerId};

use super::{EventSequencer, broadcast_targets};

/// プレイヤー移動のユースケース
pub struct MovePlayerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn GameRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と送信の直列化
    sequencer: EventSequencer,
}

impl MovePlayerUseCase {
    /// 新しい MovePlayerUseCase を作成
    pub fn new(
        repository: Arc<dyn GameRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: EventSequencer,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// 移動を実行
    ///
    /// # Returns
    ///
    /// * `Some(Player)` - マージ後のレコード（他のクライアントに player-updated を送信済み）
    /// * `None` - 未登録の接続（切断後に遅れて届いたメッセージなど）。何も送信しない
    pub async fn execute(&self, player_id: &PlayerId, delta: PlayerDelta) -> Option<Player> {
        let _turn = self.sequencer.enter().await;
        let updated = self.repository.apply_move(player_id, delta).await?;

        let targets = broadcast_targets(self.message_pusher.as_ref(), Some(player_id)).await;
        if let Err(e) = self
            .message_pusher
            .broadcast(targets, &GameEvent::PlayerUpdated(updated.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast player-updated for '{}': {}", player_id, e);
        }

        Some(updated)
    }
}
