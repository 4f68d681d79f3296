//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectPlayerUseCase::execute() メソッド
//! - プレイヤーの削除と player-removed のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 切断後に遅れて届いたメッセージでレコードが復活しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みプレイヤーの切断
//! - エッジケース：init-player 前に切断した接続

use std::sync::Arc;

use crate::domain::{GameEvent, GameRepository, MessagePusher, Player, PlayerId};

use super::{EventSequencer, broadcast_targets};

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnection {
    /// 削除されたレコード（未登録の接続なら `None`）
    pub removed: Option<Player>,
    /// player-removed を送信したクライアント
    pub notified: Vec<PlayerId>,
}

/// 切断のユースケース
pub struct DisconnectPlayerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn GameRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と送信の直列化
    sequencer: EventSequencer,
}

impl DisconnectPlayerUseCase {
    /// 新しい DisconnectPlayerUseCase を作成
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

    /// 切断を実行
    ///
    /// 送信チャンネルを解除してからレコードを削除し、残りの全クライアントに
    /// player-removed を送信する。未登録の接続でもエラーにはしない。
    pub async fn execute(&self, player_id: &PlayerId) -> Disconnection {
        let _turn = self.sequencer.enter().await;
        self.message_pusher.unregister_client(player_id).await;
        let removed = self.repository.remove_player(player_id).await;

        let notified = broadcast_targets(self.message_pusher.as_ref(), None).await;
        if let Err(e) = self
            .message_pusher
            .broadcast(notified.clone(), &GameEvent::PlayerRemoved(player_id.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast player-removed for '{}': {}", player_id, e);
        }

        Disconnection { removed, notified }
    }
}
