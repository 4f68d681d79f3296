//! UseCase: プレイヤー初期化処理（init-player）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - InitPlayerUseCase::execute() メソッド
//! - 登録・スナップショット返信・new-player のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 再初期化でプレイヤーが重複・リセットされないことを保証
//! - 新規参加者が自分を含む全プレイヤーと現在のコレクティブルを受け取ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規プレイヤーの初期化
//! - エッジケース：同じ接続からの再初期化
//! - 異常系：スナップショットの送信先が既に閉じている

use std::sync::Arc;

use crate::domain::{GameEvent, GameRepository, MessagePusher, PlayerId, PlayerInit, Registration};

use super::{EventSequencer, broadcast_targets, error::InitPlayerError};

/// プレイヤー初期化のユースケース
pub struct InitPlayerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn GameRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と送信の直列化
    sequencer: EventSequencer,
}

impl InitPlayerUseCase {
    /// 新しい InitPlayerUseCase を作成
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

    /// プレイヤー初期化を実行
    ///
    /// 1. 登録（登録済みなら既存のレコードを使う）
    /// 2. 要求元にスナップショット（init）を返信
    /// 3. 新規登録の場合のみ、他のクライアントに new-player をブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(Registration)` - 登録結果
    /// * `Err(InitPlayerError)` - スナップショットを返信できなかった
    pub async fn execute(
        &self,
        player_id: PlayerId,
        init: PlayerInit,
    ) -> Result<Registration, InitPlayerError> {
        let _turn = self.sequencer.enter().await;
        let registration = self
            .repository
            .register_player(player_id.clone(), init)
            .await;

        let reply = self
            .message_pusher
            .push_to(
                &player_id,
                &GameEvent::Init {
                    id: player_id.clone(),
                    snapshot: registration.snapshot.clone(),
                },
            )
            .await;

        if registration.created {
            let targets = broadcast_targets(self.message_pusher.as_ref(), Some(&player_id)).await;
            if let Err(e) = self
                .message_pusher
                .broadcast(targets, &GameEvent::NewPlayer(registration.player.clone()))
                .await
            {
                tracing::warn!("Failed to broadcast new-player for '{}': {}", player_id, e);
            }
        }

        reply.map_err(|e| InitPlayerError::SnapshotDeliveryFailed(e.to_string()))?;
        Ok(registration)
    }
}
