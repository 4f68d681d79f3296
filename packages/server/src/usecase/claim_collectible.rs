//! UseCase: コレクティブルのクレーム処理（claim）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ClaimCollectibleUseCase::execute() メソッド
//! - 判定結果に応じた new-collectible / game-over のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 1 つのコレクティブルで 2 回以上加算されないことを保証
//! - 勝利条件を満たしたときに game-over が 1 回だけ送られることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：加算と再出現
//! - 正常系：勝利によるラウンド終了
//! - 異常系：古い ID・他人の ID を使ったクレーム、終了後のクレーム

use std::sync::Arc;

use coin_dash_shared::time::Clock;

use crate::domain::{
    ClaimOutcome, CollectibleClaim, GameEvent, GameRepository, MessagePusher, PlayerId, Timestamp,
};

use super::{EventSequencer, broadcast_targets};

/// コレクティブルのクレームのユースケース
pub struct ClaimCollectibleUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn GameRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// ラウンド終了時刻の記録に使う時計
    clock: Arc<dyn Clock>,
    /// 状態変更と送信の直列化
    sequencer: EventSequencer,
}

impl ClaimCollectibleUseCase {
    /// 新しい ClaimCollectibleUseCase を作成
    pub fn new(
        repository: Arc<dyn GameRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        sequencer: EventSequencer,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            sequencer,
        }
    }

    /// クレームを実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クレームを送ってきた接続の ID
    /// * `claim` - クレーム内容
    ///
    /// # Returns
    ///
    /// * `Some(ClaimOutcome)` - 判定結果（加算時は全クライアントに送信済み）
    /// * `None` - 他の接続のプレイヤーを名乗るクレーム。判定せずに破棄
    pub async fn execute(
        &self,
        sender: &PlayerId,
        claim: CollectibleClaim,
    ) -> Option<ClaimOutcome> {
        if &claim.player_id != sender {
            tracing::warn!(
                "Discarding claim from '{}' on behalf of '{}'",
                sender,
                claim.player_id
            );
            return None;
        }

        // 判定から送信までを 1 単位とし、new-collectible が適用順に届くようにする
        let _turn = self.sequencer.enter().await;
        let now = Timestamp::new(self.clock.now_millis());
        let outcome = self.repository.claim_collectible(claim, now).await;

        let event = match &outcome {
            ClaimOutcome::Awarded { player, new_score } => {
                tracing::info!(
                    "Player '{}' reached {} points and wins the round",
                    player.id,
                    new_score.value()
                );
                Some(GameEvent::GameOver {
                    winner: player.id.clone(),
                })
            }
            ClaimOutcome::AwardedAndRespawned {
                player,
                collectible,
                players,
                ..
            } => Some(GameEvent::NewCollectible {
                collectible: collectible.clone(),
                player_id: player.id.clone(),
                players: players.clone(),
            }),
            ClaimOutcome::RoundOver | ClaimOutcome::Stale | ClaimOutcome::UnknownPlayer => None,
        };

        if let Some(event) = event {
            let targets = broadcast_targets(self.message_pusher.as_ref(), None).await;
            if let Err(e) = self.message_pusher.broadcast(targets, &event).await {
                tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
            }
        }

        Some(outcome)
    }
}
