//! UseCase: クライアント接続処理
//!
//! 接続ごとにサーバー側で PlayerId を払い出し、送信チャンネルを登録する。
//! プレイヤーのレコードは `init-player` を受け取るまで作成しない。

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId, PlayerIdFactory, PusherChannel};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(PlayerId)` - この接続に割り当てた ID
    /// * `Err(ConnectError)` - ID の払い出しに失敗
    pub async fn execute(&self, sender: PusherChannel) -> Result<PlayerId, ConnectError> {
        let player_id = PlayerIdFactory::generate()
            .map_err(|e| ConnectError::IdAssignmentFailed(e.to_string()))?;
        self.message_pusher
            .register_client(player_id.clone(), sender)
            .await;
        Ok(player_id)
    }
}
