//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信のインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::GameEvent, value_object::PlayerId};

/// 接続ごとの送信チャンネル（エンコード済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// UseCase 層はこの trait を通してのみクライアントにイベントを届ける。
/// 配信はベストエフォートで、再送は行わない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel);

    /// 接続の送信チャンネルを削除
    async fn unregister_client(&self, player_id: &PlayerId);

    /// 接続中の全てのクライアント ID を取得（初期化前の接続も含む）
    async fn connected_clients(&self) -> Vec<PlayerId>;

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        player_id: &PlayerId,
        event: &GameEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<PlayerId>,
        event: &GameEvent,
    ) -> Result<(), MessagePushError>;
}
