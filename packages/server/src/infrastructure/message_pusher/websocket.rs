//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - `GameEvent` を JSON テキストフレームにエンコードして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{GameEvent, MessagePushError, MessagePusher, PlayerId, PusherChannel},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.push_to(&player_id, &GameEvent::PlayerRemoved(other_id)).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: player_id (String)
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<String, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &GameEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(event))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(player_id.as_str().to_string(), sender);
        tracing::debug!("Client '{}' registered to MessagePusher", player_id);
    }

    async fn unregister_client(&self, player_id: &PlayerId) {
        let mut clients = self.clients.lock().await;
        clients.remove(player_id.as_str());
        tracing::debug!("Client '{}' unregistered from MessagePusher", player_id);
    }

    async fn connected_clients(&self) -> Vec<PlayerId> {
        let clients = self.clients.lock().await;
        clients
            .keys()
            .filter_map(|id| PlayerId::new(id.clone()).ok())
            .collect()
    }

    async fn push_to(
        &self,
        player_id: &PlayerId,
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(player_id.as_str())
            .ok_or_else(|| MessagePushError::ClientNotFound(player_id.as_str().to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to client '{}'", event.name(), player_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<PlayerId>,
        event: &GameEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(target.as_str()) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.clone()) {
                    tracing::warn!(
                        "Failed to push '{}' to client '{}': {}",
                        event.name(),
                        target,
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted '{}' to client '{}'", event.name(), target);
                }
            } else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}
