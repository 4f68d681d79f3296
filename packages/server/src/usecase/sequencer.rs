//! イベントの直列化
//!
//! 状態の変更と、その変更を知らせる送信を 1 つの単位として実行します。
//! 単位どうしは到着順に 1 つずつ実行されるため、どのクライアントも
//! サーバーが適用した順番どおりにイベントを受け取ります。

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// 状態変更と送信を直列に実行するためのロック
///
/// 状態を変更するユースケースはすべて同じインスタンス（のクローン）を共有する。
/// `tokio::sync::Mutex` は待機順に取得されるため、到着順がそのまま適用順になる。
#[derive(Debug, Clone, Default)]
pub struct EventSequencer {
    turn: Arc<Mutex<()>>,
}

impl EventSequencer {
    /// 新しい EventSequencer を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 自分の番になるまで待つ
    ///
    /// ガードを保持している間、他のユースケースは状態の変更も送信も開始できない。
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }
}
