//! UseCase 層のエラー定義

use thiserror::Error;

/// 接続処理のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("failed to assign a player id: {0}")]
    IdAssignmentFailed(String),
}

/// プレイヤー初期化のエラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InitPlayerError {
    /// スナップショットを要求元に届けられなかった（接続が既に閉じているなど）
    #[error("failed to deliver snapshot: {0}")]
    SnapshotDeliveryFailed(String),
}
