//! Repository trait 定義
//!
//! ドメイン層が必要とするゲーム状態へのアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは `Game` 集約に対する 1 回の操作を原子的に実行する。
//! 実装はすべての呼び出しを直列化しなければならない。

use async_trait::async_trait;

use super::{
    ClaimOutcome, CollectibleClaim, Player, PlayerDelta, PlayerId, PlayerInit, Registration,
    Timestamp, WorldSnapshot,
};

/// Game Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// プレイヤーを登録（登録済みなら既存のレコードを返す）
    async fn register_player(&self, id: PlayerId, init: PlayerInit) -> Registration;

    /// 移動を適用（未登録なら `None`）
    async fn apply_move(&self, id: &PlayerId, delta: PlayerDelta) -> Option<Player>;

    /// プレイヤーを削除（未登録なら `None`）
    async fn remove_player(&self, id: &PlayerId) -> Option<Player>;

    /// コレクティブルのクレームを判定
    async fn claim_collectible(&self, claim: CollectibleClaim, now: Timestamp) -> ClaimOutcome;

    /// 現在のワールドスナップショットを取得
    async fn snapshot(&self) -> WorldSnapshot;

    /// ラウンドの開始時刻を取得
    async fn started_at(&self) -> Timestamp;

    /// 登録済みのプレイヤー数を取得
    async fn count_players(&self) -> usize;
}
