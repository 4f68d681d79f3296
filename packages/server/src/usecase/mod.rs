//! UseCase 層
//!
//! クライアントから届く各イベント（接続・初期化・移動・クレーム・切断）を
//! 1 つのユースケースとして実装します。UseCase は `GameRepository` と
//! `MessagePusher` の trait にのみ依存します。
//! 状態を変更するユースケースは `EventSequencer` を共有し、変更と送信を
//! 到着順に 1 つずつ実行します。

mod claim_collectible;
mod connect_client;
mod disconnect_player;
mod error;
mod get_game_state;
mod init_player;
mod move_player;
mod sequencer;

pub use claim_collectible::ClaimCollectibleUseCase;
pub use connect_client::ConnectClientUseCase;
pub use disconnect_player::{DisconnectPlayerUseCase, Disconnection};
pub use error::{ConnectError, InitPlayerError};
pub use get_game_state::{GameState, GetGameStateUseCase};
pub use init_player::InitPlayerUseCase;
pub use move_player::MovePlayerUseCase;
pub use sequencer::EventSequencer;

use crate::domain::{MessagePusher, PlayerId};

/// 接続中の全クライアントから `exclude` を除いたブロードキャスト対象を取得
async fn broadcast_targets(
    message_pusher: &dyn MessagePusher,
    exclude: Option<&PlayerId>,
) -> Vec<PlayerId> {
    message_pusher
        .connected_clients()
        .await
        .into_iter()
        .filter(|id| Some(id) != exclude)
        .collect()
}
