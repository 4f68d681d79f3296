//! Server state shared by all handlers.

use std::sync::Arc;

use crate::usecase::{
    ClaimCollectibleUseCase, ConnectClientUseCase, DisconnectPlayerUseCase, GetGameStateUseCase,
    InitPlayerUseCase, MovePlayerUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// InitPlayerUseCase（プレイヤー初期化のユースケース）
    pub init_player_usecase: Arc<InitPlayerUseCase>,
    /// MovePlayerUseCase（移動のユースケース）
    pub move_player_usecase: Arc<MovePlayerUseCase>,
    /// ClaimCollectibleUseCase（クレームのユースケース）
    pub claim_collectible_usecase: Arc<ClaimCollectibleUseCase>,
    /// DisconnectPlayerUseCase（切断のユースケース）
    pub disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    /// GetGameStateUseCase（ゲーム状態取得のユースケース）
    pub get_game_state_usecase: Arc<GetGameStateUseCase>,
}
