//! Server execution logic.

use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    http::{HeaderName, HeaderValue, header},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::usecase::{
    ClaimCollectibleUseCase, ConnectClientUseCase, DisconnectPlayerUseCase, GetGameStateUseCase,
    InitPlayerUseCase, MovePlayerUseCase,
};

use super::{
    handler::{debug_game_state, get_game, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Error type returned by the server entry points
pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// Directories served as static content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAssets {
    /// Served under `/public`
    pub public_dir: PathBuf,
    /// Served under `/assets`
    pub assets_dir: PathBuf,
    /// Holds `index.html`, served at `/`
    pub views_dir: PathBuf,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            assets_dir: PathBuf::from("assets"),
            views_dir: PathBuf::from("views"),
        }
    }
}

/// Coin collection game server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     init_player_usecase,
///     move_player_usecase,
///     claim_collectible_usecase,
///     disconnect_player_usecase,
///     get_game_state_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// ConnectClientUseCase（接続のユースケース）
    connect_client_usecase: Arc<ConnectClientUseCase>,
    /// InitPlayerUseCase（プレイヤー初期化のユースケース）
    init_player_usecase: Arc<InitPlayerUseCase>,
    /// MovePlayerUseCase（移動のユースケース）
    move_player_usecase: Arc<MovePlayerUseCase>,
    /// ClaimCollectibleUseCase（クレームのユースケース）
    claim_collectible_usecase: Arc<ClaimCollectibleUseCase>,
    /// DisconnectPlayerUseCase（切断のユースケース）
    disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    /// GetGameStateUseCase（ゲーム状態取得のユースケース）
    get_game_state_usecase: Arc<GetGameStateUseCase>,
    static_assets: StaticAssets,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_client_usecase` - UseCase for accepting a connection
    /// * `init_player_usecase` - UseCase for `init-player`
    /// * `move_player_usecase` - UseCase for `move`
    /// * `claim_collectible_usecase` - UseCase for `claim`
    /// * `disconnect_player_usecase` - UseCase for connection close
    /// * `get_game_state_usecase` - UseCase for the HTTP read endpoints
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        init_player_usecase: Arc<InitPlayerUseCase>,
        move_player_usecase: Arc<MovePlayerUseCase>,
        claim_collectible_usecase: Arc<ClaimCollectibleUseCase>,
        disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
        get_game_state_usecase: Arc<GetGameStateUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            init_player_usecase,
            move_player_usecase,
            claim_collectible_usecase,
            disconnect_player_usecase,
            get_game_state_usecase,
            static_assets: StaticAssets::default(),
        }
    }

    /// Override the directories served as static content
    pub fn with_static_assets(mut self, static_assets: StaticAssets) -> Self {
        self.static_assets = static_assets;
        self
    }

    /// Run the game server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", bind_addr);

        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();

        // Start the server
        tracing::info!("Coin dash server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            init_player_usecase: self.init_player_usecase,
            move_player_usecase: self.move_player_usecase,
            claim_collectible_usecase: self.claim_collectible_usecase,
            disconnect_player_usecase: self.disconnect_player_usecase,
            get_game_state_usecase: self.get_game_state_usecase,
        });
        let assets = self.static_assets;

        // Define handlers
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/debug/game", get(debug_game_state))
            .route("/api/health", get(health_check))
            .route("/api/game", get(get_game))
            // 静的ファイル
            .route_service("/", ServeFile::new(assets.views_dir.join("index.html")))
            .nest_service("/public", ServeDir::new(assets.public_dir))
            .nest_service("/assets", ServeDir::new(assets.assets_dir))
            .with_state(app_state)
            // レスポンスヘッダーポリシー
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_XSS_PROTECTION,
                HeaderValue::from_static("1; mode=block"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::PRAGMA,
                HeaderValue::from_static("no-cache"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::EXPIRES,
                HeaderValue::from_static("0"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static("x-powered-by"),
                HeaderValue::from_static("PHP 7.4.3"),
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }
}
