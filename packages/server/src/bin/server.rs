//! Coin Dash game server.
//!
//! Holds the authoritative state of every connected player and of the live
//! collectible, and broadcasts every change to all clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin coin-dash-server
//! cargo run --bin coin-dash-server -- --host 0.0.0.0 --port 3000
//! PORT=8080 cargo run --bin coin-dash-server
//! ```
//!
//! Every flag can also be set through the environment or a `.env` file in the
//! working directory. Process environment wins over `.env`.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use clap::Parser;
use coin_dash_server::{
    domain::{
        CollectibleValue, Game, GameSettings, RandomPositionSource, Score, Timestamp,
    },
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryGameRepository},
    ui::{Server, StaticAssets},
    usecase::{
        ClaimCollectibleUseCase, ConnectClientUseCase, DisconnectPlayerUseCase,
        EventSequencer, GetGameStateUseCase, InitPlayerUseCase, MovePlayerUseCase,
    },
};
use coin_dash_shared::{
    logger::setup_logger,
    time::{SystemClock, get_timestamp},
};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "coin-dash-server")]
#[command(about = "Authoritative server for the Coin Dash multiplayer game", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Directory served under /public
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,

    /// Directory served under /assets
    #[arg(long, env = "ASSETS_DIR", default_value = "assets")]
    assets_dir: PathBuf,

    /// Directory containing index.html, served at /
    #[arg(long, env = "VIEWS_DIR", default_value = "views")]
    views_dir: PathBuf,

    /// Score that ends the round
    #[arg(
        long,
        env = "WIN_THRESHOLD",
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    win_threshold: u32,

    /// Points awarded per collectible
    #[arg(
        long,
        env = "COLLECTIBLE_VALUE",
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    collectible_value: u32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so its values act as env fallbacks
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);
    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory game)
    let collectible_value = match CollectibleValue::new(args.collectible_value) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let settings = GameSettings {
        win_threshold: Score::new(args.win_threshold),
        collectible_value,
        ..GameSettings::default()
    };
    let game = Game::new(
        settings,
        Timestamp::new(get_timestamp()),
        Arc::new(RandomPositionSource),
    );
    tracing::info!(
        "Round started: first to {} points wins ({} per collectible)",
        game.settings().win_threshold.value(),
        game.settings().collectible_value.value()
    );
    let repository = Arc::new(InMemoryGameRepository::new(Arc::new(Mutex::new(game))));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create UseCases (state-changing use cases share one sequencer)
    let sequencer = EventSequencer::new();
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(message_pusher.clone()));
    let init_player_usecase = Arc::new(InitPlayerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer.clone(),
    ));
    let move_player_usecase = Arc::new(MovePlayerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer.clone(),
    ));
    let claim_collectible_usecase = Arc::new(ClaimCollectibleUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        Arc::new(SystemClock),
        sequencer.clone(),
    ));
    let disconnect_player_usecase = Arc::new(DisconnectPlayerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        sequencer,
    ));
    let get_game_state_usecase = Arc::new(GetGameStateUseCase::new(repository.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        init_player_usecase,
        move_player_usecase,
        claim_collectible_usecase,
        disconnect_player_usecase,
        get_game_state_usecase,
    )
    .with_static_assets(StaticAssets {
        public_dir: args.public_dir,
        assets_dir: args.assets_dir,
        views_dir: args.views_dir,
    });
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
