//! Integration tests for the game server using in-process servers and real sockets.

use std::{collections::HashMap, fs, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use coin_dash_server::{
    domain::{
        CollectibleValue, FixedPositionSource, Game, GameSettings, Position, Score, Timestamp,
    },
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryGameRepository},
    ui::{Server, StaticAssets},
    usecase::{
        ClaimCollectibleUseCase, ConnectClientUseCase, DisconnectPlayerUseCase, EventSequencer,
        GetGameStateUseCase, InitPlayerUseCase, MovePlayerUseCase,
    },
};
use coin_dash_shared::time::FixedClock;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::Mutex,
    task::JoinHandle,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const STARTED_AT: i64 = 1_700_000_000_000;
const FINISHED_AT: i64 = 1_700_000_060_000;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct to manage an in-process server bound to an ephemeral port
struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose collectibles spawn at predictable positions
    async fn start(win_threshold: u32) -> Self {
        Self::start_with(win_threshold, StaticAssets::default()).await
    }

    /// Start a server serving static files from the given directories
    async fn start_with(win_threshold: u32, static_assets: StaticAssets) -> Self {
        let settings = GameSettings {
            win_threshold: Score::new(win_threshold),
            collectible_value: CollectibleValue::default(),
            ..GameSettings::default()
        };
        let positions = FixedPositionSource::sequence(vec![
            Position::new(100, 100),
            Position::new(200, 200),
            Position::new(300, 300),
        ]);
        let game = Game::new(settings, Timestamp::new(STARTED_AT), Arc::new(positions));
        let repository = Arc::new(InMemoryGameRepository::new(Arc::new(Mutex::new(game))));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));

        let sequencer = EventSequencer::new();

        let server = Server::new(
            Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            Arc::new(InitPlayerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            Arc::new(MovePlayerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            Arc::new(ClaimCollectibleUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                Arc::new(FixedClock::new(FINISHED_AT)),
                sequencer.clone(),
            )),
            Arc::new(DisconnectPlayerUseCase::new(
                repository.clone(),
                message_pusher,
                sequencer,
            )),
            Arc::new(GetGameStateUseCase::new(repository)),
        )
        .with_static_assets(static_assets);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });

        TestServer { addr, handle }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> Client {
        let (ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        ws
    }

    /// Connect and join; returns the client with its `init` snapshot
    async fn join(&self, init: Value) -> (Client, Value) {
        let mut ws = self.connect().await;
        send(&mut ws, init).await;
        let snapshot = recv(&mut ws).await;
        assert_eq!(snapshot["type"], "init");
        (ws, snapshot)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Scratch directory holding a views/public/assets layout, removed on drop
struct StaticDirs {
    root: PathBuf,
}

impl StaticDirs {
    fn create() -> Self {
        let root = std::env::temp_dir().join(format!("coin-dash-{}", uuid::Uuid::new_v4()));
        for dir in ["views", "public", "assets"] {
            fs::create_dir_all(root.join(dir)).expect("Failed to create static dir");
        }
        fs::write(
            root.join("views/index.html"),
            "<!doctype html><title>Coin Dash</title>",
        )
        .expect("Failed to write index.html");
        fs::write(root.join("public/game.mjs"), "export const ready = true;\n")
            .expect("Failed to write game.mjs");
        fs::write(root.join("assets/coin.svg"), "<svg/>").expect("Failed to write coin.svg");
        StaticDirs { root }
    }

    fn assets(&self) -> StaticAssets {
        StaticAssets {
            public_dir: self.root.join("public"),
            assets_dir: self.root.join("assets"),
            views_dir: self.root.join("views"),
        }
    }
}

impl Drop for StaticDirs {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn assert_header_policy(headers: &reqwest::header::HeaderMap) {
    assert_eq!(headers["x-powered-by"], "PHP 7.4.3");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
    assert_eq!(
        headers["cache-control"],
        "no-store, no-cache, must-revalidate, proxy-revalidate"
    );
    assert_eq!(headers["pragma"], "no-cache");
    assert_eq!(headers["expires"], "0");
}

async fn send(ws: &mut Client, frame: Value) {
    ws.send(Message::text(frame.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Wait for the next text frame and parse it as JSON
async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Connection closed")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("Frame is not JSON");
        }
    }
}

/// Assert that no text frame arrives within a short window
async fn assert_silent(ws: &mut Client) {
    if let Ok(Some(Ok(Message::Text(text)))) =
        tokio::time::timeout(Duration::from_millis(200), ws.next()).await
    {
        panic!("Unexpected frame: {}", text.as_str());
    }
}

#[tokio::test]
async fn test_join_delivers_snapshot_and_announces_player() {
    // テスト項目: 参加者は自分を含むスナップショットを受け取り、既存の参加者には new-player が届く
    // given (前提条件):
    let server = TestServer::start(10).await;
    let (mut alice, alice_init) = server.join(json!({"type": "init-player", "x": 10, "y": 20})).await;
    let alice_id = alice_init["id"].as_str().unwrap().to_string();

    // when (操作):
    let (mut bob, bob_init) = server.join(json!({"type": "init-player"})).await;

    // then (期待する結果):
    let bob_id = bob_init["id"].as_str().unwrap().to_string();
    assert_ne!(alice_id, bob_id);
    assert_eq!(alice_init["players"], json!([{"id": alice_id, "x": 10, "y": 20, "score": 0}]));
    assert_eq!(alice_init["collectible"]["x"], 100);
    assert_eq!(alice_init["collectible"]["value"], 1);

    let players = bob_init["players"].as_array().unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0]["id"], alice_id.as_str());
    assert_eq!(players[1]["id"], bob_id.as_str());
    assert_eq!(bob_init["collectible"], alice_init["collectible"]);

    let announcement = recv(&mut alice).await;
    assert_eq!(announcement["type"], "new-player");
    assert_eq!(announcement["id"], bob_id.as_str());
    assert_silent(&mut bob).await;
}

#[tokio::test]
async fn test_repeated_init_resends_snapshot_only() {
    // テスト項目: 同じ接続からの 2 回目の init-player はスナップショットを再送するだけ
    // given (前提条件):
    let server = TestServer::start(10).await;
    let (mut alice, _) = server.join(json!({"type": "init-player"})).await;
    let (mut bob, _) = server.join(json!({"type": "init-player", "score": 3})).await;
    assert_eq!(recv(&mut alice).await["type"], "new-player");

    // when (操作):
    send(&mut bob, json!({"type": "init-player", "score": 9})).await;

    // then (期待する結果):
    let again = recv(&mut bob).await;
    assert_eq!(again["type"], "init");
    assert_eq!(again["players"].as_array().unwrap().len(), 2);
    assert_eq!(again["players"][1]["score"], 3);
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn test_move_is_broadcast_to_others_with_server_id() {
    // テスト項目: move は送信者以外に player-updated として届き、id は書き換えられない
    // given (前提条件):
    let server = TestServer::start(10).await;
    let (mut alice, alice_init) = server.join(json!({"type": "init-player"})).await;
    let alice_id = alice_init["id"].as_str().unwrap().to_string();
    let (mut bob, _) = server.join(json!({"type": "init-player"})).await;
    recv(&mut alice).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "move", "id": "someone-else", "x": 42, "y": "7", "score": 0}),
    )
    .await;

    // then (期待する結果):
    let update = recv(&mut bob).await;
    assert_eq!(
        update,
        json!({"type": "player-updated", "id": alice_id, "x": 42, "y": 7, "score": 0})
    );
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn test_claims_respawn_then_finish_the_round() {
    // テスト項目: 閾値未満の獲得で new-collectible、閾値到達で game-over が全員に届き、以降のクレームは無視される
    // given (前提条件):
    let server = TestServer::start(2).await;
    let (mut alice, alice_init) = server.join(json!({"type": "init-player", "x": 0, "y": 0})).await;
    let alice_id = alice_init["id"].as_str().unwrap().to_string();
    let (mut bob, _) = server.join(json!({"type": "init-player", "x": 5, "y": 5})).await;
    recv(&mut alice).await;
    let first_id = alice_init["collectible"]["id"].as_u64().unwrap();

    // when (操作):
    send(
        &mut alice,
        json!({"type": "claim", "playerId": alice_id, "collectibleId": first_id}),
    )
    .await;

    // then (期待する結果):
    for ws in [&mut alice, &mut bob] {
        let respawn = recv(ws).await;
        assert_eq!(respawn["type"], "new-collectible");
        assert_eq!(respawn["playerId"], alice_id.as_str());
        assert_eq!(respawn["players"][0]["score"], 1);
        assert_eq!(respawn["collectible"]["x"], 200);
        assert!(respawn["collectible"]["id"].as_u64().unwrap() > first_id);
    }

    // when (操作): 古い id のクレームは無視され、新しい id のクレーム（旧名 hit-coin）で勝利する
    let stale = json!({"type": "claim", "playerId": alice_id, "collectibleId": first_id});
    send(&mut alice, stale).await;
    assert_silent(&mut bob).await;

    let snapshot: Value = reqwest::get(server.http_url("/debug/game"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second_id = snapshot["collectible"]["id"].as_u64().unwrap();
    send(
        &mut alice,
        json!({"type": "hit-coin", "playerId": alice_id, "coinId": second_id}),
    )
    .await;

    // then (期待する結果):
    for ws in [&mut alice, &mut bob] {
        assert_eq!(
            recv(ws).await,
            json!({"type": "game-over", "winnerId": alice_id})
        );
    }

    send(
        &mut alice,
        json!({"type": "claim", "playerId": alice_id, "collectibleId": second_id}),
    )
    .await;
    assert_silent(&mut bob).await;

    let summary: Value = reqwest::get(server.http_url("/api/game"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["status"], "finished");
    assert_eq!(summary["winnerId"], alice_id.as_str());
    assert_eq!(summary["collectible"], Value::Null);
    assert_eq!(summary["leaderboard"][0]["score"], 2);
    assert_eq!(summary["finishedAt"], "2023-11-14T22:14:20+00:00");
}

#[tokio::test]
async fn test_forged_claim_is_discarded() {
    // テスト項目: 他人の playerId を名乗るクレームは破棄され、誰にも何も届かない
    // given (前提条件):
    let server = TestServer::start(10).await;
    let (mut alice, alice_init) = server.join(json!({"type": "init-player"})).await;
    let alice_id = alice_init["id"].as_str().unwrap().to_string();
    let (mut bob, _) = server.join(json!({"type": "init-player"})).await;
    recv(&mut alice).await;
    let collectible_id = alice_init["collectible"]["id"].as_u64().unwrap();

    // when (操作):
    send(
        &mut bob,
        json!({"type": "claim", "playerId": alice_id, "collectibleId": collectible_id}),
    )
    .await;

    // then (期待する結果):
    assert_silent(&mut alice).await;
    assert_silent(&mut bob).await;
    let snapshot: Value = reqwest::get(server.http_url("/debug/game"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["collectible"]["id"], collectible_id);
}

#[tokio::test]
async fn test_disconnect_removes_player_and_notifies_others() {
    // テスト項目: 切断したプレイヤーは削除され、残りのクライアントに player-removed が届く
    // given (前提条件):
    let server = TestServer::start(10).await;
    let (mut alice, _) = server.join(json!({"type": "init-player"})).await;
    let (mut bob, bob_init) = server.join(json!({"type": "init-player"})).await;
    let bob_id = bob_init["id"].as_str().unwrap().to_string();
    recv(&mut alice).await;

    // when (操作):
    bob.close(None).await.unwrap();

    // then (期待する結果):
    assert_eq!(
        recv(&mut alice).await,
        json!({"type": "player-removed", "id": bob_id})
    );
    let summary: Value = reqwest::get(server.http_url("/api/game"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["playerCount"], 1);
}

#[tokio::test]
async fn test_malformed_frames_do_not_break_the_connection() {
    // テスト項目: 解析できないフレームを送っても接続は維持され、その後のイベントは処理される
    // given (前提条件):
    let server = TestServer::start(10).await;
    let mut alice = server.connect().await;

    // when (操作):
    alice.send(Message::text("{not json")).await.unwrap();
    send(&mut alice, json!({"type": "teleport", "x": 1})).await;
    send(&mut alice, json!({"type": "init-player"})).await;

    // then (期待する結果):
    assert_eq!(recv(&mut alice).await["type"], "init");
}

#[tokio::test]
async fn test_http_endpoints_apply_header_policy() {
    // テスト項目: HTTP レスポンスにヘッダーポリシーが付与され、API が期待する JSON を返す
    // given (前提条件):
    let server = TestServer::start(10).await;

    // when (操作):
    let health = reqwest::get(server.http_url("/api/health")).await.unwrap();
    let summary = reqwest::get(server.http_url("/api/game")).await.unwrap();

    // then (期待する結果):
    assert_header_policy(health.headers());
    assert_eq!(health.json::<Value>().await.unwrap(), json!({"status": "ok"}));

    let summary: Value = summary.json().await.unwrap();
    assert_eq!(summary["status"], "active");
    assert_eq!(summary["playerCount"], 0);
    assert_eq!(summary["leaderboard"], json!([]));
    assert_eq!(summary["startedAt"], "2023-11-14T22:13:20+00:00");
    assert_eq!(summary["collectible"]["x"], 100);
}

#[tokio::test]
async fn test_static_files_are_served_unmodified() {
    // テスト項目: / は views/index.html を、/public と /assets は各ディレクトリのファイルをそのまま返す
    // given (前提条件):
    let dirs = StaticDirs::create();
    let server = TestServer::start_with(10, dirs.assets()).await;

    // when (操作):
    let index = reqwest::get(server.http_url("/")).await.unwrap();
    let script = reqwest::get(server.http_url("/public/game.mjs")).await.unwrap();
    let image = reqwest::get(server.http_url("/assets/coin.svg")).await.unwrap();
    let missing = reqwest::get(server.http_url("/public/missing.js")).await.unwrap();

    // then (期待する結果):
    assert_eq!(index.status(), reqwest::StatusCode::OK);
    assert_header_policy(index.headers());
    assert_eq!(
        index.text().await.unwrap(),
        "<!doctype html><title>Coin Dash</title>"
    );

    assert_eq!(script.status(), reqwest::StatusCode::OK);
    assert_header_policy(script.headers());
    assert_eq!(script.text().await.unwrap(), "export const ready = true;\n");

    assert_eq!(image.text().await.unwrap(), "<svg/>");
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}
