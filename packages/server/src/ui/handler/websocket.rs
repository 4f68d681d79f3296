//! WebSocket connection handlers.
//!
//! One task reads this client's frames and dispatches them to the use cases one
//! at a time; another drains the client's outbound channel into the socket.
//! Whichever finishes first tears the connection down.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{CollectibleClaim, PlayerId},
    infrastructure::dto::{conversion::claim_outcome_label, websocket::ClientMessage},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives encoded events from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this client to receive events
    let (tx, rx) = mpsc::unbounded_channel();
    let player_id = match state.connect_client_usecase.execute(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to accept connection: {}", e);
            return;
        }
    };
    tracing::info!("Client '{}' connected", player_id);

    let send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_player_id = player_id.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", recv_player_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&recv_state, &recv_player_id, &text).await,
                Message::Ping(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping from '{}'", recv_player_id);
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_player_id);
                    break;
                }
                _ => {}
            }
        }
    });

    close_tasks(recv_task, send_task).await;

    let disconnection = state
        .disconnect_player_usecase
        .execute(&player_id)
        .await;
    tracing::info!(
        "Client '{}' disconnected (registered: {}, notified: {})",
        player_id,
        disconnection.removed.is_some(),
        disconnection.notified.len()
    );
}

/// Wait for either task to complete, then abort the other.
///
/// Returns only after the receive task has stopped, so no dispatch can touch
/// game state once the connection is being torn down.
async fn close_tasks(mut recv_task: JoinHandle<()>, mut send_task: JoinHandle<()>) {
    let recv_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };

    if recv_finished {
        send_task.abort();
    } else {
        recv_task.abort();
        let _ = recv_task.await;
    }
}

/// Route one inbound text frame to its use case.
///
/// Malformed frames are dropped; nothing is ever sent back as an error.
async fn dispatch(state: &AppState, player_id: &PlayerId, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Discarding malformed message from '{}': {}", player_id, e);
            return;
        }
    };

    match message {
        ClientMessage::InitPlayer(payload) => {
            match state
                .init_player_usecase
                .execute(player_id.clone(), payload.into())
                .await
            {
                Ok(registration) if registration.created => {
                    let position = registration.player.position;
                    tracing::info!(
                        "Player '{}' joined at ({}, {})",
                        player_id,
                        position.x,
                        position.y
                    );
                }
                Ok(_) => {
                    tracing::debug!("Player '{}' re-sent init-player; snapshot resent", player_id);
                }
                Err(e) => {
                    tracing::warn!("Failed to initialize player '{}': {}", player_id, e);
                }
            }
        }
        ClientMessage::Move(payload) => {
            let updated = state
                .move_player_usecase
                .execute(player_id, payload.into())
                .await;
            if updated.is_none() {
                tracing::debug!("Ignoring move from unregistered client '{}'", player_id);
            }
        }
        ClientMessage::Claim(payload) => {
            let claim = match CollectibleClaim::try_from(payload) {
                Ok(claim) => claim,
                Err(e) => {
                    tracing::warn!("Discarding claim from '{}': {}", player_id, e);
                    return;
                }
            };
            if let Some(outcome) = state
                .claim_collectible_usecase
                .execute(player_id, claim)
                .await
            {
                tracing::debug!(
                    "Claim from '{}' resolved as {}",
                    player_id,
                    claim_outcome_label(&outcome)
                );
            }
        }
    }
}
