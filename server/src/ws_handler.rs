use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::{Message, WebSocket};
use common::games::tictactoe::{GameCommand, SessionUpdate, TicTacToeSession};
use common::games::{ChannelBroadcaster, SessionRng};
use common::{error, log, warn};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::web_server::WebServerState;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// One game session per socket. Text frames carry JSON `GameCommand`s in and
/// JSON `SessionUpdate`s out.
pub async fn handle_websocket(socket: WebSocket, state: WebServerState) {
    let session_id = format!("ttt-{}", NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (update_tx, mut update_rx) = mpsc::channel::<SessionUpdate>(64);
    let (session, session_task) = TicTacToeSession::spawn(
        session_id.clone(),
        (*state.game_settings).clone(),
        SessionRng::from_random(),
        ChannelBroadcaster::new(update_tx),
    );

    let send_session_id = session_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            let text = match serde_json::to_string(&update) {
                Ok(text) => text,
                Err(e) => {
                    error!("[session:{}] failed to encode update: {}", send_session_id, e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        let text = match result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("[session:{}] websocket error: {}", session_id, e);
                break;
            }
        };

        let command: GameCommand = match serde_json::from_str(text.as_str()) {
            Ok(command) => command,
            Err(e) => {
                warn!("[session:{}] ignoring malformed command: {}", session_id, e);
                continue;
            }
        };

        if session.send(command).await.is_err() {
            break;
        }
    }

    drop(session);
    if let Err(e) = session_task.await {
        error!("[session:{}] session task failed: {}", session_id, e);
    }
    let _ = send_task.await;
    log!("[session:{}] websocket closed", session_id);
}
