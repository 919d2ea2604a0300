use std::collections::HashSet;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{error, info, warn};

use crate::state::AppState;

use super::events::{ChatEvent, ClientEvent};
use super::repo::{self, BACKFILL_LIMIT};

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One connection's lifecycle: register, backfill once, then pump events
/// both ways until either side closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Register before the backfill query so a message persisted while the
    // query runs buffers in the channel instead of slipping past both paths.
    // The id set below keeps buffered copies of backfilled messages from
    // being replayed.
    let (conn_id, mut rx) = state.chat.register().await;

    let history = match repo::recent(&state.db, BACKFILL_LIMIT).await {
        Ok(rows) => repo::chronological_backfill(rows),
        Err(e) => {
            error!(error = %e, "chat backfill failed, closing connection");
            state.chat.unregister(conn_id).await;
            return;
        }
    };
    let backfill_ids: HashSet<i64> = history.iter().map(|m| m.id).collect();

    let backfill = serde_json::to_string(&ChatEvent::PastMessages(history)).unwrap();
    if sender.send(Message::Text(backfill)).await.is_err() {
        state.chat.unregister(conn_id).await;
        return;
    }
    info!(conn_id, "chat connection active");

    // Forward hub events to this client.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if already_backfilled(&backfill_ids, &event) {
                continue;
            }
            let text = serde_json::to_string(&event).unwrap();
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Read frames from the client.
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => handle_frame(&recv_state, &text).await,
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.chat.unregister(conn_id).await;
    info!(conn_id, "chat connection closed");
}

/// True when the event carries a message this connection already received
/// through its backfill.
fn already_backfilled(backfill_ids: &HashSet<i64>, event: &ChatEvent) -> bool {
    match event {
        ChatEvent::ChatMessage(m) => backfill_ids.contains(&m.id),
        ChatEvent::PastMessages(_) => false,
    }
}

/// Handles one inbound frame. Malformed payloads are dropped with a warning;
/// a persistence failure suppresses the broadcast so history and the live
/// view never diverge.
async fn handle_frame(state: &AppState, text: &str) {
    let payload = match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::ChatMessage(payload)) => payload,
        Err(e) => {
            // Char-based truncation: a byte slice could land inside a
            // multibyte character and panic on attacker-controlled input.
            let preview: String = text.chars().take(200).collect();
            warn!(error = %e, raw = %preview, "bad chat frame");
            return;
        }
    };

    if payload.message.trim().is_empty() {
        warn!(sender_id = payload.sender_id, "empty chat message dropped");
        return;
    }

    if let Err(e) = super::send_message(
        &state.db,
        &state.chat,
        payload.sender_id,
        payload.receiver_id,
        &payload.message,
    )
    .await
    {
        error!(error = %e, sender_id = payload.sender_id, "chat persist failed, message dropped");
    }
}
