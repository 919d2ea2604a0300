use axum::{routing::get, Router};
use sqlx::PgPool;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub mod connection;
pub mod events;
pub mod hub;
pub mod repo;

pub use hub::ChatHub;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", get(connection::ws_handler))
}

/// Persist-then-broadcast: the message is written to the store first, and
/// only a durably stored message is fanned out to live connections. Both the
/// live socket path and the load generator go through here.
pub async fn send_message(
    db: &PgPool,
    hub: &ChatHub,
    sender_id: i64,
    receiver_id: Option<i64>,
    message: &str,
) -> Result<repo::ChatMessage, ApiError> {
    let stored = repo::insert(db, sender_id, receiver_id, message).await?;
    debug!(message_id = stored.id, sender_id, "chat message persisted");
    hub.broadcast(events::ChatEvent::ChatMessage(stored.clone())).await;
    Ok(stored)
}
