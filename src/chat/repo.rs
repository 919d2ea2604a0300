use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::ApiError;

/// Number of messages backfilled to a freshly opened connection.
pub const BACKFILL_LIMIT: i64 = 50;

/// Chat message record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: Option<i64>,
    pub message: String,
    pub created_at: i64,
}

pub async fn insert(
    db: &PgPool,
    sender_id: i64,
    receiver_id: Option<i64>,
    message: &str,
) -> Result<ChatMessage, ApiError> {
    let stored = sqlx::query_as::<_, ChatMessage>(
        r#"
        INSERT INTO chat_messages (sender_id, receiver_id, message)
        VALUES ($1, $2, $3)
        RETURNING id, sender_id, receiver_id, message, created_at
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .bind(message)
    .fetch_one(db)
    .await?;
    Ok(stored)
}

/// Turns a newest-first page into the order a client renders it: oldest
/// first, capped at `BACKFILL_LIMIT`.
pub fn chronological_backfill(mut rows: Vec<ChatMessage>) -> Vec<ChatMessage> {
    rows.truncate(BACKFILL_LIMIT as usize);
    rows.reverse();
    rows
}

/// The most recent messages, newest first. Callers reverse for display order.
pub async fn recent(db: &PgPool, limit: i64) -> Result<Vec<ChatMessage>, ApiError> {
    let rows = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, sender_id, receiver_id, message, created_at
        FROM chat_messages
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64, created_at: i64) -> ChatMessage {
        ChatMessage {
            id,
            sender_id: 1,
            receiver_id: None,
            message: format!("message {id}"),
            created_at,
        }
    }

    #[test]
    fn backfill_is_oldest_first() {
        // Query order: newest first.
        let rows = vec![message(3, 30), message(2, 20), message(1, 10)];
        let backfill = chronological_backfill(rows);
        let ids: Vec<i64> = backfill.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(backfill.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn backfill_keeps_at_most_the_limit_of_newest_messages() {
        let rows: Vec<ChatMessage> = (0..BACKFILL_LIMIT + 10)
            .map(|i| {
                let id = BACKFILL_LIMIT + 10 - i;
                message(id, id * 10)
            })
            .collect();
        let backfill = chronological_backfill(rows);
        assert_eq!(backfill.len(), BACKFILL_LIMIT as usize);
        // The oldest surviving message is the 50th-newest, not the 60th.
        assert_eq!(backfill.first().map(|m| m.id), Some(11));
        assert_eq!(backfill.last().map(|m| m.id), Some(BACKFILL_LIMIT + 10));
    }

    #[test]
    fn backfill_of_fewer_rows_than_limit_is_unchanged_in_length() {
        let rows = vec![message(2, 20), message(1, 10)];
        assert_eq!(chronological_backfill(rows).len(), 2);
    }
}
