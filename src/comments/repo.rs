use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::ApiError;

/// Comment record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
    pub created_at: i64,
}

pub async fn create(
    db: &PgPool,
    author_id: i64,
    post_id: i64,
    content: &str,
) -> Result<Comment, ApiError> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (author_id, post_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, author_id, post_id, content, created_at
        "#,
    )
    .bind(author_id)
    .bind(post_id)
    .bind(content)
    .fetch_one(db)
    .await?;
    Ok(comment)
}

pub async fn list(db: &PgPool) -> Result<Vec<Comment>, ApiError> {
    let rows = sqlx::query_as::<_, Comment>(
        "SELECT id, author_id, post_id, content, created_at FROM comments ORDER BY id",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Comment>, ApiError> {
    let row = sqlx::query_as::<_, Comment>(
        "SELECT id, author_id, post_id, content, created_at FROM comments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Owner-scoped update, same contract as the posts repo.
pub async fn update(
    db: &PgPool,
    id: i64,
    author_id: i64,
    content: &str,
) -> Result<Option<Comment>, ApiError> {
    let row = sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET content = $3
        WHERE id = $1 AND author_id = $2
        RETURNING id, author_id, post_id, content, created_at
        "#,
    )
    .bind(id)
    .bind(author_id)
    .bind(content)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: i64, author_id: i64) -> Result<Option<i64>, ApiError> {
    let deleted = sqlx::query_scalar::<_, i64>(
        "DELETE FROM comments WHERE id = $1 AND author_id = $2 RETURNING id",
    )
    .bind(id)
    .bind(author_id)
    .fetch_optional(db)
    .await?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_serializes_camel_case() {
        let comment = Comment {
            id: 1,
            author_id: 2,
            post_id: 3,
            content: "nice".into(),
            created_at: 1_700_000_002,
        };
        let json = serde_json::to_string(&comment).unwrap();
        assert!(json.contains("\"authorId\":2"));
        assert!(json.contains("\"postId\":3"));
        assert!(json.contains("\"createdAt\":1700000002"));
    }
}
