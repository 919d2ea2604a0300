use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::ApiError;

/// Post record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: i64,
}

pub async fn create(db: &PgPool, author_id: i64, content: &str) -> Result<Post, ApiError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, content)
        VALUES ($1, $2)
        RETURNING id, author_id, content, created_at
        "#,
    )
    .bind(author_id)
    .bind(content)
    .fetch_one(db)
    .await?;
    Ok(post)
}

pub async fn list(db: &PgPool) -> Result<Vec<Post>, ApiError> {
    let rows = sqlx::query_as::<_, Post>(
        "SELECT id, author_id, content, created_at FROM posts ORDER BY id",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Post>, ApiError> {
    let row = sqlx::query_as::<_, Post>(
        "SELECT id, author_id, content, created_at FROM posts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn exists(db: &PgPool, id: i64) -> Result<bool, ApiError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

/// Owner-scoped update: the ownership predicate rides in the statement so a
/// racing delete or author change degrades to `None`, never a lost check.
pub async fn update(
    db: &PgPool,
    id: i64,
    author_id: i64,
    content: &str,
) -> Result<Option<Post>, ApiError> {
    let row = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET content = $3
        WHERE id = $1 AND author_id = $2
        RETURNING id, author_id, content, created_at
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
        "DELETE FROM posts WHERE id = $1 AND author_id = $2 RETURNING id",
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
    fn post_serializes_camel_case() {
        let post = Post {
            id: 3,
            author_id: 9,
            content: "hello".into(),
            created_at: 1_700_000_001,
        };
        let json = serde_json::to_string(&post).unwrap();
        assert!(json.contains("\"authorId\":9"));
        assert!(json.contains("\"createdAt\":1700000001"));
    }
}
