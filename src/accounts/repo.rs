use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::{unique_violation, ApiError};

const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                       address, country, city, phone, gender, citizenship, created_at";

/// Account record in the database. The credential hash is never serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub citizenship: Option<String>,
    pub created_at: i64,
}

/// Fields for a new account row; the hash is already computed.
#[derive(Debug)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub citizenship: Option<String>,
}

/// Optional-field update; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

pub async fn create(db: &PgPool, new: &NewAccount) -> Result<Account, ApiError> {
    let sql = format!(
        r#"
        INSERT INTO accounts (username, email, password_hash, first_name, last_name,
                              address, country, city, phone, gender, citizenship)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {COLUMNS}
        "#
    );
    sqlx::query_as::<_, Account>(&sql)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.address)
        .bind(&new.country)
        .bind(&new.city)
        .bind(&new.phone)
        .bind(&new.gender)
        .bind(&new.citizenship)
        .fetch_one(db)
        .await
        .map_err(|e| unique_violation(e, "username or email"))
}

pub async fn list(db: &PgPool) -> Result<Vec<Account>, ApiError> {
    let sql = format!("SELECT {COLUMNS} FROM accounts ORDER BY id");
    let rows = sqlx::query_as::<_, Account>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Account>, ApiError> {
    let sql = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
    let row = sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<Account>, ApiError> {
    let sql = format!("SELECT {COLUMNS} FROM accounts WHERE username = $1");
    let row = sqlx::query_as::<_, Account>(&sql)
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Partial update; absent fields keep their value. Returns `None` when the
/// row no longer exists.
pub async fn update(
    db: &PgPool,
    id: i64,
    changes: &AccountChanges,
) -> Result<Option<Account>, ApiError> {
    let sql = format!(
        r#"
        UPDATE accounts
        SET username      = COALESCE($2, username),
            email         = COALESCE($3, email),
            password_hash = COALESCE($4, password_hash)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    );
    sqlx::query_as::<_, Account>(&sql)
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(db)
        .await
        .map_err(|e| unique_violation(e, "username or email"))
}

pub async fn delete(db: &PgPool, id: i64) -> Result<Option<i64>, ApiError> {
    let deleted = sqlx::query_scalar::<_, i64>("DELETE FROM accounts WHERE id = $1 RETURNING id")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(deleted)
}

pub async fn exists(db: &PgPool, id: i64) -> Result<bool, ApiError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let account = Account {
            id: 1,
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: Some("Alice".into()),
            last_name: None,
            address: None,
            country: None,
            city: None,
            phone: None,
            gender: None,
            citizenship: None,
            created_at: 1_700_000_000,
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("\"username\":\"alice\""));
        assert!(json.contains("\"createdAt\":1700000000"));
        assert!(json.contains("\"firstName\":\"Alice\""));
    }
}
