use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::auth::ownership::{authorize, ResourceKind};
use crate::auth::password::hash_password;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CreateAccountRequest, UpdateAccountRequest};
use super::repo::{self, Account, AccountChanges, NewAccount};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts", get(list_accounts))
        .route("/accounts/:id", get(get_account))
        .route("/accounts/:id", put(update_account))
        .route("/accounts/:id", delete(delete_account))
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;
    let account = repo::create(
        &state.db,
        &NewAccount {
            username: payload.username,
            email: payload.email.trim().to_lowercase(),
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            address: payload.address,
            country: payload.country,
            city: payload.city,
            phone: payload.phone,
            gender: payload.gender,
            citizenship: payload.citizenship,
        },
    )
    .await?;

    info!(account_id = account.id, "account created");
    Ok((StatusCode::CREATED, Json(account)))
}

#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = repo::list(&state.db).await?;
    Ok(Json(accounts))
}

#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Account>, ApiError> {
    let account = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("account"))?;
    Ok(Json(account))
}

#[instrument(skip(state, payload))]
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<Account>, ApiError> {
    authorize(&state.db, ResourceKind::Account, id, caller).await?;
    payload.validate()?;

    let password_hash = match &payload.password {
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };
    let changes = AccountChanges {
        username: payload.username,
        email: payload.email.map(|e| e.trim().to_lowercase()),
        password_hash,
    };

    let account = repo::update(&state.db, id, &changes)
        .await?
        .ok_or(ApiError::NotFound("account"))?;
    info!(account_id = id, "account updated");
    Ok(Json(account))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state.db, ResourceKind::Account, id, caller).await?;

    repo::delete(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("account"))?;
    info!(account_id = id, "account deleted");
    Ok(Json(json!({ "message": "account deleted" })))
}
