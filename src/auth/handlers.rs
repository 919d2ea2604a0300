use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::accounts::repo;
use crate::auth::dto::{AuthResponse, LoginRequest, RefreshRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let account = match repo::find_by_username(&state.db, &payload.username).await? {
        Some(a) => a,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::Unauthorized);
        }
    };

    if !verify_password(&payload.password, &account.password_hash)? {
        warn!(account_id = account.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(account.id)?;
    let refresh_token = keys.sign_refresh(account.id)?;

    info!(account_id = account.id, "logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        account,
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Unauthorized)?;

    let account = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let access_token = keys.sign_access(account.id)?;
    let refresh_token = keys.sign_refresh(account.id)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        account,
    }))
}
