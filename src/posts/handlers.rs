use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::accounts;
use crate::auth::ownership::{authorize, ResourceKind};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CreatePostRequest, UpdatePostRequest};
use super::repo::{self, Post};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts", get(list_posts))
        .route("/posts/:id", get(get_post))
        .route("/posts/:id", put(update_post))
        .route("/posts/:id", delete(delete_post))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    payload.validate()?;

    if !accounts::repo::exists(&state.db, payload.author_id).await? {
        return Err(ApiError::NotFound("account"));
    }

    let created = repo::create(&state.db, payload.author_id, &payload.content).await?;
    info!(post_id = created.id, author_id = created.author_id, "post created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = repo::list(&state.db).await?;
    Ok(Json(posts))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Post>, ApiError> {
    let found = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    Ok(Json(found))
}

#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    authorize(&state.db, ResourceKind::Post, id, caller).await?;
    payload.validate()?;

    let content = payload.content.unwrap_or_default();
    let updated = repo::update(&state.db, id, caller, &content)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    info!(post_id = id, "post updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state.db, ResourceKind::Post, id, caller).await?;

    repo::delete(&state.db, id, caller)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    info!(post_id = id, "post deleted");
    Ok(Json(json!({ "message": "post deleted" })))
}
