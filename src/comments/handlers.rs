use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::auth::ownership::{authorize, ResourceKind};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::{accounts, posts};

use super::dto::{CreateCommentRequest, UpdateCommentRequest};
use super::repo::{self, Comment};

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", post(create_comment))
        .route("/comments", get(list_comments))
        .route("/comments/:id", get(get_comment))
        .route("/comments/:id", put(update_comment))
        .route("/comments/:id", delete(delete_comment))
}

#[instrument(skip(state, payload))]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    payload.validate()?;

    if !accounts::repo::exists(&state.db, payload.author_id).await? {
        return Err(ApiError::NotFound("account"));
    }
    if !posts::repo::exists(&state.db, payload.post_id).await? {
        return Err(ApiError::NotFound("post"));
    }

    let created = repo::create(
        &state.db,
        payload.author_id,
        payload.post_id,
        &payload.content,
    )
    .await?;
    info!(
        comment_id = created.id,
        post_id = created.post_id,
        "comment created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = repo::list(&state.db).await?;
    Ok(Json(comments))
}

#[instrument(skip(state))]
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Comment>, ApiError> {
    let found = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("comment"))?;
    Ok(Json(found))
}

#[instrument(skip(state, payload))]
pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    authorize(&state.db, ResourceKind::Comment, id, caller).await?;
    payload.validate()?;

    let content = payload.content.unwrap_or_default();
    let updated = repo::update(&state.db, id, caller, &content)
        .await?
        .ok_or(ApiError::NotFound("comment"))?;
    info!(comment_id = id, "comment updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state.db, ResourceKind::Comment, id, caller).await?;

    repo::delete(&state.db, id, caller)
        .await?
        .ok_or(ApiError::NotFound("comment"))?;
    info!(comment_id = id, "comment deleted");
    Ok(Json(json!({ "message": "comment deleted" })))
}
