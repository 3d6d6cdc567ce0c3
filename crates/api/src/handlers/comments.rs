//! Handlers for comments nested under `/titles/{id}/reviews/{review_id}/comments`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use critiq_core::error::CoreError;
use critiq_core::review::validate_comment_text;
use critiq_core::roles::ensure_can_modify;
use critiq_core::types::DbId;
use critiq_db::models::comment::{Comment, CreateComment, UpdateComment};
use critiq_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::NOTHING_TO_UPDATE;
use crate::handlers::reviews::find_review;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_comment(pool: &sqlx::PgPool, review_id: DbId, comment_id: DbId) -> AppResult<Comment> {
    CommentRepo::find_in_review(pool, review_id, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))
}

/// GET /titles/{id}/reviews/{review_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    find_review(&state.pool, title_id, review_id).await?;
    let comments = CommentRepo::list_for_review(&state.pool, review_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// GET /titles/{id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    find_review(&state.pool, title_id, review_id).await?;
    let comment = find_comment(&state.pool, review_id, comment_id).await?;
    Ok(Json(DataResponse { data: comment }))
}

/// POST /titles/{id}/reviews/{review_id}/comments
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    JsonBody(input): JsonBody<CreateComment>,
) -> AppResult<impl IntoResponse> {
    find_review(&state.pool, title_id, review_id).await?;
    validate_comment_text(&input.text).map_err(AppError::Core)?;

    let comment = CommentRepo::create(&state.pool, review_id, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        review_id = review_id,
        comment_id = comment.id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// PATCH /titles/{id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    JsonBody(input): JsonBody<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    find_review(&state.pool, title_id, review_id).await?;
    let existing = find_comment(&state.pool, review_id, comment_id).await?;
    ensure_can_modify("comment", existing.author_id, auth.user_id, &auth.role)
        .map_err(AppError::Core)?;
    if input.is_empty() {
        return Err(AppError::BadRequest(NOTHING_TO_UPDATE.into()));
    }

    if let Some(ref text) = input.text {
        validate_comment_text(text).map_err(AppError::Core)?;
    }

    let comment = CommentRepo::update(&state.pool, review_id, comment_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;

    tracing::info!(
        user_id = auth.user_id,
        comment_id = comment_id,
        "Comment updated"
    );

    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /titles/{id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    find_review(&state.pool, title_id, review_id).await?;
    let existing = find_comment(&state.pool, review_id, comment_id).await?;
    ensure_can_modify("comment", existing.author_id, auth.user_id, &auth.role)
        .map_err(AppError::Core)?;

    CommentRepo::delete(&state.pool, review_id, comment_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        comment_id = comment_id,
        "Comment deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
