//! Handlers for reviews nested under `/titles/{id}/reviews`.
//!
//! Every create and update runs the review gate first, so invalid scores,
//! blank text, missing titles, and repeat reviews are rejected before any
//! write. `author` and `title` in the response come from the token and the
//! path, never from the payload.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use critiq_core::error::CoreError;
use critiq_core::review::{check_review_submission, ReviewDraft, ReviewWrite};
use critiq_core::roles::ensure_can_modify;
use critiq_core::types::DbId;
use critiq_db::models::review::{CreateReview, Review, UpdateReview};
use critiq_db::repositories::ReviewRepo;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::NOTHING_TO_UPDATE;
use crate::handlers::titles::ensure_title_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a review that belongs to `title_id`, or fail with 404.
pub async fn find_review(pool: &sqlx::PgPool, title_id: DbId, review_id: DbId) -> AppResult<Review> {
    ReviewRepo::find_in_title(pool, title_id, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))
}

/// GET /titles/{id}/reviews
///
/// Newest first.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_title_exists(&state.pool, title_id).await?;
    let reviews = ReviewRepo::list_for_title(&state.pool, title_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /titles/{id}/reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    Ok(Json(DataResponse { data: review }))
}

/// POST /titles/{id}/reviews
///
/// One review per author per title: a second attempt is a 409.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    JsonBody(input): JsonBody<CreateReview>,
) -> AppResult<impl IntoResponse> {
    let draft = ReviewDraft {
        text: Some(&input.text),
        score: Some(input.score),
    };
    check_review_submission(
        state.review_lookup.as_ref(),
        ReviewWrite::Create,
        title_id,
        auth.user_id,
        draft,
    )
    .await
    .map_err(AppError::Core)?;

    let review = ReviewRepo::create(&state.pool, title_id, auth.user_id, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        title_id = title_id,
        review_id = review.id,
        score = review.score,
        "Review created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// PATCH /titles/{id}/reviews/{review_id}
///
/// The duplicate check does not apply to updates.
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    JsonBody(input): JsonBody<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    let existing = find_review(&state.pool, title_id, review_id).await?;
    ensure_can_modify("review", existing.author_id, auth.user_id, &auth.role)
        .map_err(AppError::Core)?;
    if input.is_empty() {
        return Err(AppError::BadRequest(NOTHING_TO_UPDATE.into()));
    }

    let draft = ReviewDraft {
        text: input.text.as_deref(),
        score: input.score,
    };
    check_review_submission(
        state.review_lookup.as_ref(),
        ReviewWrite::Update,
        title_id,
        existing.author_id,
        draft,
    )
    .await
    .map_err(AppError::Core)?;

    let review = ReviewRepo::update(&state.pool, title_id, review_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;

    tracing::info!(
        user_id = auth.user_id,
        title_id = title_id,
        review_id = review_id,
        "Review updated"
    );

    Ok(Json(DataResponse { data: review }))
}

/// DELETE /titles/{id}/reviews/{review_id}
///
/// Comments on the review are removed with it.
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let existing = find_review(&state.pool, title_id, review_id).await?;
    ensure_can_modify("review", existing.author_id, auth.user_id, &auth.role)
        .map_err(AppError::Core)?;

    ReviewRepo::delete(&state.pool, title_id, review_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        title_id = title_id,
        review_id = review_id,
        "Review deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
