//! Handlers for the `/genres` resource.
//!
//! Genres are addressed by slug. Deleting one detaches it from every title.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use critiq_core::catalog::{validate_display_name, validate_slug};
use critiq_core::error::CoreError;
use critiq_core::validation::validate_input;
use critiq_db::models::genre::CreateGenre;
use critiq_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let genres = GenreRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// POST /genres
pub async fn create_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateGenre>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input).map_err(AppError::Core)?;
    validate_slug(&input.slug).map_err(AppError::Core)?;
    validate_display_name(&input.name).map_err(AppError::Core)?;

    let genre = GenreRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        genre_id = genre.id,
        slug = %genre.slug,
        "Genre created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// DELETE /genres/{slug}
pub async fn delete_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !GenreRepo::delete_by_slug(&state.pool, &slug).await? {
        return Err(AppError::Core(CoreError::SlugNotFound {
            entity: "Genre",
            slug,
        }));
    }

    tracing::info!(user_id = admin.user_id, slug = %slug, "Genre deleted");

    Ok(StatusCode::NO_CONTENT)
}
