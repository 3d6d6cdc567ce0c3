//! Handlers for the `/categories` resource.
//!
//! Categories are addressed by slug. Deleting one leaves its titles in place
//! with no category.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use critiq_core::catalog::{validate_display_name, validate_slug};
use critiq_core::error::CoreError;
use critiq_core::validation::validate_input;
use critiq_db::models::category::CreateCategory;
use critiq_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /categories
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input).map_err(AppError::Core)?;
    validate_slug(&input.slug).map_err(AppError::Core)?;
    validate_display_name(&input.name).map_err(AppError::Core)?;

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = admin.user_id,
        category_id = category.id,
        slug = %category.slug,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// DELETE /categories/{slug}
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !CategoryRepo::delete_by_slug(&state.pool, &slug).await? {
        return Err(AppError::Core(CoreError::SlugNotFound {
            entity: "Category",
            slug,
        }));
    }

    tracing::info!(user_id = admin.user_id, slug = %slug, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
