//! Handlers for the `/titles` resource.
//!
//! Clients reference a title's category and genres by slug; the handlers
//! resolve slugs to IDs before touching the title tables. Unknown slugs in a
//! payload are a validation error, not a 404.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use critiq_core::catalog::{current_year, validate_display_name, validate_year};
use critiq_core::error::CoreError;
use critiq_core::types::DbId;
use critiq_core::validation::validate_input;
use critiq_db::models::title::{CreateTitle, TitleFilter, TitleWithRelations, UpdateTitle};
use critiq_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::NOTHING_TO_UPDATE;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Verify that a title exists, returning an error if not found.
pub async fn ensure_title_exists(pool: &sqlx::PgPool, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(pool, title_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id: title_id,
        }))
    }
}

async fn load_title(pool: &sqlx::PgPool, id: DbId) -> AppResult<TitleWithRelations> {
    TitleRepo::find_with_relations(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Title", id }))
}

/// Resolve a category slug to its ID.
async fn resolve_category(pool: &sqlx::PgPool, slug: &str) -> AppResult<DbId> {
    CategoryRepo::find_by_slug(pool, slug)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| AppError::Core(CoreError::Validation(format!("Unknown category '{slug}'"))))
}

/// Resolve genre slugs to IDs, rejecting any slug that does not exist.
async fn resolve_genres(pool: &sqlx::PgPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let wanted: BTreeSet<&str> = slugs.iter().map(String::as_str).collect();
    let unique: Vec<String> = wanted.iter().map(|s| s.to_string()).collect();
    let found = GenreRepo::find_by_slugs(pool, &unique).await?;

    if found.len() != unique.len() {
        let known: BTreeSet<&str> = found.iter().map(|g| g.slug.as_str()).collect();
        let missing: Vec<&str> = wanted.difference(&known).copied().collect();
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown genre(s): {}",
            missing.join(", ")
        ))));
    }

    Ok(found.into_iter().map(|g| g.id).collect())
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// GET /titles?category=&genre=&name=&year=
pub async fn list_titles(
    State(state): State<AppState>,
    Query(filter): Query<TitleFilter>,
) -> AppResult<impl IntoResponse> {
    let titles = TitleRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: titles }))
}

/// GET /titles/{id}
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let title = load_title(&state.pool, id).await?;
    Ok(Json(DataResponse { data: title }))
}

/// POST /titles
pub async fn create_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTitle>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input).map_err(AppError::Core)?;
    validate_display_name(&input.name).map_err(AppError::Core)?;
    validate_year(input.year, current_year()).map_err(AppError::Core)?;

    let category_id = match input.category.as_deref() {
        Some(slug) => Some(resolve_category(&state.pool, slug).await?),
        None => None,
    };
    let genre_ids = resolve_genres(&state.pool, &input.genre).await?;

    let created = TitleRepo::create(&state.pool, &input, category_id, &genre_ids).await?;
    let title = load_title(&state.pool, created.id).await?;

    tracing::info!(
        user_id = admin.user_id,
        title_id = title.id,
        genre_count = genre_ids.len(),
        "Title created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: title })))
}

/// PATCH /titles/{id}
pub async fn update_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    JsonBody(input): JsonBody<UpdateTitle>,
) -> AppResult<impl IntoResponse> {
    ensure_title_exists(&state.pool, id).await?;
    if input.is_empty() {
        return Err(AppError::BadRequest(NOTHING_TO_UPDATE.into()));
    }

    validate_input(&input).map_err(AppError::Core)?;
    if let Some(ref name) = input.name {
        validate_display_name(name).map_err(AppError::Core)?;
    }
    if let Some(year) = input.year {
        validate_year(year, current_year()).map_err(AppError::Core)?;
    }

    // Outer `None` keeps the category, `Some(None)` detaches it.
    let category_id = match &input.category {
        Some(Some(slug)) => Some(Some(resolve_category(&state.pool, slug).await?)),
        Some(None) => Some(None),
        None => None,
    };
    let genre_ids = match input.genre.as_deref() {
        Some(slugs) => Some(resolve_genres(&state.pool, slugs).await?),
        None => None,
    };

    TitleRepo::update(&state.pool, id, &input, category_id, genre_ids.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Title", id }))?;
    let title = load_title(&state.pool, id).await?;

    tracing::info!(user_id = admin.user_id, title_id = id, "Title updated");

    Ok(Json(DataResponse { data: title }))
}

/// DELETE /titles/{id}
///
/// Reviews and their comments are removed with the title.
pub async fn delete_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TitleRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Title", id }));
    }

    tracing::info!(user_id = admin.user_id, title_id = id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}
