//! Route definitions for categories and genres.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{categories, genres};
use crate::state::AppState;

/// Category routes, registered as `/categories`.
///
/// ```text
/// GET    /                  list_categories
/// POST   /                  create_category (admin)
/// DELETE /{slug}            delete_category (admin)
/// ```
pub fn categories_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/{slug}", delete(categories::delete_category))
}

/// Genre routes, registered as `/genres`.
///
/// ```text
/// GET    /                  list_genres
/// POST   /                  create_genre (admin)
/// DELETE /{slug}            delete_genre (admin)
/// ```
pub fn genres_router() -> Router<AppState> {
    Router::new()
        .route("/", get(genres::list_genres).post(genres::create_genre))
        .route("/{slug}", delete(genres::delete_genre))
}
