pub mod catalog;
pub mod health;
pub mod titles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                      list, create (admin)
/// /categories/{slug}                               delete (admin)
///
/// /genres                                          list, create (admin)
/// /genres/{slug}                                   delete (admin)
///
/// /titles                                          list (filters), create (admin)
/// /titles/{id}                                     get, update, delete (admin)
/// /titles/{id}/reviews                             list, create (auth)
/// /titles/{id}/reviews/{review_id}                 get, update, delete (author/moderator/admin)
/// /titles/{id}/reviews/{review_id}/comments        list, create (auth)
/// /titles/{id}/reviews/{review_id}/comments/{comment_id}
///                                                  get, update, delete (author/moderator/admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", catalog::categories_router())
        .nest("/genres", catalog::genres_router())
        .nest("/titles", titles::router())
}
