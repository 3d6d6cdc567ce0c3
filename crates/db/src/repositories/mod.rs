//! Data-access repositories, one per table.
//!
//! Repositories are zero-sized structs with associated async functions that
//! take a `&PgPool`, so they carry no state and need no construction.

pub mod category_repo;
pub mod comment_repo;
pub mod genre_repo;
pub mod review_repo;
pub mod title_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use genre_repo::GenreRepo;
pub use review_repo::{PgReviewLookup, ReviewRepo};
pub use title_repo::TitleRepo;
pub use user_repo::UserRepo;
