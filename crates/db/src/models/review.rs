//! Review model and DTOs.

use critiq_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A review joined with its title name and author username.
///
/// `title` and `author` are read-only in the API; clients never send them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub title_id: DbId,
    pub title: String,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    pub author: String,
    pub text: String,
    pub score: i32,
    pub pub_date: Timestamp,
}

/// DTO for creating a review. Validated by the review gate, not by derive.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub text: String,
    pub score: i32,
}

/// DTO for a partial review update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i32>,
}

impl UpdateReview {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.score.is_none()
    }
}
