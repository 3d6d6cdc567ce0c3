//! Comment model and DTOs.

use critiq_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub review_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    pub author: String,
    pub text: String,
    pub pub_date: Timestamp,
}

/// DTO for creating a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub text: String,
}

/// DTO for updating a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComment {
    pub text: Option<String>,
}

impl UpdateComment {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}
