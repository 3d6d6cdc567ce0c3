//! Review and comment rules, and the review gate.
//!
//! Every review write passes through [`check_review_submission`] before it
//! reaches storage. The gate checks that the title exists, that the text and
//! score are acceptable, and, on creation only, that the author has not
//! already reviewed the title.
//!
//! The duplicate check is a read followed by a later write, so it is not
//! atomic. The `uq_reviews_title_author` constraint in the database is what
//! actually guarantees one review per author per title; the gate exists to
//! give a clear error in the common case.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Lowest accepted review score.
pub const MIN_SCORE: i32 = 1;

/// Highest accepted review score.
pub const MAX_SCORE: i32 = 10;

/// Maximum length for a review's text.
pub const MAX_REVIEW_TEXT_LENGTH: usize = 200;

/// Maximum length for a comment's text.
pub const MAX_COMMENT_TEXT_LENGTH: usize = 200;

/// Message returned when an author tries to review the same title twice.
pub const DUPLICATE_REVIEW_MESSAGE: &str = "You have already left a review for this title";

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate that a score lies in `MIN_SCORE..=MAX_SCORE`.
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Score must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

fn validate_text(text: &str, what: &str, max: usize) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(format!("{what} text must not be empty")));
    }

    if text.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{what} text exceeds maximum length of {max} characters"
        )));
    }

    Ok(())
}

/// Validate a review body: not blank, at most [`MAX_REVIEW_TEXT_LENGTH`] characters.
pub fn validate_review_text(text: &str) -> Result<(), CoreError> {
    validate_text(text, "Review", MAX_REVIEW_TEXT_LENGTH)
}

/// Validate a comment body: not blank, at most [`MAX_COMMENT_TEXT_LENGTH`] characters.
pub fn validate_comment_text(text: &str) -> Result<(), CoreError> {
    validate_text(text, "Comment", MAX_COMMENT_TEXT_LENGTH)
}

/* --------------------------------------------------------------------------
Review gate
-------------------------------------------------------------------------- */

/// Whether a review is being created or an existing one updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewWrite {
    Create,
    Update,
}

/// Read-only data access the review gate needs.
///
/// Implemented by the database layer for production and by in-memory
/// doubles in tests.
#[async_trait]
pub trait ReviewLookup: Send + Sync {
    /// Whether a title with this id exists.
    async fn title_exists(&self, title_id: DbId) -> Result<bool, CoreError>;

    /// Whether `author_id` already has a review on `title_id`.
    async fn review_exists(&self, title_id: DbId, author_id: DbId) -> Result<bool, CoreError>;
}

/// The fields of a review write that the gate inspects.
///
/// On update both fields are optional because only supplied fields change.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewDraft<'a> {
    pub text: Option<&'a str>,
    pub score: Option<i32>,
}

/// Decide whether a review write may proceed.
///
/// Checks, in order:
/// 1. the title exists (`NotFound` otherwise),
/// 2. supplied text and score are valid (`Validation`),
/// 3. on [`ReviewWrite::Create`] only, the author has no review on this
///    title yet (`Conflict`).
///
/// Nothing is written; the caller persists the review afterwards.
pub async fn check_review_submission<L>(
    lookup: &L,
    write: ReviewWrite,
    title_id: DbId,
    author_id: DbId,
    draft: ReviewDraft<'_>,
) -> Result<(), CoreError>
where
    L: ReviewLookup + ?Sized,
{
    if !lookup.title_exists(title_id).await? {
        return Err(CoreError::NotFound {
            entity: "Title",
            id: title_id,
        });
    }

    if let Some(text) = draft.text {
        validate_review_text(text)?;
    }
    if let Some(score) = draft.score {
        validate_score(score)?;
    }

    if write == ReviewWrite::Create && lookup.review_exists(title_id, author_id).await? {
        return Err(CoreError::Conflict(DUPLICATE_REVIEW_MESSAGE.to_string()));
    }

    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
