//! Repository for the `reviews` table, plus the database-backed
//! [`ReviewLookup`] used by the review gate.

use async_trait::async_trait;
use critiq_core::error::CoreError;
use critiq_core::review::ReviewLookup;
use critiq_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::review::{CreateReview, Review, UpdateReview};
use crate::repositories::TitleRepo;

/// Joined select producing [`Review`] rows.
const SELECT_REVIEW: &str = "SELECT r.id, r.title_id, t.name AS title, r.author_id, \
    u.username AS author, r.text, r.score, r.pub_date \
    FROM reviews r \
    JOIN titles t ON t.id = r.title_id \
    JOIN users u ON u.id = r.author_id";

/// Provides CRUD operations for reviews.
///
/// Every write also refreshes the owning title's rating inside the same
/// transaction.
pub struct ReviewRepo;

impl ReviewRepo {
    /// List a title's reviews, newest first.
    pub async fn list_for_title(pool: &PgPool, title_id: DbId) -> Result<Vec<Review>, sqlx::Error> {
        let query =
            format!("{SELECT_REVIEW} WHERE r.title_id = $1 ORDER BY r.pub_date DESC, r.id DESC");
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .fetch_all(pool)
            .await
    }

    /// Find a review by ID, scoped to the title it belongs to.
    pub async fn find_in_title(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("{SELECT_REVIEW} WHERE r.title_id = $1 AND r.id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `author_id` has already reviewed `title_id`.
    pub async fn exists_for_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// Insert a review and refresh the title's rating.
    ///
    /// A second review by the same author on the same title fails with a
    /// unique violation on `uq_reviews_title_author`.
    pub async fn create(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
        input: &CreateReview,
    ) -> Result<Review, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO reviews (title_id, author_id, text, score)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(title_id)
        .bind(author_id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_one(&mut *tx)
        .await?;

        TitleRepo::refresh_rating(&mut tx, title_id).await?;
        let review = Self::fetch_inner(&mut tx, id).await?;

        tx.commit().await?;
        Ok(review)
    }

    /// Update a review's text and/or score and refresh the title's rating.
    ///
    /// Returns `None` if no review with this ID exists under the title.
    pub async fn update(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_scalar::<_, DbId>(
            "UPDATE reviews SET
                text = COALESCE($3, text),
                score = COALESCE($4, score)
             WHERE title_id = $1 AND id = $2
             RETURNING id",
        )
        .bind(title_id)
        .bind(id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        TitleRepo::refresh_rating(&mut tx, title_id).await?;
        let review = Self::fetch_inner(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(review))
    }

    /// Delete a review (its comments cascade) and refresh the title's rating.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, title_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM reviews WHERE title_id = $1 AND id = $2")
            .bind(title_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        TitleRepo::refresh_rating(&mut tx, title_id).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn fetch_inner(conn: &mut PgConnection, id: DbId) -> Result<Review, sqlx::Error> {
        let query = format!("{SELECT_REVIEW} WHERE r.id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }
}

/// [`ReviewLookup`] backed by Postgres.
#[derive(Clone)]
pub struct PgReviewLookup {
    pool: PgPool,
}

impl PgReviewLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn lookup_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Review lookup query failed");
    CoreError::Internal(format!("Review lookup failed: {err}"))
}

#[async_trait]
impl ReviewLookup for PgReviewLookup {
    async fn title_exists(&self, title_id: DbId) -> Result<bool, CoreError> {
        TitleRepo::exists(&self.pool, title_id)
            .await
            .map_err(lookup_error)
    }

    async fn review_exists(&self, title_id: DbId, author_id: DbId) -> Result<bool, CoreError> {
        ReviewRepo::exists_for_author(&self.pool, title_id, author_id)
            .await
            .map_err(lookup_error)
    }
}
