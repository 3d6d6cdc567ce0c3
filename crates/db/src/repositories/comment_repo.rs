//! Repository for the `comments` table.

use critiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment, UpdateComment};

/// Joined select producing [`Comment`] rows.
const SELECT_COMMENT: &str = "SELECT c.id, c.review_id, c.author_id, u.username AS author, \
    c.text, c.pub_date \
    FROM comments c \
    JOIN users u ON u.id = c.author_id";

/// Provides CRUD operations for comments on reviews.
pub struct CommentRepo;

impl CommentRepo {
    /// List a review's comments, newest first.
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query =
            format!("{SELECT_COMMENT} WHERE c.review_id = $1 ORDER BY c.pub_date DESC, c.id DESC");
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .fetch_all(pool)
            .await
    }

    /// Find a comment by ID, scoped to its review.
    pub async fn find_in_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("{SELECT_COMMENT} WHERE c.review_id = $1 AND c.id = $2");
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a comment, returning it with the author's username.
    pub async fn create(
        pool: &PgPool,
        review_id: DbId,
        author_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, sqlx::Error> {
        let query = "WITH inserted AS (
                INSERT INTO comments (review_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, review_id, author_id, text, pub_date
             )
             SELECT i.id, i.review_id, i.author_id, u.username AS author, i.text, i.pub_date
             FROM inserted i
             JOIN users u ON u.id = i.author_id";
        sqlx::query_as::<_, Comment>(query)
            .bind(review_id)
            .bind(author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Update a comment's text. Returns `None` if it does not exist under the review.
    pub async fn update(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = "WITH updated AS (
                UPDATE comments SET text = COALESCE($3, text)
                WHERE review_id = $1 AND id = $2
                RETURNING id, review_id, author_id, text, pub_date
             )
             SELECT d.id, d.review_id, d.author_id, u.username AS author, d.text, d.pub_date
             FROM updated d
             JOIN users u ON u.id = d.author_id";
        sqlx::query_as::<_, Comment>(query)
            .bind(review_id)
            .bind(id)
            .bind(&input.text)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, review_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE review_id = $1 AND id = $2")
            .bind(review_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
