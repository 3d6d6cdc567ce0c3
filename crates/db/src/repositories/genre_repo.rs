//! Repository for the `genres` table and genre lookups through `title_genres`.

use critiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::genre::{CreateGenre, Genre};

const COLUMNS: &str = "id, name, slug";

/// Provides CRUD operations for genres.
pub struct GenreRepo;

impl GenreRepo {
    /// List all genres ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres ORDER BY name, id");
        sqlx::query_as::<_, Genre>(&query).fetch_all(pool).await
    }

    /// Insert a new genre, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<Genre, sqlx::Error> {
        let query =
            format!("INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Genre>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find every genre whose slug is in `slugs`. Unknown slugs are skipped,
    /// so callers compare lengths to detect them.
    pub async fn find_by_slugs(pool: &PgPool, slugs: &[String]) -> Result<Vec<Genre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM genres WHERE slug = ANY($1) ORDER BY name, id");
        sqlx::query_as::<_, Genre>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// List the genres attached to a title, ordered by name.
    pub async fn list_for_title(pool: &PgPool, title_id: DbId) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>(
            "SELECT g.id, g.name, g.slug
             FROM genres g
             JOIN title_genres tg ON tg.genre_id = g.id
             WHERE tg.title_id = $1
             ORDER BY g.name, g.id",
        )
        .bind(title_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a genre by slug, detaching it from every title.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_by_slug(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
