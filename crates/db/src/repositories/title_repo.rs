//! Repository for the `titles` and `title_genres` tables.

use critiq_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::title::{CreateTitle, Title, TitleFilter, TitleWithRelations, UpdateTitle};
use crate::repositories::{CategoryRepo, GenreRepo};

/// Column list for the `titles` table.
const COLUMNS: &str = "id, name, year, description, category_id, rating";

/// Same columns, qualified with the `t` alias for JOIN queries.
const T_COLUMNS: &str = "t.id, t.name, t.year, t.description, t.category_id, t.rating";

/// Provides CRUD operations for titles and their genre associations.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a new title with its genre links in one transaction.
    ///
    /// Category and genres must already be resolved to IDs; `rating` always
    /// starts out `NULL`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTitle,
        category_id: Option<DbId>,
        genre_ids: &[DbId],
    ) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(&input.name)
            .bind(input.year)
            .bind(&input.description)
            .bind(category_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_genres_inner(&mut tx, title.id, genre_ids).await?;

        tx.commit().await?;
        Ok(title)
    }

    /// Find a title by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM titles WHERE id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a title with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a title by ID, enriched with its category and genres.
    pub async fn find_with_relations(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TitleWithRelations>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(title) => Ok(Some(Self::load_relations(pool, title).await?)),
            None => Ok(None),
        }
    }

    /// List titles matching `filter`, ordered by name, with relations.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
    ) -> Result<Vec<TitleWithRelations>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS}
             FROM titles t
             LEFT JOIN categories c ON c.id = t.category_id
             WHERE ($1::TEXT IS NULL OR c.slug = $1)
               AND ($2::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM title_genres tg
                    JOIN genres g ON g.id = tg.genre_id
                    WHERE tg.title_id = t.id AND g.slug = $2))
               AND ($3::TEXT IS NULL OR t.name ILIKE '%' || $3 || '%')
               AND ($4::INTEGER IS NULL OR t.year = $4)
             ORDER BY t.name, t.id"
        );
        let titles = sqlx::query_as::<_, Title>(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(&filter.name)
            .bind(filter.year)
            .fetch_all(pool)
            .await?;

        let mut result = Vec::with_capacity(titles.len());
        for title in titles {
            result.push(Self::load_relations(pool, title).await?);
        }
        Ok(result)
    }

    /// Update a title. Only non-`None` fields in `input` are applied.
    ///
    /// `category_id` follows the same convention as `input.description`:
    /// `None` keeps the current value, `Some(None)` clears it. `genre_ids`,
    /// when `Some`, replaces every genre link. Returns `None` if the title
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
        category_id: Option<Option<DbId>>,
        genre_ids: Option<&[DbId]>,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                category_id = CASE WHEN $6 THEN $7 ELSE category_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.year)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(category_id.is_some())
            .bind(category_id.flatten())
            .fetch_optional(&mut *tx)
            .await?;

        if title.is_none() {
            return Ok(None);
        }

        if let Some(genre_ids) = genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::set_genres_inner(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(title)
    }

    /// Delete a title. Its reviews, their comments, and its genre links are
    /// removed by cascade. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Recompute a title's rating as the rounded mean of its review scores,
    /// or `NULL` when it has no reviews.
    ///
    /// Takes a connection so it can run inside the review write's transaction.
    pub async fn refresh_rating(conn: &mut PgConnection, title_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE titles SET rating = (
                SELECT ROUND(AVG(score))::INTEGER FROM reviews WHERE title_id = $1
             )
             WHERE id = $1",
        )
        .bind(title_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn load_relations(
        pool: &PgPool,
        title: Title,
    ) -> Result<TitleWithRelations, sqlx::Error> {
        let category = match title.category_id {
            Some(category_id) => CategoryRepo::find_by_id(pool, category_id).await?,
            None => None,
        };
        let genres = GenreRepo::list_for_title(pool, title.id).await?;
        Ok(TitleWithRelations::new(title, category, genres))
    }

    async fn set_genres_inner(
        conn: &mut PgConnection,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(conn)
        .await?;
        Ok(())
    }
}
