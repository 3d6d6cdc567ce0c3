//! Title model, DTOs, and list filter.

use critiq_core::types::DbId;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::category::Category;
use crate::models::genre::Genre;

/// A row from the `titles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub rating: Option<i32>,
}

/// A title with its category and genres resolved, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct TitleWithRelations {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub rating: Option<i32>,
    pub category: Option<Category>,
    pub genre: Vec<Genre>,
}

impl TitleWithRelations {
    pub fn new(title: Title, category: Option<Category>, genre: Vec<Genre>) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            description: title.description,
            rating: title.rating,
            category,
            genre,
        }
    }
}

/// DTO for creating a title. Category and genres are given by slug.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTitle {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// DTO for a partial title update. Only supplied fields change.
///
/// `description` and `category` distinguish an absent key (`None`, keep)
/// from an explicit `null` (`Some(None)`, clear). When `genre` is supplied
/// it replaces the full genre set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTitle {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
}

/// Deserialize a present key as `Some`, keeping a JSON `null` as
/// `Some(None)`. Absent keys fall back to `None` via `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateTitle {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.genre.is_none()
    }
}

/// Query parameters accepted by the title list endpoint.
///
/// `category` and `genre` match slugs exactly; `name` is a
/// case-insensitive substring match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleFilter {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> UpdateTitle {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn absent_keys_leave_fields_untouched() {
        let patch = parse(r#"{"name": "Solaris"}"#);
        assert_eq!(patch.description, None);
        assert_eq!(patch.category, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn null_clears_optional_fields() {
        let patch = parse(r#"{"category": null, "description": null}"#);
        assert_eq!(patch.category, Some(None));
        assert_eq!(patch.description, Some(None));
        assert!(!patch.is_empty());
    }

    #[test]
    fn values_are_kept() {
        let patch = parse(r#"{"category": "films", "description": "Ocean"}"#);
        assert_eq!(patch.category, Some(Some("films".to_string())));
        assert_eq!(patch.description, Some(Some("Ocean".to_string())));
    }

    #[test]
    fn empty_object_is_empty() {
        assert!(parse("{}").is_empty());
    }
}
