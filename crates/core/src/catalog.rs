//! Catalog constants and validation for categories, genres, and titles.
//!
//! Categories and genres are addressed by slug in the API, so slugs must stay
//! URL-safe. Titles carry a creation year that may not lie in the future.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length of a category or genre slug.
pub const MAX_SLUG_LENGTH: usize = 50;

/// Maximum length of a category or genre display name.
pub const MAX_TAXONOMY_NAME_LENGTH: usize = 250;

/// Maximum length of a title's name.
pub const MAX_TITLE_NAME_LENGTH: usize = 200;

/// Characters accepted in a slug.
const SLUG_PATTERN: &str = r"^[-a-zA-Z0-9_]+$";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("valid regex"));

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate a category or genre slug: non-empty, at most
/// [`MAX_SLUG_LENGTH`] characters, letters, digits, `-` and `_` only.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".to_string()));
    }

    if slug.chars().count() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug exceeds maximum length of {MAX_SLUG_LENGTH} characters"
        )));
    }

    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Only letters, digits, '-' and '_' are allowed"
        )));
    }

    Ok(())
}

/// Validate that a display name is not blank.
///
/// Length limits are declared on the DTOs; this catches whitespace-only
/// names that a length check would let through.
pub fn validate_display_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be blank".to_string()));
    }
    Ok(())
}

/// Validate a title's creation year against the current year.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), CoreError> {
    if year > current_year {
        return Err(CoreError::Validation(format!(
            "Year {year} cannot be in the future (current year is {current_year})"
        )));
    }
    Ok(())
}

/// The current UTC calendar year.
pub fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year()
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs_accepted() {
        assert!(validate_slug("sci-fi").is_ok());
        assert!(validate_slug("books").is_ok());
        assert!(validate_slug("art_house_2").is_ok());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LENGTH)).is_ok());
    }

    #[test]
    fn test_invalid_slugs_rejected() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("slash/slug").is_err());
        assert!(validate_slug("ünïcode").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_blank_display_name_rejected() {
        assert!(validate_display_name("Drama").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
    }

    #[test]
    fn test_year_not_in_future() {
        assert!(validate_year(1999, 2026).is_ok());
        assert!(validate_year(2026, 2026).is_ok());
        assert!(validate_year(-500, 2026).is_ok());

        let err = validate_year(2027, 2026).unwrap_err();
        assert!(err.to_string().contains("cannot be in the future"));
    }
}
