pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod titles;

/// Message for a PATCH body that sets no fields.
pub(crate) const NOTHING_TO_UPDATE: &str = "Request body contains no fields to update";
