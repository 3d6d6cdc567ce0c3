//! Well-known role name constants and ownership checks.
//!
//! These must match the `chk_users_role` constraint in
//! `20260301000001_create_users.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

/// Validate that a role name is one of [`VALID_ROLES`].
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Whether a user may edit or delete content owned by `owner_id`.
///
/// Authors may change their own reviews and comments; moderators and
/// admins may change anyone's.
pub fn can_modify(owner_id: DbId, user_id: DbId, role: &str) -> bool {
    owner_id == user_id || role == ROLE_MODERATOR || role == ROLE_ADMIN
}

/// [`can_modify`] as a `Result`, for use with `?` in handlers.
pub fn ensure_can_modify(
    entity: &'static str,
    owner_id: DbId,
    user_id: DbId,
    role: &str,
) -> Result<(), CoreError> {
    if can_modify(owner_id, user_id, role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Only the author or a moderator may modify this {entity}"
        )))
    }
}
