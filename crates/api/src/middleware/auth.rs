//! Bearer-token authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use critiq_core::error::CoreError;
use critiq_core::roles::{validate_role, ROLE_ADMIN};
use critiq_core::types::DbId;
use critiq_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller identified by the `Authorization: Bearer <jwt>` header.
///
/// Handlers that write take this as an argument. A missing or invalid
/// token, or one whose subject has no row in `users`, rejects the request
/// with 401 before the handler runs. `role` comes from the stored user, so
/// a role change applies to tokens already issued.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// `"user"`, `"moderator"` or `"admin"`.
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Pull the raw token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            CoreError::Unauthorized("Expected Authorization: Bearer <token>".into())
        })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|err| {
            tracing::debug!(error = %err, "Rejected access token");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;
        validate_role(&claims.role).map_err(|_| {
            tracing::debug!(user_id = claims.sub, role = %claims.role, "Token carries unknown role");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = claims.sub, "Token subject has no account");
                CoreError::Unauthorized("Unknown user".into())
            })?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
