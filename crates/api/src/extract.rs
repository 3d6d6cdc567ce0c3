//! Request body extraction.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejections use the API error envelope, so a malformed
/// or mistyped body is a 400 `VALIDATION_ERROR` like any other bad input.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
