//! Request body extractor that reports malformed JSON through `AppError`.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// Drop-in for `axum::Json` in handler arguments. Missing fields, wrong types
/// and bad syntax become a 400 `VALIDATION_ERROR` instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
