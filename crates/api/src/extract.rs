//! Request body extractors whose rejections are [`AppError`]s.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` rejecting malformed bodies with a 400 `{error, code}`
/// response instead of axum's plain-text 422/415.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
