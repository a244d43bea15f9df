//! Shared-secret guard for scheduler-invoked endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use brnno_core::error::CoreError;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;

/// Passes when no `CRON_SECRET` is configured, or when the request carries
/// `Authorization: Bearer <CRON_SECRET>`.
#[derive(Debug, Clone, Copy)]
pub struct CronAuth;

impl FromRequestParts<AppState> for CronAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(secret) = state.config.cron_secret.as_deref() else {
            return Ok(CronAuth);
        };

        let token = bearer_token(parts)?;
        let matches: bool = token.as_bytes().ct_eq(secret.as_bytes()).into();
        if !matches {
            tracing::warn!("Cron request with a wrong secret");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid cron secret".into(),
            )));
        }
        Ok(CronAuth)
    }
}
