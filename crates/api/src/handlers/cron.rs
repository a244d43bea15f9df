use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::background::signup_recovery;
use crate::error::AppResult;
use crate::middleware::cron::CronAuth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecoveryRunResponse {
    pub success: bool,
    pub processed: usize,
    pub sent: usize,
}

/// GET /api/cron/signup-recovery
///
/// Runs one batch of abandoned-signup reminders.
pub async fn signup_recovery(
    _auth: CronAuth,
    State(state): State<AppState>,
) -> AppResult<Json<RecoveryRunResponse>> {
    let outcome = signup_recovery::run_once(
        &state.pool,
        state.mailer.as_ref(),
        &state.config.public_app_url,
        Utc::now(),
    )
    .await?;

    Ok(Json(RecoveryRunResponse {
        success: true,
        processed: outcome.processed,
        sent: outcome.sent,
    }))
}
