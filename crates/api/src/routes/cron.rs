use axum::routing::get;
use axum::Router;

use crate::handlers::cron;
use crate::state::AppState;

/// Routes mounted at `/api/cron`.
pub fn router() -> Router<AppState> {
    Router::new().route("/signup-recovery", get(cron::signup_recovery))
}
