use axum::routing::post;
use axum::Router;

use crate::handlers::signup;
use crate::state::AppState;

/// Routes mounted at `/api/signup`.
///
/// ```text
/// POST /lead    upsert_lead
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/lead", post(signup::upsert_lead))
}
