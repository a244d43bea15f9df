use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/api/webhooks`.
pub fn router() -> Router<AppState> {
    Router::new().route("/stripe", post(webhooks::stripe_webhook))
}
