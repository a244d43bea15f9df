use axum::routing::post;
use axum::Router;

use crate::handlers::checkout;
use crate::state::AppState;

/// `POST /api/checkout`. A single route, merged rather than nested.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout", post(checkout::create_checkout))
}
