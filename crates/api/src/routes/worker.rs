use axum::routing::post;
use axum::Router;

use crate::handlers::worker;
use crate::state::AppState;

/// Routes mounted at `/api/worker`. All require a bearer token.
///
/// ```text
/// POST /clock-in     clock_in
/// POST /clock-out    clock_out
/// POST /status       update_status
/// POST /complete     complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clock-in", post(worker::clock_in))
        .route("/clock-out", post(worker::clock_out))
        .route("/status", post(worker::update_status))
        .route("/complete", post(worker::complete))
}
