use axum::routing::post;
use axum::Router;

use crate::handlers::discounts;
use crate::state::AppState;

/// Routes mounted at `/api/discount-codes`.
///
/// ```text
/// POST /validate    validate_code
/// POST /redeem      redeem_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(discounts::validate_code))
        .route("/redeem", post(discounts::redeem_code))
}
