pub mod checkout;
pub mod cron;
pub mod discounts;
pub mod health;
pub mod signup;
pub mod webhooks;
pub mod worker;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` routes served to the web app and to the scheduler.
///
/// Route hierarchy:
///
/// ```text
/// /api/signup/lead                 create lead / record step (POST)
/// /api/checkout                    open subscription checkout (POST)
/// /api/webhooks/stripe             Stripe webhook (POST, signed)
/// /api/cron/signup-recovery        recovery run (GET, cron secret)
/// /api/worker/clock-in             (POST, bearer token)
/// /api/worker/clock-out            (POST, bearer token)
/// /api/worker/status               (POST, bearer token)
/// /api/worker/complete             (POST, bearer token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/signup", signup::router())
        .merge(checkout::router())
        .nest("/api/webhooks", webhooks::router())
        .nest("/api/cron", cron::router())
        .nest("/api/worker", worker::router())
}

/// Build the public routes that any origin may call.
///
/// ```text
/// /api/discount-codes/validate     check a code (POST)
/// /api/discount-codes/redeem       consume one use (POST)
/// ```
pub fn public_routes() -> Router<AppState> {
    Router::new().nest("/api/discount-codes", discounts::router())
}
