use std::sync::Arc;

use brnno_billing::BillingProvider;
use brnno_core::pricing::PriceTable;
use brnno_email::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: brnno_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Checkout price ids keyed by price slot.
    pub prices: Arc<PriceTable>,
    pub billing: Arc<dyn BillingProvider>,
    pub mailer: Arc<dyn Mailer>,
}
