//! Business (tenant) model.

use brnno_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `businesses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Business {
    pub id: DbId,
    pub owner_user_id: UserId,
    pub name: String,
    pub subdomain: String,
    pub plan: String,
    pub billing_period: String,
    pub team_size: i32,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_checkout_session_id: Option<String>,
    pub signup_lead_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for materializing a business after checkout.
#[derive(Debug, Clone)]
pub struct CreateBusiness {
    pub owner_user_id: UserId,
    pub name: String,
    pub subdomain: String,
    pub plan: String,
    pub billing_period: String,
    pub team_size: i32,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_checkout_session_id: Option<String>,
    pub signup_lead_id: Option<DbId>,
}
