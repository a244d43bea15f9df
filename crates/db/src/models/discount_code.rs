//! Tenant discount code model.

use brnno_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `discount_codes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DiscountCode {
    pub id: DbId,
    pub business_id: DbId,
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub is_active: bool,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    pub valid_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a discount code. `code` must already be normalized.
#[derive(Debug, Clone)]
pub struct CreateDiscountCode {
    pub business_id: DbId,
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    pub usage_limit: Option<i32>,
    pub valid_until: Option<Timestamp>,
}
