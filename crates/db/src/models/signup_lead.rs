//! Signup funnel lead model.

use brnno_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `signup_leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SignupLead {
    pub id: DbId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub current_step: i32,
    pub step2_completed_at: Option<Timestamp>,
    pub step3_completed_at: Option<Timestamp>,
    pub step4_completed_at: Option<Timestamp>,
    pub abandoned_at: Option<Timestamp>,
    pub abandoned_at_step: Option<String>,
    pub recovery_emails_sent: Option<i32>,
    pub last_recovery_email_at: Option<Timestamp>,
    pub converted: bool,
    pub converted_at: Option<Timestamp>,
    pub selected_plan: Option<String>,
    pub team_size: Option<i32>,
    pub billing_period: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Step-specific fields merged into a lead. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateSignupLead {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub selected_plan: Option<String>,
    pub team_size: Option<i32>,
    pub billing_period: Option<String>,
}
