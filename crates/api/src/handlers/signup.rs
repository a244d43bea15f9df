//! Handlers for the signup funnel lead endpoint.

use axum::extract::State;
use axum::Json;
use brnno_core::error::CoreError;
use brnno_core::funnel::{normalize_email, SignupStep};
use brnno_core::pricing::{BillingPeriod, Plan};
use brnno_core::types::DbId;
use brnno_db::models::signup_lead::UpdateSignupLead;
use brnno_db::repositories::SignupLeadRepo;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/signup/lead`.
///
/// Without `leadId` a lead is created (or the open lead for the email is
/// returned); with `leadId` the lead is moved to `step`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub lead_id: Option<DbId>,
    pub email: Option<String>,
    pub step: i32,
    #[serde(default)]
    pub data: LeadData,
    #[serde(default)]
    pub abandoned: bool,
}

/// Step-specific fields. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub selected_plan: Option<String>,
    pub team_size: Option<i32>,
    pub billing_period: Option<String>,
}

impl LeadData {
    fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.business_name.is_none()
            && self.selected_plan.is_none()
            && self.team_size.is_none()
            && self.billing_period.is_none()
    }

    /// Validate and convert into the repository DTO.
    fn into_update(self) -> Result<UpdateSignupLead, CoreError> {
        if let Some(plan) = &self.selected_plan {
            Plan::parse(plan)?;
        }
        if let Some(period) = &self.billing_period {
            BillingPeriod::parse(period)?;
        }
        if let Some(size) = self.team_size {
            if size < 1 {
                return Err(CoreError::Validation(format!(
                    "Team size must be at least 1, got {size}"
                )));
            }
        }
        Ok(UpdateSignupLead {
            first_name: trimmed(self.first_name),
            last_name: trimmed(self.last_name),
            business_name: trimmed(self.business_name),
            selected_plan: self.selected_plan,
            team_size: self.team_size,
            billing_period: self.billing_period,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/signup/lead
///
/// Creates a lead (`{leadId}`) or records a step transition
/// (`{success: true}`). Step numbers outside 1-5 are rejected.
pub async fn upsert_lead(
    State(state): State<AppState>,
    AppJson(input): AppJson<LeadRequest>,
) -> AppResult<Json<Value>> {
    let step = SignupStep::from_number(input.step)?;

    match input.lead_id {
        Some(lead_id) => {
            let update = input.data.into_update()?;
            SignupLeadRepo::update_step(&state.pool, lead_id, step, &update, input.abandoned)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "SignupLead",
                    id: lead_id,
                })?;

            tracing::debug!(
                lead_id,
                step = step.label(),
                abandoned = input.abandoned,
                "Signup lead updated"
            );
            Ok(Json(json!({ "success": true })))
        }
        None => {
            let email = input
                .email
                .as_deref()
                .map(normalize_email)
                .filter(|e| !e.is_empty())
                .ok_or_else(|| AppError::BadRequest("email is required".into()))?;
            if !email.validate_email() {
                return Err(AppError::BadRequest(format!("Invalid email address '{email}'")));
            }

            let lead = SignupLeadRepo::get_or_create(&state.pool, &email).await?;

            // A returning visitor clears an earlier abandonment marker.
            if step != SignupStep::Email
                || input.abandoned
                || lead.abandoned_at.is_some()
                || !input.data.is_empty()
            {
                let update = input.data.into_update()?;
                SignupLeadRepo::update_step(&state.pool, lead.id, step, &update, input.abandoned)
                    .await?;
            }

            tracing::info!(lead_id = lead.id, "Signup lead captured");
            Ok(Json(json!({ "leadId": lead.id })))
        }
    }
}
