//! Handler for opening a subscription checkout session.

use axum::extract::State;
use axum::Json;
use brnno_billing::{CheckoutParams, SignupMetadata};
use brnno_core::funnel::normalize_email;
use brnno_core::pricing::{BillingPeriod, Plan};
use brnno_core::types::{DbId, UserId};
use brnno_db::repositories::SignupLeadRepo;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Request body for `POST /api/checkout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub plan_id: String,
    pub billing_period: String,
    pub email: String,
    pub business_name: String,
    pub user_id: UserId,
    pub team_size: i32,
    pub signup_lead_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// POST /api/checkout
///
/// Resolves the price for `(planId, billingPeriod, teamSize)`, finds or
/// creates the customer by email and opens a hosted subscription checkout.
pub async fn create_checkout(
    State(state): State<AppState>,
    AppJson(input): AppJson<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let plan = Plan::parse(&input.plan_id)?;
    let period = BillingPeriod::parse(&input.billing_period)?;
    let price_id = state.prices.resolve(plan, period, input.team_size)?.to_string();

    let email = normalize_email(&input.email);
    if !email.validate_email() {
        return Err(AppError::BadRequest(format!("Invalid email address '{email}'")));
    }
    let business_name = input.business_name.trim().to_string();
    if business_name.is_empty() {
        return Err(AppError::BadRequest("businessName is required".into()));
    }

    let customer_id = state.billing.find_or_create_customer(&email).await?;

    let app_url = &state.config.public_app_url;
    let cancel_url = match input.signup_lead_id {
        Some(lead_id) => format!("{app_url}/signup?lead={lead_id}&canceled=true"),
        None => format!("{app_url}/signup?canceled=true"),
    };

    let session = state
        .billing
        .create_checkout_session(CheckoutParams {
            customer_id,
            price_id,
            success_url: format!("{app_url}/signup/success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url,
            client_reference_id: input.signup_lead_id.map(|id| id.to_string()),
            metadata: SignupMetadata {
                plan: plan.as_str().to_string(),
                billing_period: period.as_str().to_string(),
                team_size: input.team_size,
                business_name,
                user_id: input.user_id,
                signup_lead_id: input.signup_lead_id,
                email,
            },
        })
        .await?;

    tracing::info!(
        session_id = %session.session_id,
        plan = plan.as_str(),
        period = period.as_str(),
        team_size = input.team_size,
        "Checkout session created"
    );

    if let Some(lead_id) = input.signup_lead_id {
        if let Err(e) = SignupLeadRepo::record_checkout_selection(
            &state.pool,
            lead_id,
            plan.as_str(),
            input.team_size,
            period.as_str(),
        )
        .await
        {
            tracing::warn!(lead_id, error = %e, "Failed to record checkout selection on lead");
        }
    }

    Ok(Json(CheckoutResponse { url: session.url }))
}
