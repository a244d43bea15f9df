//! Handler for payment provider webhooks.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use brnno_billing::{BillingEvent, CompletedCheckout};
use brnno_core::error::CoreError;
use brnno_core::tenancy::{subdomain_from_name, with_suffix};
use brnno_db::models::business::CreateBusiness;
use brnno_db::repositories::{BusinessRepo, SignupLeadRepo};
use brnno_db::DbPool;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the Stripe signature.
const SIGNATURE_HEADER: &str = "stripe-signature";

/// Suffixes tried before giving up on a free subdomain.
const MAX_SUBDOMAIN_ATTEMPTS: u32 = 50;

/// POST /api/webhooks/stripe
///
/// Verifies the signature over the raw body. `checkout.session.completed`
/// materializes the business; every other event is acknowledged.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".into()))?;

    match state.billing.verify_webhook(&body, signature)? {
        BillingEvent::CheckoutCompleted(checkout) => {
            complete_signup(&state.pool, checkout).await?;
        }
        BillingEvent::Other(event_type) => {
            tracing::debug!(event_type = %event_type, "Ignoring webhook event");
        }
    }

    Ok(Json(json!({ "received": true })))
}

/// Create the business for a completed checkout and convert its lead.
///
/// Keyed by the checkout session id: redelivery finds the existing business
/// and only re-applies the (idempotent) lead conversion.
async fn complete_signup(pool: &DbPool, checkout: CompletedCheckout) -> AppResult<()> {
    let meta = &checkout.metadata;

    match BusinessRepo::find_by_checkout_session(pool, &checkout.session_id).await? {
        Some(existing) => {
            tracing::info!(
                session_id = %checkout.session_id,
                business_id = existing.id,
                "Checkout already processed"
            );
        }
        None => {
            let subdomain = available_subdomain(pool, &meta.business_name).await?;
            let input = CreateBusiness {
                owner_user_id: meta.user_id,
                name: meta.business_name.clone(),
                subdomain,
                plan: meta.plan.clone(),
                billing_period: meta.billing_period.clone(),
                team_size: meta.team_size,
                stripe_customer_id: checkout.customer_id.clone(),
                stripe_subscription_id: checkout.subscription_id.clone(),
                stripe_checkout_session_id: Some(checkout.session_id.clone()),
                signup_lead_id: meta.signup_lead_id,
            };
            match BusinessRepo::create(pool, &input).await? {
                Some(business) => tracing::info!(
                    business_id = business.id,
                    subdomain = %business.subdomain,
                    plan = %business.plan,
                    "Business created from checkout"
                ),
                None => tracing::info!(
                    session_id = %checkout.session_id,
                    "Checkout processed concurrently"
                ),
            }
        }
    }

    if let Some(lead_id) = meta.signup_lead_id {
        if SignupLeadRepo::mark_converted(pool, lead_id).await? {
            tracing::info!(lead_id, "Signup lead converted");
        }
    }
    Ok(())
}

/// First free subdomain among `base`, `base-2`, `base-3`, ...
async fn available_subdomain(pool: &DbPool, business_name: &str) -> AppResult<String> {
    let base = subdomain_from_name(business_name);
    if !BusinessRepo::subdomain_exists(pool, &base).await? {
        return Ok(base);
    }
    for n in 2..=MAX_SUBDOMAIN_ATTEMPTS {
        let candidate = with_suffix(&base, n);
        if !BusinessRepo::subdomain_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    Err(CoreError::Internal(format!("No free subdomain for '{base}'")).into())
}
