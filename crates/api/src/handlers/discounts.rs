//! Handlers for the public discount code endpoints.
//!
//! Both routes are called from tenant booking pages on arbitrary origins.

use axum::extract::State;
use axum::Json;
use brnno_core::discount::{check_usable, normalize_code, DiscountRejection, INVALID_CODE_MESSAGE};
use brnno_core::error::CoreError;
use brnno_core::types::DbId;
use brnno_db::repositories::DiscountCodeRepo;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    pub business_id: DbId,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub discount_percent: i32,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    pub usage_count: i32,
}

fn invalid_code() -> AppError {
    AppError::NotFound(INVALID_CODE_MESSAGE.to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/discount-codes/validate
///
/// Checks a code without consuming a use.
pub async fn validate_code(
    State(state): State<AppState>,
    AppJson(input): AppJson<DiscountRequest>,
) -> AppResult<Json<ValidateResponse>> {
    let code = normalize_code(&input.code)?;
    let discount = DiscountCodeRepo::find_active(&state.pool, input.business_id, &code)
        .await?
        .ok_or_else(invalid_code)?;

    check_usable(
        discount.valid_until,
        discount.usage_count,
        discount.usage_limit,
        Utc::now(),
    )
    .map_err(CoreError::from)?;

    Ok(Json(ValidateResponse {
        valid: true,
        discount_percent: discount.discount_percent,
        description: discount.description,
    }))
}

/// POST /api/discount-codes/redeem
///
/// Consumes one use atomically. When nothing was updated the validation
/// rules decide which error the caller sees.
pub async fn redeem_code(
    State(state): State<AppState>,
    AppJson(input): AppJson<DiscountRequest>,
) -> AppResult<Json<RedeemResponse>> {
    let code = normalize_code(&input.code)?;
    let now = Utc::now();

    if let Some(discount) = DiscountCodeRepo::redeem(&state.pool, input.business_id, &code, now).await? {
        tracing::info!(
            business_id = input.business_id,
            code = %discount.code,
            usage_count = discount.usage_count,
            "Discount code redeemed"
        );
        return Ok(Json(RedeemResponse {
            success: true,
            usage_count: discount.usage_count,
        }));
    }

    let discount = DiscountCodeRepo::find_active(&state.pool, input.business_id, &code)
        .await?
        .ok_or_else(invalid_code)?;
    let rejection = check_usable(
        discount.valid_until,
        discount.usage_count,
        discount.usage_limit,
        now,
    )
    .err()
    // The last use went to a concurrent caller between the two queries.
    .unwrap_or(DiscountRejection::UsageLimitReached);

    Err(CoreError::from(rejection).into())
}
