//! Repository for the `discount_codes` table.

use brnno_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::discount_code::{CreateDiscountCode, DiscountCode};

/// Column list for `discount_codes` queries.
const COLUMNS: &str = "\
    id, business_id, code, description, discount_percent, is_active, \
    usage_limit, usage_count, valid_until, created_at, updated_at";

/// Provides lookup and redemption of tenant discount codes.
pub struct DiscountCodeRepo;

impl DiscountCodeRepo {
    /// Insert a new active code.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDiscountCode,
    ) -> Result<DiscountCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO discount_codes \
                (business_id, code, description, discount_percent, usage_limit, valid_until) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DiscountCode>(&query)
            .bind(input.business_id)
            .bind(&input.code)
            .bind(&input.description)
            .bind(input.discount_percent)
            .bind(input.usage_limit)
            .bind(input.valid_until)
            .fetch_one(pool)
            .await
    }

    /// Find an active code for a business. `code` must be normalized.
    pub async fn find_active(
        pool: &PgPool,
        business_id: DbId,
        code: &str,
    ) -> Result<Option<DiscountCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM discount_codes \
             WHERE business_id = $1 AND code = $2 AND is_active"
        );
        sqlx::query_as::<_, DiscountCode>(&query)
            .bind(business_id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Consume one use of a code in a single conditional update.
    ///
    /// Returns `None` when the code is missing, inactive, expired or at its
    /// usage limit; concurrent callers can never push `usage_count` past
    /// `usage_limit`.
    pub async fn redeem(
        pool: &PgPool,
        business_id: DbId,
        code: &str,
        now: Timestamp,
    ) -> Result<Option<DiscountCode>, sqlx::Error> {
        let query = format!(
            "UPDATE discount_codes \
             SET usage_count = usage_count + 1, updated_at = NOW() \
             WHERE business_id = $1 AND code = $2 AND is_active \
               AND (usage_limit IS NULL OR usage_count < usage_limit) \
               AND (valid_until IS NULL OR valid_until >= $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DiscountCode>(&query)
            .bind(business_id)
            .bind(code)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a code. Returns `true` if a row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE discount_codes SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
