//! Repository for the `businesses` table.

use brnno_core::types::DbId;
use sqlx::PgPool;

use crate::models::business::{Business, CreateBusiness};

/// Column list for `businesses` queries.
const COLUMNS: &str = "\
    id, owner_user_id, name, subdomain, plan, billing_period, team_size, \
    stripe_customer_id, stripe_subscription_id, stripe_checkout_session_id, \
    signup_lead_id, created_at, updated_at";

/// Provides tenant creation and lookup.
pub struct BusinessRepo;

impl BusinessRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Business>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM businesses WHERE id = $1");
        sqlx::query_as::<_, Business>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the business materialized from a checkout session.
    pub async fn find_by_checkout_session(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<Business>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM businesses WHERE stripe_checkout_session_id = $1"
        );
        sqlx::query_as::<_, Business>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a subdomain is taken.
    pub async fn subdomain_exists(pool: &PgPool, subdomain: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM businesses WHERE subdomain = $1)",
        )
        .bind(subdomain)
        .fetch_one(pool)
        .await
    }

    /// Insert a business.
    ///
    /// Returns `None` when a business for the same checkout session already
    /// exists, so webhook redelivery does not create duplicates.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBusiness,
    ) -> Result<Option<Business>, sqlx::Error> {
        let query = format!(
            "INSERT INTO businesses \
                (owner_user_id, name, subdomain, plan, billing_period, team_size, \
                 stripe_customer_id, stripe_subscription_id, stripe_checkout_session_id, \
                 signup_lead_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (stripe_checkout_session_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Business>(&query)
            .bind(input.owner_user_id)
            .bind(&input.name)
            .bind(&input.subdomain)
            .bind(&input.plan)
            .bind(&input.billing_period)
            .bind(input.team_size)
            .bind(&input.stripe_customer_id)
            .bind(&input.stripe_subscription_id)
            .bind(&input.stripe_checkout_session_id)
            .bind(input.signup_lead_id)
            .fetch_optional(pool)
            .await
    }
}
