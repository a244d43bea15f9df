//! Repository for the `signup_leads` table.

use brnno_core::funnel::SignupStep;
use brnno_core::recovery::MAX_RECOVERY_EMAILS;
use brnno_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::signup_lead::{SignupLead, UpdateSignupLead};

/// Column list for `signup_leads` queries.
const COLUMNS: &str = "\
    id, email, first_name, last_name, business_name, current_step, \
    step2_completed_at, step3_completed_at, step4_completed_at, \
    abandoned_at, abandoned_at_step, recovery_emails_sent, last_recovery_email_at, \
    converted, converted_at, selected_plan, team_size, billing_period, \
    created_at, updated_at";

/// Provides funnel operations for signup leads.
pub struct SignupLeadRepo;

impl SignupLeadRepo {
    /// Find a lead by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SignupLead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM signup_leads WHERE id = $1");
        sqlx::query_as::<_, SignupLead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the open (unconverted) lead for an email, creating it on
    /// first sight.
    ///
    /// Relies on the partial unique index `uq_signup_leads_open_email`; the
    /// no-op `DO UPDATE` guarantees `RETURNING` yields the existing row.
    /// `email` must already be normalized.
    pub async fn get_or_create(pool: &PgPool, email: &str) -> Result<SignupLead, sqlx::Error> {
        let query = format!(
            "INSERT INTO signup_leads (email, current_step) \
             VALUES ($1, 1) \
             ON CONFLICT (email) WHERE NOT converted \
             DO UPDATE SET email = signup_leads.email \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SignupLead>(&query)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Record a step transition.
    ///
    /// Sets `current_step`, stamps the step's completion column (if it has
    /// one), merges the provided fields and sets or clears the abandonment
    /// marker. Repeating the same call overwrites the same columns.
    pub async fn update_step(
        pool: &PgPool,
        id: DbId,
        step: SignupStep,
        input: &UpdateSignupLead,
        abandoned: bool,
    ) -> Result<Option<SignupLead>, sqlx::Error> {
        let completion = step
            .completion_column()
            .map(|col| format!("{col} = NOW(), "))
            .unwrap_or_default();

        let query = format!(
            "UPDATE signup_leads SET \
                current_step = $2, \
                {completion}\
                first_name = COALESCE($3, first_name), \
                last_name = COALESCE($4, last_name), \
                business_name = COALESCE($5, business_name), \
                selected_plan = COALESCE($6, selected_plan), \
                team_size = COALESCE($7, team_size), \
                billing_period = COALESCE($8, billing_period), \
                abandoned_at = CASE WHEN $9 THEN NOW() ELSE NULL END, \
                abandoned_at_step = CASE WHEN $9 THEN $10 ELSE NULL END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SignupLead>(&query)
            .bind(id)
            .bind(step.to_number())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.business_name)
            .bind(&input.selected_plan)
            .bind(input.team_size)
            .bind(&input.billing_period)
            .bind(abandoned)
            .bind(step.label())
            .fetch_optional(pool)
            .await
    }

    /// Store the plan chosen at checkout and move the lead to the final step.
    pub async fn record_checkout_selection(
        pool: &PgPool,
        id: DbId,
        plan: &str,
        team_size: i32,
        billing_period: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE signup_leads \
             SET selected_plan = $2, team_size = $3, billing_period = $4, \
                 current_step = $5, abandoned_at = NULL, abandoned_at_step = NULL, \
                 updated_at = NOW() \
             WHERE id = $1 AND NOT converted",
        )
        .bind(id)
        .bind(plan)
        .bind(team_size)
        .bind(billing_period)
        .bind(SignupStep::Checkout.to_number())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a lead converted. Returns `false` if it was already converted or
    /// does not exist.
    pub async fn mark_converted(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE signup_leads \
             SET converted = TRUE, converted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND NOT converted",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Leads eligible for a recovery email check.
    ///
    /// Unconverted, abandoned before `abandoned_before`, with fewer than
    /// the maximum number of reminders sent. Oldest abandonment first.
    pub async fn list_recovery_candidates(
        pool: &PgPool,
        abandoned_before: Timestamp,
        limit: i64,
    ) -> Result<Vec<SignupLead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM signup_leads \
             WHERE NOT converted \
               AND abandoned_at IS NOT NULL \
               AND abandoned_at < $1 \
               AND COALESCE(recovery_emails_sent, 0) < $2 \
             ORDER BY abandoned_at ASC \
             LIMIT $3"
        );
        sqlx::query_as::<_, SignupLead>(&query)
            .bind(abandoned_before)
            .bind(MAX_RECOVERY_EMAILS)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Increment the reminder counter after a send.
    ///
    /// The increment is conditional on the cap, so the counter never exceeds
    /// the maximum. Returns the new count, or `None` when no row was updated.
    pub async fn record_recovery_email(
        pool: &PgPool,
        id: DbId,
        sent_at: Timestamp,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE signup_leads \
             SET recovery_emails_sent = COALESCE(recovery_emails_sent, 0) + 1, \
                 last_recovery_email_at = $2, \
                 updated_at = NOW() \
             WHERE id = $1 AND COALESCE(recovery_emails_sent, 0) < $3 \
             RETURNING recovery_emails_sent",
        )
        .bind(id)
        .bind(sent_at)
        .bind(MAX_RECOVERY_EMAILS)
        .fetch_optional(pool)
        .await
    }
}
