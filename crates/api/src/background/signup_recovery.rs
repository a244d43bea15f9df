//! Abandoned-signup recovery emails.
//!
//! One run selects up to [`BATCH_LIMIT`] abandoned, unconverted leads and
//! sends each at most one reminder, the next stage whose threshold has
//! passed. Sending and counting are separate steps: a crash between them
//! re-sends that stage on the next run.

use brnno_core::funnel::SignupStep;
use brnno_core::recovery::{due_stage, hours_elapsed, BATCH_LIMIT, MIN_ABANDONED_HOURS};
use brnno_core::types::Timestamp;
use brnno_db::models::signup_lead::SignupLead;
use brnno_db::repositories::SignupLeadRepo;
use brnno_email::templates::{recovery_email, RecoveryContext};
use brnno_email::Mailer;
use chrono::Duration;
use serde::Serialize;
use sqlx::PgPool;

/// Counts reported by a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryOutcome {
    /// Leads examined.
    pub processed: usize,
    /// Emails handed to the mailer successfully.
    pub sent: usize,
}

/// Process one batch of abandoned leads.
///
/// Only the candidate query can fail the run; per-lead send and update
/// failures are logged and skipped.
pub async fn run_once(
    pool: &PgPool,
    mailer: &dyn Mailer,
    app_url: &str,
    now: Timestamp,
) -> Result<RecoveryOutcome, sqlx::Error> {
    let cutoff = now - Duration::hours(MIN_ABANDONED_HOURS);
    let leads = SignupLeadRepo::list_recovery_candidates(pool, cutoff, BATCH_LIMIT).await?;

    let mut outcome = RecoveryOutcome {
        processed: leads.len(),
        sent: 0,
    };

    for lead in &leads {
        if process_lead(pool, mailer, app_url, lead, now).await {
            outcome.sent += 1;
        }
    }

    tracing::info!(
        processed = outcome.processed,
        sent = outcome.sent,
        "Signup recovery run finished"
    );
    Ok(outcome)
}

/// Send the due reminder for one lead. Returns `true` if an email went out.
async fn process_lead(
    pool: &PgPool,
    mailer: &dyn Mailer,
    app_url: &str,
    lead: &SignupLead,
    now: Timestamp,
) -> bool {
    let Some(abandoned_at) = lead.abandoned_at else {
        return false;
    };
    let Some(stage) = due_stage(lead.recovery_emails_sent, abandoned_at, now) else {
        tracing::debug!(
            lead_id = lead.id,
            hours = hours_elapsed(abandoned_at, now),
            "No recovery email due yet"
        );
        return false;
    };

    let ctx = RecoveryContext {
        lead_id: lead.id,
        email: &lead.email,
        first_name: lead.first_name.as_deref(),
        stopped_at: lead
            .abandoned_at_step
            .as_deref()
            .and_then(SignupStep::from_label),
        app_url,
    };

    if let Err(e) = mailer.send(&recovery_email(stage, &ctx)).await {
        tracing::warn!(lead_id = lead.id, stage = stage.number(), error = %e, "Recovery email failed");
        return false;
    }

    match SignupLeadRepo::record_recovery_email(pool, lead.id, now).await {
        Ok(Some(count)) => {
            tracing::info!(lead_id = lead.id, stage = stage.number(), count, "Recovery email sent");
        }
        Ok(None) => {
            tracing::warn!(lead_id = lead.id, "Recovery email sent but counter was already at its cap");
        }
        Err(e) => {
            tracing::error!(
                lead_id = lead.id,
                stage = stage.number(),
                error = %e,
                "Recovery email sent but counter not updated; the next run will resend"
            );
        }
    }
    true
}
