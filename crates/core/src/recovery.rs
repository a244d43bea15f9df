//! Abandoned-signup recovery schedule.
//!
//! A lead that abandoned the funnel receives up to three reminder emails.
//! Email `N + 1` becomes due once the time since abandonment reaches the
//! threshold for `N` emails already sent.

use chrono::Duration;

use crate::types::Timestamp;

/// Hours after abandonment at which each stage becomes due.
pub const STAGE_THRESHOLD_HOURS: [i64; 3] = [1, 24, 72];

/// Hard cap on reminder emails per lead.
pub const MAX_RECOVERY_EMAILS: i32 = 3;

/// Leads processed per scheduler run.
pub const BATCH_LIMIT: i64 = 50;

/// Leads abandoned more recently than this are not selected at all.
pub const MIN_ABANDONED_HOURS: i64 = 1;

/// The three reminder emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStage {
    First,
    Second,
    Third,
}

impl RecoveryStage {
    /// 1-based stage number, equal to the value `recovery_emails_sent`
    /// takes after this stage is sent.
    pub fn number(self) -> i32 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    fn from_sent(sent: i32) -> Option<Self> {
        match sent {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            _ => None,
        }
    }

    pub fn threshold(self) -> Duration {
        Duration::hours(STAGE_THRESHOLD_HOURS[(self.number() - 1) as usize])
    }
}

/// Decide which reminder, if any, is due for a lead.
///
/// `sent` is the stored `recovery_emails_sent` (null counts as zero).
/// Returns `None` when all reminders have gone out or the next one is not
/// due yet.
pub fn due_stage(sent: Option<i32>, abandoned_at: Timestamp, now: Timestamp) -> Option<RecoveryStage> {
    let sent = sent.unwrap_or(0).max(0);
    let stage = RecoveryStage::from_sent(sent)?;
    if now - abandoned_at >= stage.threshold() {
        Some(stage)
    } else {
        None
    }
}

/// Whole hours elapsed since abandonment (for logging).
pub fn hours_elapsed(abandoned_at: Timestamp, now: Timestamp) -> i64 {
    (now - abandoned_at).num_hours()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
