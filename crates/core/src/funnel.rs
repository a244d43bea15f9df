//! Signup funnel steps and lead-capture helpers.
//!
//! The step table lives here and nowhere else: the lead endpoint, the
//! repository and the recovery emails all resolve step numbers and labels
//! through [`SignupStep`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The five steps of the signup funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupStep {
    Email,
    BusinessInfo,
    PlanSelection,
    TeamSize,
    Checkout,
}

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 5;

impl SignupStep {
    /// All steps in funnel order.
    pub const ALL: [SignupStep; 5] = [
        Self::Email,
        Self::BusinessInfo,
        Self::PlanSelection,
        Self::TeamSize,
        Self::Checkout,
    ];

    /// Convert a 1-based step number to a `SignupStep`.
    pub fn from_number(n: i32) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Email),
            2 => Ok(Self::BusinessInfo),
            3 => Ok(Self::PlanSelection),
            4 => Ok(Self::TeamSize),
            5 => Ok(Self::Checkout),
            _ => Err(CoreError::Validation(format!(
                "Invalid step {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> i32 {
        match self {
            Self::Email => 1,
            Self::BusinessInfo => 2,
            Self::PlanSelection => 3,
            Self::TeamSize => 4,
            Self::Checkout => 5,
        }
    }

    /// Machine label stored in `signup_leads.abandoned_at_step`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::BusinessInfo => "business_info",
            Self::PlanSelection => "plan_selection",
            Self::TeamSize => "team_size",
            Self::Checkout => "checkout",
        }
    }

    /// Parse a stored label back into a step.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Human-readable name used in recovery emails.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::BusinessInfo => "Business details",
            Self::PlanSelection => "Choose a plan",
            Self::TeamSize => "Team size",
            Self::Checkout => "Payment",
        }
    }

    /// Column stamped when a lead reaches this step.
    ///
    /// Only steps 2-4 carry a completion timestamp; step 1 is covered by
    /// `created_at` and step 5 by conversion.
    pub fn completion_column(self) -> Option<&'static str> {
        match self {
            Self::BusinessInfo => Some("step2_completed_at"),
            Self::PlanSelection => Some("step3_completed_at"),
            Self::TeamSize => Some("step4_completed_at"),
            Self::Email | Self::Checkout => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Email normalization
// ---------------------------------------------------------------------------

/// Trim and lower-case an email address so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
