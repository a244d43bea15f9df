//! Discount code rules.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Message returned when no active code matches.
pub const INVALID_CODE_MESSAGE: &str = "Invalid discount code";

/// Maximum length of a discount code after normalization.
pub const MAX_CODE_LEN: usize = 64;

/// Why an existing, active code cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRejection {
    Expired,
    UsageLimitReached,
}

impl DiscountRejection {
    pub fn message(self) -> &'static str {
        match self {
            Self::Expired => "Discount code has expired",
            Self::UsageLimitReached => "Discount code usage limit reached",
        }
    }
}

impl From<DiscountRejection> for CoreError {
    fn from(r: DiscountRejection) -> Self {
        CoreError::Validation(r.message().to_string())
    }
}

/// Normalize a user-entered code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> Result<String, CoreError> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(CoreError::Validation("code must not be empty".to_string()));
    }
    if code.len() > MAX_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "code must be at most {MAX_CODE_LEN} characters"
        )));
    }
    Ok(code)
}

/// Check expiry and usage limit for an active code.
///
/// A code whose `valid_until` equals `now` is still usable; it expires once
/// that instant has passed.
pub fn check_usable(
    valid_until: Option<Timestamp>,
    usage_count: i32,
    usage_limit: Option<i32>,
    now: Timestamp,
) -> Result<(), DiscountRejection> {
    if let Some(until) = valid_until {
        if until < now {
            return Err(DiscountRejection::Expired);
        }
    }
    if let Some(limit) = usage_limit {
        if usage_count >= limit {
            return Err(DiscountRejection::UsageLimitReached);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn code_is_trimmed_and_uppercased() {
        assert_eq!(normalize_code("  spring10 ").unwrap(), "SPRING10");
    }

    #[test]
    fn blank_code_is_rejected() {
        assert!(normalize_code("   ").is_err());
    }

    #[test]
    fn overlong_code_is_rejected() {
        assert!(normalize_code(&"x".repeat(MAX_CODE_LEN + 1)).is_err());
    }

    #[test]
    fn usage_at_limit_is_rejected() {
        let now = Utc::now();
        assert_eq!(
            check_usable(None, 10, Some(10), now),
            Err(DiscountRejection::UsageLimitReached)
        );
    }

    #[test]
    fn usage_one_below_limit_is_accepted() {
        let now = Utc::now();
        assert_eq!(check_usable(None, 9, Some(10), now), Ok(()));
    }

    #[test]
    fn unlimited_code_ignores_usage_count() {
        let now = Utc::now();
        assert_eq!(check_usable(None, 10_000, None, now), Ok(()));
    }

    #[test]
    fn valid_until_exactly_now_is_accepted() {
        let now = Utc::now();
        assert_eq!(check_usable(Some(now), 0, None, now), Ok(()));
    }

    #[test]
    fn valid_until_in_the_past_is_expired() {
        let now = Utc::now();
        let until = now - Duration::milliseconds(1);
        assert_eq!(
            check_usable(Some(until), 0, None, now),
            Err(DiscountRejection::Expired)
        );
    }

    #[test]
    fn expiry_is_reported_before_usage() {
        let now = Utc::now();
        let until = now - Duration::days(1);
        assert_eq!(
            check_usable(Some(until), 5, Some(5), now),
            Err(DiscountRejection::Expired)
        );
    }

    #[test]
    fn rejection_converts_to_validation_error() {
        let err: CoreError = DiscountRejection::Expired.into();
        assert_eq!(
            err.to_string(),
            "Validation failed: Discount code has expired"
        );
    }
}
