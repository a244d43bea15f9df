//! Job assignment status values and worker clock rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Status of a team member's assignment to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Scheduled,
    EnRoute,
    InProgress,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "en_route" => Ok(Self::EnRoute),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::Validation(format!(
                "Invalid assignment status '{s}'. Must be one of: scheduled, en_route, \
                 in_progress, completed, cancelled"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::EnRoute => "en_route",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Job status set once every assignment of the job is completed.
pub const JOB_STATUS_COMPLETED: &str = "completed";

/// Clock-in is allowed once, and never on a finished assignment.
pub fn validate_clock_in(
    status: &str,
    clocked_in_at: Option<Timestamp>,
) -> Result<(), CoreError> {
    if clocked_in_at.is_some() {
        return Err(CoreError::Conflict("Already clocked in".to_string()));
    }
    ensure_open(status)
}

/// Clock-out requires a prior clock-in and no earlier clock-out.
pub fn validate_clock_out(
    clocked_in_at: Option<Timestamp>,
    clocked_out_at: Option<Timestamp>,
) -> Result<(), CoreError> {
    if clocked_in_at.is_none() {
        return Err(CoreError::Conflict("Not clocked in".to_string()));
    }
    if clocked_out_at.is_some() {
        return Err(CoreError::Conflict("Already clocked out".to_string()));
    }
    Ok(())
}

/// Completion is rejected for assignments already completed or cancelled.
pub fn validate_complete(status: &str) -> Result<(), CoreError> {
    ensure_open(status)
}

/// Finished assignments are terminal: no status may be set on them.
pub fn validate_status_change(status: &str) -> Result<(), CoreError> {
    ensure_open(status)
}

fn ensure_open(status: &str) -> Result<(), CoreError> {
    match AssignmentStatus::parse(status) {
        Ok(AssignmentStatus::Completed) => Err(CoreError::Conflict(
            "Assignment is already completed".to_string(),
        )),
        Ok(AssignmentStatus::Cancelled) => Err(CoreError::Conflict(
            "Assignment has been cancelled".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    #[test]
    fn status_strings_parse() {
        for s in ["scheduled", "en_route", "in_progress", "completed", "cancelled"] {
            assert_eq!(AssignmentStatus::parse(s).unwrap().as_str(), s);
        }
        assert_matches!(AssignmentStatus::parse("done"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn clock_in_twice_conflicts() {
        assert!(validate_clock_in("scheduled", None).is_ok());
        assert_matches!(
            validate_clock_in("in_progress", Some(Utc::now())),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn clock_in_on_completed_conflicts() {
        assert_matches!(validate_clock_in("completed", None), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn clock_out_requires_clock_in() {
        assert_matches!(validate_clock_out(None, None), Err(CoreError::Conflict(_)));
        assert!(validate_clock_out(Some(Utc::now()), None).is_ok());
        assert_matches!(
            validate_clock_out(Some(Utc::now()), Some(Utc::now())),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn completing_a_cancelled_assignment_conflicts() {
        assert_matches!(validate_complete("cancelled"), Err(CoreError::Conflict(_)));
        assert!(validate_complete("en_route").is_ok());
    }

    #[test]
    fn finished_assignments_reject_status_changes() {
        assert_matches!(validate_status_change("completed"), Err(CoreError::Conflict(_)));
        assert_matches!(validate_status_change("cancelled"), Err(CoreError::Conflict(_)));
        assert!(validate_status_change("scheduled").is_ok());
    }
}
