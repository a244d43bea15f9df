//! Repository for the `job_assignments` table (worker portal).

use brnno_core::assignment::{AssignmentStatus, JOB_STATUS_COMPLETED};
use brnno_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::job_assignment::JobAssignment;

/// Column list for `job_assignments` queries.
const COLUMNS: &str = "\
    id, job_id, team_member_id, status, clocked_in_at, clocked_out_at, \
    completed_at, notes, created_at, updated_at";

/// Provides the worker-facing assignment operations.
pub struct JobAssignmentRepo;

impl JobAssignmentRepo {
    /// Find an assignment that belongs to an active team member linked to
    /// the given identity-provider user.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM job_assignments ja \
             JOIN team_members tm ON tm.id = ja.team_member_id \
             WHERE ja.id = $1 AND tm.user_id = $2 AND tm.is_active",
            prefixed_columns("ja")
        );
        sqlx::query_as::<_, JobAssignment>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Clock in an open assignment that has not been clocked in yet.
    ///
    /// Returns `None` when the row no longer qualifies, e.g. a concurrent
    /// clock-in won.
    pub async fn clock_in(pool: &PgPool, id: DbId) -> Result<Option<JobAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE job_assignments \
             SET clocked_in_at = NOW(), status = $2, updated_at = NOW() \
             WHERE id = $1 AND clocked_in_at IS NULL AND status NOT IN ($3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobAssignment>(&query)
            .bind(id)
            .bind(AssignmentStatus::InProgress.as_str())
            .bind(AssignmentStatus::Completed.as_str())
            .bind(AssignmentStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Clock out a clocked-in assignment once. `None` if it does not qualify.
    pub async fn clock_out(pool: &PgPool, id: DbId) -> Result<Option<JobAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE job_assignments \
             SET clocked_out_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND clocked_in_at IS NOT NULL AND clocked_out_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobAssignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Change the status of an assignment that is neither completed nor
    /// cancelled. `None` if it is already finished.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: AssignmentStatus,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE job_assignments SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ($3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobAssignment>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(AssignmentStatus::Completed.as_str())
            .bind(AssignmentStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Mark an open assignment completed, clocking out if still clocked in.
    ///
    /// Returns `None` when it is already completed or cancelled, so only one
    /// of several concurrent completions succeeds.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<JobAssignment>, sqlx::Error> {
        let query = format!(
            "UPDATE job_assignments \
             SET status = $2, \
                 completed_at = NOW(), \
                 clocked_out_at = CASE \
                     WHEN clocked_in_at IS NOT NULL AND clocked_out_at IS NULL THEN NOW() \
                     ELSE clocked_out_at END, \
                 notes = COALESCE($3, notes), \
                 updated_at = NOW() \
             WHERE id = $1 AND status NOT IN ($2, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobAssignment>(&query)
            .bind(id)
            .bind(AssignmentStatus::Completed.as_str())
            .bind(notes)
            .bind(AssignmentStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Complete the job once none of its assignments remain open and at
    /// least one was completed. Returns `true` if the job status changed.
    pub async fn complete_job_if_finished(pool: &PgPool, job_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status = $2, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status <> $2 \
               AND NOT EXISTS ( \
                   SELECT 1 FROM job_assignments \
                   WHERE job_id = $1 AND status NOT IN ($3, $4) \
               ) \
               AND EXISTS ( \
                   SELECT 1 FROM job_assignments \
                   WHERE job_id = $1 AND status = $3 \
               )",
        )
        .bind(job_id)
        .bind(JOB_STATUS_COMPLETED)
        .bind(AssignmentStatus::Completed.as_str())
        .bind(AssignmentStatus::Cancelled.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
