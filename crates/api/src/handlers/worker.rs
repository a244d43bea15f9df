//! Handlers for the worker portal's assignment endpoints.
//!
//! Every route requires a bearer token; the assignment must belong to an
//! active team member linked to the token's user, otherwise it is reported
//! as not found.

use axum::extract::State;
use axum::Json;
use brnno_core::assignment::{
    validate_clock_in, validate_clock_out, validate_complete, validate_status_change,
    AssignmentStatus,
};
use brnno_core::error::CoreError;
use brnno_core::types::DbId;
use brnno_db::models::job_assignment::JobAssignment;
use brnno_db::repositories::JobAssignmentRepo;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockRequest {
    pub assignment_id: DbId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub assignment_id: DbId,
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub assignment_id: DbId,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "JobAssignment",
        id,
    }
}

async fn load_assignment(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<JobAssignment> {
    Ok(JobAssignmentRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

/// A guarded update matched no row: another request changed the assignment
/// between the load and the write.
fn lost_race() -> CoreError {
    CoreError::Conflict("Assignment was modified concurrently".to_string())
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// Complete the job if no open assignment is left on it.
async fn roll_up_job(state: &AppState, job_id: DbId) -> AppResult<()> {
    if JobAssignmentRepo::complete_job_if_finished(&state.pool, job_id).await? {
        tracing::info!(job_id, "Job completed");
    }
    Ok(())
}

/// Complete the assignment and, if it was the last open one, its job.
async fn finish(state: &AppState, assignment: &JobAssignment, notes: Option<&str>) -> AppResult<()> {
    JobAssignmentRepo::complete(&state.pool, assignment.id, notes)
        .await?
        .ok_or_else(lost_race)?;
    roll_up_job(state, assignment.job_id).await
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/worker/clock-in
pub async fn clock_in(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ClockRequest>,
) -> AppResult<Json<Value>> {
    let assignment = load_assignment(&state, &user, input.assignment_id).await?;
    validate_clock_in(&assignment.status, assignment.clocked_in_at)?;

    JobAssignmentRepo::clock_in(&state.pool, assignment.id)
        .await?
        .ok_or_else(lost_race)?;
    tracing::info!(assignment_id = assignment.id, user_id = %user.user_id, "Clocked in");
    Ok(success())
}

/// POST /api/worker/clock-out
pub async fn clock_out(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<ClockRequest>,
) -> AppResult<Json<Value>> {
    let assignment = load_assignment(&state, &user, input.assignment_id).await?;
    validate_clock_out(assignment.clocked_in_at, assignment.clocked_out_at)?;

    JobAssignmentRepo::clock_out(&state.pool, assignment.id)
        .await?
        .ok_or_else(lost_race)?;
    tracing::info!(assignment_id = assignment.id, user_id = %user.user_id, "Clocked out");
    Ok(success())
}

/// POST /api/worker/status
///
/// Setting `completed` goes through the same path as `/complete`. Finished
/// assignments reject every status; cancelling the last open assignment
/// completes the job.
pub async fn update_status(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<StatusRequest>,
) -> AppResult<Json<Value>> {
    let status = AssignmentStatus::parse(&input.status)?;
    let assignment = load_assignment(&state, &user, input.assignment_id).await?;

    validate_status_change(&assignment.status)?;

    if status == AssignmentStatus::Completed {
        finish(&state, &assignment, None).await?;
    } else {
        JobAssignmentRepo::update_status(&state.pool, assignment.id, status)
            .await?
            .ok_or_else(lost_race)?;
        if status == AssignmentStatus::Cancelled {
            roll_up_job(&state, assignment.job_id).await?;
        }
    }

    tracing::info!(
        assignment_id = assignment.id,
        status = status.as_str(),
        "Assignment status updated"
    );
    Ok(success())
}

/// POST /api/worker/complete
pub async fn complete(
    user: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CompleteRequest>,
) -> AppResult<Json<Value>> {
    let assignment = load_assignment(&state, &user, input.assignment_id).await?;
    validate_complete(&assignment.status)?;

    let notes = input
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    finish(&state, &assignment, notes).await?;

    tracing::info!(assignment_id = assignment.id, user_id = %user.user_id, "Assignment completed");
    Ok(success())
}
