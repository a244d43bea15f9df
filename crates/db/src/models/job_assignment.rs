//! Job assignment model used by the worker portal.

use brnno_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `job_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobAssignment {
    pub id: DbId,
    pub job_id: DbId,
    pub team_member_id: DbId,
    pub status: String,
    pub clocked_in_at: Option<Timestamp>,
    pub clocked_out_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
