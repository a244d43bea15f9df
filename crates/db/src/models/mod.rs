//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the input DTOs its repository accepts.

pub mod business;
pub mod discount_code;
pub mod job_assignment;
pub mod signup_lead;
