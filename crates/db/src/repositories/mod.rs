//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod business_repo;
pub mod discount_code_repo;
pub mod job_assignment_repo;
pub mod signup_lead_repo;

pub use business_repo::BusinessRepo;
pub use discount_code_repo::DiscountCodeRepo;
pub use job_assignment_repo::JobAssignmentRepo;
pub use signup_lead_repo::SignupLeadRepo;
