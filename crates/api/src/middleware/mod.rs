//! Request extractors guarding authenticated routes.
//!
//! - [`auth::AuthUser`] -- the worker identified by a JWT Bearer token.
//! - [`cron::CronAuth`] -- the scheduler presenting the shared cron secret.

pub mod auth;
pub mod cron;
