//! Scheduled jobs.
//!
//! Jobs here are triggered by an external scheduler through the cron
//! routes; each exposes a `run_once` that processes one batch.

pub mod signup_recovery;
