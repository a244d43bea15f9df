//! Domain types, constants and pure business rules for the BRNNO backend.
//!
//! Nothing in this crate touches the database or the network; the `db`,
//! `billing`, `email` and `api` crates build on these definitions.

pub mod assignment;
pub mod discount;
pub mod error;
pub mod funnel;
pub mod pricing;
pub mod recovery;
pub mod tenancy;
pub mod types;
