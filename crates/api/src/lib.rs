//! BRNNO API server library.
//!
//! Exposes config, state, error handling, routes and the recovery job so
//! integration tests and the binary entrypoint share the same building
//! blocks.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
