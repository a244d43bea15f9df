//! Outbound email for the signup funnel.
//!
//! [`Mailer`] is the seam the API holds in its state. Two transports
//! implement it: [`SmtpMailer`] over `lettre` and [`HttpApiMailer`] for a
//! JSON email API over `reqwest`. [`build_mailer`] picks one from
//! [`EmailConfig`]; without configuration an [`UnconfiguredMailer`] reports
//! every send as a configuration error.

pub mod config;
pub mod error;
pub mod mailer;
pub mod templates;

pub use config::{EmailConfig, EmailTransport};
pub use error::EmailError;
pub use mailer::{build_mailer, HttpApiMailer, Mailer, OutgoingEmail, SmtpMailer, UnconfiguredMailer};
