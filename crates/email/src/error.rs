//! Error type for email delivery failures.

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The HTTP request to the email API failed (network, DNS, timeout).
    #[error("Email API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The email API returned a non-2xx status code.
    #[error("Email API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// No transport is configured.
    #[error("Email delivery is not configured (set EMAIL_API_KEY or SMTP_HOST)")]
    NotConfigured,
}
