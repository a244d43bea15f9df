//! Subscription billing through Stripe.
//!
//! The API depends only on the [`BillingProvider`] trait. [`StripeBilling`]
//! is the production implementation; [`UnconfiguredBilling`] stands in when
//! no secret key is configured and fails every call with a configuration
//! error.

pub mod config;
pub mod error;
pub mod metadata;
pub mod provider;
pub mod stripe_billing;

pub use config::StripeConfig;
pub use error::BillingError;
pub use metadata::SignupMetadata;
pub use provider::{
    BillingEvent, BillingProvider, CheckoutParams, CompletedCheckout, CreatedCheckout,
    UnconfiguredBilling,
};
pub use stripe_billing::StripeBilling;
