//! The [`BillingProvider`] seam and its value types.

use async_trait::async_trait;

use crate::error::BillingError;
use crate::metadata::SignupMetadata;

/// Input for opening a hosted subscription checkout.
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    pub customer_id: String,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Set to the signup lead id when there is one.
    pub client_reference_id: Option<String>,
    pub metadata: SignupMetadata,
}

/// A checkout session the customer can be redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCheckout {
    pub session_id: String,
    pub url: String,
}

/// A completed checkout, decoded from a verified webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub metadata: SignupMetadata,
}

/// Verified webhook events, reduced to what the service acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    CheckoutCompleted(CompletedCheckout),
    /// Any other event type, by name. Acknowledged and ignored.
    Other(String),
}

#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Return the id of the first customer with this email, creating one if
    /// none exists.
    async fn find_or_create_customer(&self, email: &str) -> Result<String, BillingError>;

    async fn create_checkout_session(
        &self,
        params: CheckoutParams,
    ) -> Result<CreatedCheckout, BillingError>;

    /// Verify the signature and decode the event.
    fn verify_webhook(&self, payload: &str, signature: &str) -> Result<BillingEvent, BillingError>;
}

/// Used when `STRIPE_SECRET_KEY` is not set.
pub struct UnconfiguredBilling;

fn not_configured() -> BillingError {
    BillingError::Configuration("STRIPE_SECRET_KEY is not set".to_string())
}

#[async_trait]
impl BillingProvider for UnconfiguredBilling {
    async fn find_or_create_customer(&self, _email: &str) -> Result<String, BillingError> {
        Err(not_configured())
    }

    async fn create_checkout_session(
        &self,
        _params: CheckoutParams,
    ) -> Result<CreatedCheckout, BillingError> {
        Err(not_configured())
    }

    fn verify_webhook(&self, _payload: &str, _signature: &str) -> Result<BillingEvent, BillingError> {
        Err(not_configured())
    }
}
