/// Error type for billing provider operations.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// The provider API call failed.
    #[error("Stripe error: {0}")]
    Provider(String),

    /// The webhook signature did not verify against the configured secret.
    #[error("Webhook signature verification failed: {0}")]
    WebhookSignature(String),

    /// The webhook verified but its payload is not what we expect.
    #[error("Invalid webhook payload: {0}")]
    WebhookPayload(String),

    /// Credentials or price ids are missing.
    #[error("Billing configuration error: {0}")]
    Configuration(String),
}

impl From<stripe::StripeError> for BillingError {
    fn from(err: stripe::StripeError) -> Self {
        BillingError::Provider(err.to_string())
    }
}
