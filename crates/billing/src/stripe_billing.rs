//! [`BillingProvider`] backed by the Stripe API.

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionSubscriptionData, CreateCustomer,
    Customer, CustomerId, EventObject, EventType, ListCustomers, Webhook,
};

use crate::config::StripeConfig;
use crate::error::BillingError;
use crate::metadata::SignupMetadata;
use crate::provider::{
    BillingEvent, BillingProvider, CheckoutParams, CompletedCheckout, CreatedCheckout,
};

/// Stripe client plus the webhook signing secret.
pub struct StripeBilling {
    client: Client,
    webhook_secret: Option<String>,
}

impl StripeBilling {
    pub fn new(secret_key: &str, webhook_secret: Option<String>) -> Self {
        Self {
            client: Client::new(secret_key),
            webhook_secret,
        }
    }

    /// Build from configuration. Returns `None` without a secret key.
    pub fn from_config(config: &StripeConfig) -> Option<Self> {
        let key = config.secret_key.as_deref()?;
        Some(Self::new(key, config.webhook_secret.clone()))
    }
}

#[async_trait]
impl BillingProvider for StripeBilling {
    async fn find_or_create_customer(&self, email: &str) -> Result<String, BillingError> {
        let mut list = ListCustomers::new();
        list.email = Some(email);
        list.limit = Some(1);
        let existing = Customer::list(&self.client, &list).await?;

        if let Some(customer) = existing.data.into_iter().next() {
            tracing::debug!(customer_id = %customer.id, "Reusing Stripe customer");
            return Ok(customer.id.to_string());
        }

        let mut params = CreateCustomer::new();
        params.email = Some(email);
        let customer = Customer::create(&self.client, params).await?;
        tracing::info!(customer_id = %customer.id, "Created Stripe customer");
        Ok(customer.id.to_string())
    }

    async fn create_checkout_session(
        &self,
        params: CheckoutParams,
    ) -> Result<CreatedCheckout, BillingError> {
        let customer_id: CustomerId = params.customer_id.parse().map_err(|_| {
            BillingError::Provider(format!("Invalid customer id: {}", params.customer_id))
        })?;
        let metadata = params.metadata.to_metadata();

        let mut create = CreateCheckoutSession::new();
        create.customer = Some(customer_id);
        create.mode = Some(CheckoutSessionMode::Subscription);
        create.success_url = Some(&params.success_url);
        create.cancel_url = Some(&params.cancel_url);
        create.client_reference_id = params.client_reference_id.as_deref();
        create.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(params.price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);
        create.metadata = Some(metadata.clone());
        create.subscription_data = Some(CreateCheckoutSessionSubscriptionData {
            metadata: Some(metadata),
            ..Default::default()
        });

        let session = CheckoutSession::create(&self.client, create).await?;
        let url = session
            .url
            .ok_or_else(|| BillingError::Provider("Checkout session URL missing".to_string()))?;

        Ok(CreatedCheckout {
            session_id: session.id.to_string(),
            url,
        })
    }

    fn verify_webhook(&self, payload: &str, signature: &str) -> Result<BillingEvent, BillingError> {
        let secret = self.webhook_secret.as_deref().ok_or_else(|| {
            BillingError::Configuration("STRIPE_WEBHOOK_SECRET is not set".to_string())
        })?;
        let event = Webhook::construct_event(payload, signature, secret)
            .map_err(|e| BillingError::WebhookSignature(e.to_string()))?;

        match event.type_ {
            EventType::CheckoutSessionCompleted => {
                let EventObject::CheckoutSession(session) = event.data.object else {
                    return Err(BillingError::WebhookPayload(
                        "checkout.session.completed without a session object".to_string(),
                    ));
                };
                let meta = session.metadata.unwrap_or_default();
                Ok(BillingEvent::CheckoutCompleted(CompletedCheckout {
                    session_id: session.id.to_string(),
                    customer_id: session.customer.as_ref().map(|c| c.id().to_string()),
                    subscription_id: session.subscription.as_ref().map(|s| s.id().to_string()),
                    metadata: SignupMetadata::from_metadata(&meta)?,
                }))
            }
            other => Ok(BillingEvent::Other(other.to_string())),
        }
    }
}
