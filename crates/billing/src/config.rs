//! Stripe configuration and the price table.

use brnno_core::pricing::{PriceSlot, PriceTable};

/// Prefix of the per-slot price id variables, e.g. `STRIPE_PRICE_PRO_2_MONTHLY`.
pub const PRICE_ENV_PREFIX: &str = "STRIPE_PRICE_";

/// Stripe credentials and the checkout price table.
#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub prices: PriceTable,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Nothing here is required at startup: a missing key or price id is
    /// reported as a configuration error by the call that needs it.
    ///
    /// | Variable                          | Purpose                          |
    /// |-----------------------------------|----------------------------------|
    /// | `STRIPE_SECRET_KEY`               | API key                          |
    /// | `STRIPE_WEBHOOK_SECRET`           | Webhook signing secret           |
    /// | `STRIPE_PRICE_STARTER_MONTHLY`    | Price id, one per slot           |
    /// | `STRIPE_PRICE_PRO_2_YEARLY`, ...  | (10 slots in total)              |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut prices = PriceTable::new();
        for slot in PriceSlot::all() {
            if let Some(id) = get(&price_env_var(&slot)) {
                prices.insert(slot, id);
            }
        }

        let config = Self {
            secret_key: get("STRIPE_SECRET_KEY"),
            webhook_secret: get("STRIPE_WEBHOOK_SECRET"),
            prices,
        };

        if config.prices.len() < PriceSlot::all().len() {
            tracing::warn!(
                configured = config.prices.len(),
                "Not every Stripe price slot has a price id"
            );
        }
        config
    }
}

/// Environment variable holding the price id for a slot.
pub fn price_env_var(slot: &PriceSlot) -> String {
    format!("{PRICE_ENV_PREFIX}{}", slot.key().to_uppercase())
}

#[cfg(test)]
mod tests {
    use brnno_core::pricing::{BillingPeriod, Plan};

    use super::*;

    #[test]
    fn env_var_names_follow_slot_keys() {
        let slot = brnno_core::pricing::resolve_slot(Plan::Fleet, BillingPeriod::Yearly, 5).unwrap();
        assert_eq!(price_env_var(&slot), "STRIPE_PRICE_FLEET_5_YEARLY");
    }

    #[test]
    fn loads_prices_and_secrets() {
        let config = StripeConfig::from_lookup(|key| match key {
            "STRIPE_SECRET_KEY" => Some("sk_test_123".to_string()),
            "STRIPE_WEBHOOK_SECRET" => Some("   ".to_string()),
            "STRIPE_PRICE_PRO_3_MONTHLY" => Some("price_pro3".to_string()),
            _ => None,
        });
        assert_eq!(config.secret_key.as_deref(), Some("sk_test_123"));
        assert!(config.webhook_secret.is_none());
        assert_eq!(config.prices.len(), 1);
        assert_eq!(
            config.prices.resolve(Plan::Pro, BillingPeriod::Monthly, 3).unwrap(),
            "price_pro3"
        );
    }
}
