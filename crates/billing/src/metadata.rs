//! The signup payload carried through checkout session metadata.

use std::collections::HashMap;

use brnno_core::types::{DbId, UserId};

use crate::error::BillingError;

/// Everything the webhook needs to materialize a business, stored as
/// string metadata on the checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupMetadata {
    pub plan: String,
    pub billing_period: String,
    pub team_size: i32,
    pub business_name: String,
    pub user_id: UserId,
    pub signup_lead_id: Option<DbId>,
    pub email: String,
}

impl SignupMetadata {
    pub fn to_metadata(&self) -> HashMap<String, String> {
        let mut meta = HashMap::new();
        meta.insert("plan".to_string(), self.plan.clone());
        meta.insert("billing_period".to_string(), self.billing_period.clone());
        meta.insert("team_size".to_string(), self.team_size.to_string());
        meta.insert("business_name".to_string(), self.business_name.clone());
        meta.insert("user_id".to_string(), self.user_id.to_string());
        if let Some(lead_id) = self.signup_lead_id {
            meta.insert("signup_lead_id".to_string(), lead_id.to_string());
        }
        meta.insert("email".to_string(), self.email.clone());
        meta
    }

    pub fn from_metadata(meta: &HashMap<String, String>) -> Result<Self, BillingError> {
        let field = |key: &str| {
            meta.get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| BillingError::WebhookPayload(format!("missing metadata '{key}'")))
        };
        let parse_err =
            |key: &str, value: &str| BillingError::WebhookPayload(format!("invalid {key} '{value}'"));

        let team_size = field("team_size")?;
        let user_id = field("user_id")?;
        let signup_lead_id = match meta.get("signup_lead_id").filter(|v| !v.is_empty()) {
            Some(v) => Some(v.parse().map_err(|_| parse_err("signup_lead_id", v))?),
            None => None,
        };

        Ok(Self {
            plan: field("plan")?,
            billing_period: field("billing_period")?,
            team_size: team_size
                .parse()
                .map_err(|_| parse_err("team_size", &team_size))?,
            business_name: field("business_name")?,
            user_id: user_id.parse().map_err(|_| parse_err("user_id", &user_id))?,
            signup_lead_id,
            email: field("email")?,
        })
    }
}
