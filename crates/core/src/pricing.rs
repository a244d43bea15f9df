//! Subscription plans and the checkout price table.
//!
//! A `(plan, billing period, team size)` tuple resolves to a [`PriceSlot`];
//! the slot is then looked up in a [`PriceTable`] populated from
//! configuration to obtain the provider's price id.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Plans and billing periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Starter,
    Pro,
    Fleet,
}

impl Plan {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "starter" => Ok(Self::Starter),
            "pro" => Ok(Self::Pro),
            "fleet" => Ok(Self::Fleet),
            _ => Err(CoreError::Validation(format!(
                "Unknown plan '{s}'. Must be one of: starter, pro, fleet"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Fleet => "fleet",
        }
    }

    /// Largest team size the plan can be bought for.
    pub fn max_team_size(self) -> i32 {
        match self {
            Self::Starter => 1,
            Self::Pro => 3,
            Self::Fleet => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(CoreError::Validation(format!(
                "Unknown billing period '{s}'. Must be one of: monthly, yearly"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

// ---------------------------------------------------------------------------
// Price slots
// ---------------------------------------------------------------------------

/// Size tier inside a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeTier {
    /// Starter is single-seat only.
    Single,
    /// Pro for up to two members.
    ProUpTo2,
    /// Pro for three members.
    Pro3,
    /// Fleet for up to three members.
    FleetUpTo3,
    /// Fleet for four or five members.
    FleetUpTo5,
}

/// One row of the checkout price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceSlot {
    pub tier: SizeTier,
    pub period: BillingPeriod,
}

impl PriceSlot {
    /// Every slot of the fixed table.
    pub fn all() -> Vec<PriceSlot> {
        let tiers = [
            SizeTier::Single,
            SizeTier::ProUpTo2,
            SizeTier::Pro3,
            SizeTier::FleetUpTo3,
            SizeTier::FleetUpTo5,
        ];
        let periods = [BillingPeriod::Monthly, BillingPeriod::Yearly];
        tiers
            .iter()
            .flat_map(|&tier| periods.iter().map(move |&period| PriceSlot { tier, period }))
            .collect()
    }

    /// Stable key for the slot, e.g. `pro_2_monthly`.
    ///
    /// Also used (upper-cased) as the suffix of the `STRIPE_PRICE_*`
    /// environment variables.
    pub fn key(&self) -> String {
        let tier = match self.tier {
            SizeTier::Single => "starter",
            SizeTier::ProUpTo2 => "pro_2",
            SizeTier::Pro3 => "pro_3",
            SizeTier::FleetUpTo3 => "fleet_3",
            SizeTier::FleetUpTo5 => "fleet_5",
        };
        format!("{tier}_{}", self.period.as_str())
    }
}

impl fmt::Display for PriceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Resolve the price slot for a plan, billing period and team size.
///
/// Pro splits at team size 2 vs 3; Fleet splits at 3 vs 4-5. Team sizes
/// outside what the plan supports are rejected.
pub fn resolve_slot(
    plan: Plan,
    period: BillingPeriod,
    team_size: i32,
) -> Result<PriceSlot, CoreError> {
    if team_size < 1 {
        return Err(CoreError::Validation(format!(
            "Team size must be at least 1, got {team_size}"
        )));
    }
    if team_size > plan.max_team_size() {
        return Err(CoreError::Validation(format!(
            "Plan '{}' supports at most {} team members, got {team_size}",
            plan.as_str(),
            plan.max_team_size()
        )));
    }

    let tier = match plan {
        Plan::Starter => SizeTier::Single,
        Plan::Pro if team_size <= 2 => SizeTier::ProUpTo2,
        Plan::Pro => SizeTier::Pro3,
        Plan::Fleet if team_size <= 3 => SizeTier::FleetUpTo3,
        Plan::Fleet => SizeTier::FleetUpTo5,
    };

    Ok(PriceSlot { tier, period })
}

// ---------------------------------------------------------------------------
// Price table
// ---------------------------------------------------------------------------

/// Provider price ids keyed by slot.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<PriceSlot, String>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the price id for a slot. Blank ids are ignored.
    pub fn insert(&mut self, slot: PriceSlot, price_id: impl Into<String>) {
        let price_id = price_id.into();
        if !price_id.trim().is_empty() {
            self.prices.insert(slot, price_id.trim().to_string());
        }
    }

    pub fn get(&self, slot: &PriceSlot) -> Option<&str> {
        self.prices.get(slot).map(String::as_str)
    }

    /// Resolve the price id for a checkout request.
    ///
    /// Unknown combinations are validation errors; a known slot with no
    /// configured price id is a configuration error.
    pub fn resolve(
        &self,
        plan: Plan,
        period: BillingPeriod,
        team_size: i32,
    ) -> Result<&str, CoreError> {
        let slot = resolve_slot(plan, period, team_size)?;
        self.get(&slot).ok_or_else(|| {
            CoreError::Configuration(format!("No price id configured for '{slot}'"))
        })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
