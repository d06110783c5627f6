// Copyright © 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Reference catalogs -- market climates, risk profiles, life events, expense
//! items, location multipliers and household templates.
//!
//! A [`Catalog`] is read-only data handed to the engine. [`Catalog::default`]
//! carries the built-in tables; callers may load a replacement from JSON.
//! Lookups by key are lenient: an unknown climate resolves to
//! [`FALLBACK_CLIMATE`] and an unknown risk profile to [`FALLBACK_RISK`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{LocationTier, StabilityTier};

/// Climate used when a decision names a key the catalog does not carry.
pub const FALLBACK_CLIMATE: &str = "neutral";
/// Risk profile used when a decision names an unknown key.
pub const FALLBACK_RISK: &str = "moderate";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate {kind} key `{key}`")]
    DuplicateKey { kind: &'static str, key: String },

    #[error("expense item `{key}` has an inverted price range ({min} > {max})")]
    InvertedRange { key: String, min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketClimate {
    pub key: String,
    pub label: String,
    /// Expected monthly return before risk scaling (0.004 = 0.4%).
    pub base_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub key: String,
    pub label: String,
    pub multiplier: f64,
}

/// Effects of a life event. Absent fields are neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EventImpact {
    pub cash_delta: Option<f64>,
    pub stress_delta: Option<f64>,
    pub income_multiplier: Option<f64>,
    pub expense_multiplier: Option<f64>,
    pub fixed_cost_delta: Option<f64>,
    pub market_shock: Option<f64>,
}

impl EventImpact {
    pub fn cash_delta(&self) -> f64 { self.cash_delta.unwrap_or(0.0) }
    pub fn stress_delta(&self) -> f64 { self.stress_delta.unwrap_or(0.0) }
    pub fn income_multiplier(&self) -> f64 { self.income_multiplier.unwrap_or(1.0) }
    pub fn expense_multiplier(&self) -> f64 { self.expense_multiplier.unwrap_or(1.0) }
    pub fn fixed_cost_delta(&self) -> f64 { self.fixed_cost_delta.unwrap_or(0.0) }
    pub fn market_shock(&self) -> f64 { self.market_shock.unwrap_or(0.0) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub impact: EventImpact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub key: String,
    pub label: String,
    pub min_price: f64,
    pub max_price: f64,
    /// Quantity a single-person household starts with.
    #[serde(default)]
    pub base_quantity: u32,
    /// Extra units per dependent when a plan is first derived.
    #[serde(default)]
    pub per_dependent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationMultipliers {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Default for LocationMultipliers {
    fn default() -> Self {
        Self { low: 0.85, mid: 1.0, high: 1.35 }
    }
}

impl LocationMultipliers {
    pub fn for_tier(&self, tier: LocationTier) -> f64 {
        match tier {
            LocationTier::Low => self.low,
            LocationTier::Mid => self.mid,
            LocationTier::High => self.high,
        }
    }
}

/// Debt shape a generated household may start with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtTemplate {
    pub label: String,
    pub balance_range: (f64, f64),
    pub rate_range: (f64, f64),
    /// Minimum due as a share of the starting balance.
    pub minimum_share: f64,
}

/// Inputs for generating a fresh [`crate::LifeStage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdTemplates {
    pub income_low: (f64, f64),
    pub income_medium: (f64, f64),
    pub income_high: (f64, f64),
    pub base_housing: f64,
    pub base_utilities: f64,
    /// Housing/utilities increase per dependent, as a fraction.
    pub dependent_cost_share: f64,
    pub starting_cash_months: (f64, f64),
    pub debts: Vec<DebtTemplate>,
}

impl HouseholdTemplates {
    pub fn income_range(&self, tier: StabilityTier) -> (f64, f64) {
        match tier {
            StabilityTier::Low => self.income_low,
            StabilityTier::Medium => self.income_medium,
            StabilityTier::High => self.income_high,
        }
    }
}

impl Default for HouseholdTemplates {
    fn default() -> Self {
        Self {
            income_low: (2800.0, 3800.0),
            income_medium: (4200.0, 6000.0),
            income_high: (6500.0, 9500.0),
            base_housing: 1450.0,
            base_utilities: 240.0,
            dependent_cost_share: 0.12,
            starting_cash_months: (0.5, 2.0),
            debts: vec![
                DebtTemplate {
                    label: "Credit card".to_string(),
                    balance_range: (1500.0, 9000.0),
                    rate_range: (0.18, 0.27),
                    minimum_share: 0.03,
                },
                DebtTemplate {
                    label: "Auto loan".to_string(),
                    balance_range: (6000.0, 22000.0),
                    rate_range: (0.05, 0.11),
                    minimum_share: 0.025,
                },
                DebtTemplate {
                    label: "Student loan".to_string(),
                    balance_range: (8000.0, 40000.0),
                    rate_range: (0.04, 0.07),
                    minimum_share: 0.012,
                },
                DebtTemplate {
                    label: "Personal loan".to_string(),
                    balance_range: (2000.0, 12000.0),
                    rate_range: (0.09, 0.16),
                    minimum_share: 0.04,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub climates: Vec<MarketClimate>,
    pub risk_profiles: Vec<RiskProfile>,
    pub events: Vec<LifeEvent>,
    pub expense_items: Vec<ExpenseItem>,
    pub locations: LocationMultipliers,
    pub households: HouseholdTemplates,
}

impl Catalog {
    /// Parse a catalog from JSON. Missing sections fall back to the built-in
    /// tables.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Structural checks: unique keys per table, sane price ranges.
    pub fn check(&self) -> Result<(), CatalogError> {
        unique_keys("climate", self.climates.iter().map(|c| c.key.as_str()))?;
        unique_keys("risk profile", self.risk_profiles.iter().map(|r| r.key.as_str()))?;
        unique_keys("event", self.events.iter().map(|e| e.key.as_str()))?;
        unique_keys("expense item", self.expense_items.iter().map(|i| i.key.as_str()))?;
        for item in &self.expense_items {
            if item.min_price > item.max_price {
                return Err(CatalogError::InvertedRange {
                    key: item.key.clone(),
                    min: item.min_price,
                    max: item.max_price,
                });
            }
        }
        Ok(())
    }

    pub fn find_climate(&self, key: &str) -> Option<&MarketClimate> {
        self.climates.iter().find(|c| c.key == key)
    }

    pub fn find_risk(&self, key: &str) -> Option<&RiskProfile> {
        self.risk_profiles.iter().find(|r| r.key == key)
    }

    pub fn find_event(&self, key: &str) -> Option<&LifeEvent> {
        self.events.iter().find(|e| e.key == key)
    }

    pub fn find_item(&self, key: &str) -> Option<&ExpenseItem> {
        self.expense_items.iter().find(|i| i.key == key)
    }

    /// Base monthly return for `key`, falling back to the neutral climate.
    pub fn climate_return(&self, key: &str) -> f64 {
        if let Some(c) = self.find_climate(key) {
            return c.base_return;
        }
        debug!(key, fallback = FALLBACK_CLIMATE, "unknown market climate");
        self.find_climate(FALLBACK_CLIMATE).map(|c| c.base_return).unwrap_or(0.0)
    }

    /// Return multiplier for `key`, falling back to the moderate profile.
    pub fn risk_multiplier(&self, key: &str) -> f64 {
        if let Some(r) = self.find_risk(key) {
            return r.multiplier;
        }
        debug!(key, fallback = FALLBACK_RISK, "unknown risk profile");
        self.find_risk(FALLBACK_RISK).map(|r| r.multiplier).unwrap_or(1.0)
    }

    pub fn location_multiplier(&self, tier: LocationTier) -> f64 {
        self.locations.for_tier(tier)
    }
}

fn unique_keys<'a>(
    kind: &'static str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CatalogError::DuplicateKey { kind, key: key.to_string() });
        }
    }
    Ok(())
}

fn climate(key: &str, label: &str, base_return: f64) -> MarketClimate {
    MarketClimate { key: key.to_string(), label: label.to_string(), base_return }
}

fn risk(key: &str, label: &str, multiplier: f64) -> RiskProfile {
    RiskProfile { key: key.to_string(), label: label.to_string(), multiplier }
}

fn event(key: &str, label: &str, impact: EventImpact) -> LifeEvent {
    LifeEvent { key: key.to_string(), label: label.to_string(), impact }
}

fn item(key: &str, label: &str, min: f64, max: f64, base: u32, per_dependent: u32) -> ExpenseItem {
    ExpenseItem {
        key: key.to_string(),
        label: label.to_string(),
        min_price: min,
        max_price: max,
        base_quantity: base,
        per_dependent,
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            climates: vec![
                climate("bull", "Bull market", 0.012),
                climate("neutral", "Stable market", 0.004),
                climate("bear", "Bear market", -0.009),
                climate("volatile", "Choppy market", 0.001),
            ],
            risk_profiles: vec![
                risk("conservative", "Conservative", 0.5),
                risk("moderate", "Moderate", 1.0),
                risk("aggressive", "Aggressive", 1.6),
            ],
            events: vec![
                event("medical_bill", "Unexpected medical bill", EventImpact {
                    cash_delta: Some(-1200.0),
                    stress_delta: Some(8.0),
                    ..Default::default()
                }),
                event("car_repair", "Car repair", EventImpact {
                    cash_delta: Some(-850.0),
                    stress_delta: Some(5.0),
                    ..Default::default()
                }),
                event("bonus", "Work bonus", EventImpact {
                    cash_delta: Some(1500.0),
                    stress_delta: Some(-6.0),
                    ..Default::default()
                }),
                event("hours_cut", "Reduced hours", EventImpact {
                    income_multiplier: Some(0.7),
                    stress_delta: Some(10.0),
                    ..Default::default()
                }),
                event("rent_hike", "Rent increase", EventImpact {
                    fixed_cost_delta: Some(180.0),
                    stress_delta: Some(4.0),
                    ..Default::default()
                }),
                event("inflation_spike", "Grocery inflation", EventImpact {
                    expense_multiplier: Some(1.08),
                    stress_delta: Some(3.0),
                    ..Default::default()
                }),
                event("market_crash", "Market sell-off", EventImpact {
                    market_shock: Some(-0.08),
                    stress_delta: Some(6.0),
                    ..Default::default()
                }),
                event("market_rally", "Market rally", EventImpact {
                    market_shock: Some(0.05),
                    ..Default::default()
                }),
                event("tax_refund", "Tax refund", EventImpact {
                    cash_delta: Some(900.0),
                    stress_delta: Some(-3.0),
                    ..Default::default()
                }),
            ],
            expense_items: vec![
                item("groceries", "Groceries", 320.0, 520.0, 1, 1),
                item("transport", "Transport pass / fuel", 90.0, 240.0, 1, 0),
                item("phone", "Phone plan", 25.0, 85.0, 1, 0),
                item("internet", "Internet", 40.0, 90.0, 1, 0),
                item("insurance", "Health insurance", 180.0, 420.0, 1, 1),
                item("childcare", "Childcare", 400.0, 1100.0, 0, 1),
                item("streaming", "Streaming subscription", 8.0, 22.0, 1, 0),
                item("dining", "Dining out", 60.0, 260.0, 1, 0),
                item("gym", "Gym membership", 15.0, 70.0, 0, 0),
            ],
            locations: LocationMultipliers::default(),
            households: HouseholdTemplates::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
