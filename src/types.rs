// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Type Definitions

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

// ─── Tiers ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StabilityTier {
    Low,
    Medium,
    High,
}

impl Default for StabilityTier {
    fn default() -> Self { StabilityTier::Medium }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LocationTier {
    Low,
    Mid,
    High,
}

impl Default for LocationTier {
    fn default() -> Self { LocationTier::Mid }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Low,
    Typical,
    High,
}

impl Default for PriceTier {
    fn default() -> Self { PriceTier::Typical }
}

impl PriceTier {
    /// Resolve a unit price from a catalog `(min, max)` range.
    pub fn unit_price(&self, min: f64, max: f64) -> f64 {
        match self {
            Self::Low => min,
            Self::Typical => (min + max) / 2.0,
            Self::High => max,
        }
    }
}

// ─── Debt ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub label: String,
    pub balance: f64,
    /// Annual rate as a fraction (0.12 = 12% APR).
    pub annual_rate: f64,
    pub minimum_due: f64,
}

impl Debt {
    pub fn new(label: impl Into<String>, balance: f64, annual_rate: f64, minimum_due: f64) -> Self {
        Self {
            label: label.into(),
            balance,
            annual_rate,
            minimum_due,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }
}

pub fn total_debt(debts: &[Debt]) -> f64 {
    debts.iter().map(|d| d.balance).sum()
}

// ─── LifeStage ───────────────────────────────────────────────────────────────

/// Structural profile of one household "life". Never touched by a cycle;
/// replaced wholesale on regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeStage {
    pub id: u64,
    pub age: u32,
    pub stability: StabilityTier,
    pub location: LocationTier,
    pub dependents: u32,
    pub monthly_income: f64,
    /// Housing cost, already scaled by the location multiplier.
    pub housing: f64,
    /// Utilities cost, already scaled by the location multiplier.
    pub utilities: f64,
    pub starting_cash: f64,
    #[serde(default)]
    pub debts: Vec<Debt>,
}

impl LifeStage {
    pub fn fixed_costs(&self) -> f64 {
        self.housing + self.utilities
    }

    pub fn household_size(&self) -> u32 {
        1 + self.dependents
    }
}

// ─── ExpensePlan ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanEntry {
    pub quantity: u32,
    #[serde(default)]
    pub tier: PriceTier,
}

/// Owned quantity and price tier per catalog item key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExpensePlan {
    pub items: BTreeMap<String, PlanEntry>,
}

impl ExpensePlan {
    pub fn set(&mut self, key: impl Into<String>, quantity: u32, tier: PriceTier) {
        self.items.insert(key.into(), PlanEntry { quantity, tier });
    }

    pub fn get(&self, key: &str) -> Option<&PlanEntry> {
        self.items.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub key: String,
    pub label: String,
    pub quantity: u32,
    pub tier: PriceTier,
    pub unit_price: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExpenseBreakdown {
    pub lines: Vec<ExpenseLine>,
    pub variable_total: f64,
    pub fixed_total: f64,
    pub total: f64,
}

// ─── Decision ────────────────────────────────────────────────────────────────

/// User allocation for one cycle. Amounts are expected to be non-negative;
/// the engine does not re-check them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub market_climate: String,
    pub risk_profile: String,
    pub debt_payment: f64,
    pub investment: f64,
    pub emergency_cash: f64,
}

impl Default for Decision {
    fn default() -> Self {
        Self {
            market_climate: "neutral".to_string(),
            risk_profile: "moderate".to_string(),
            debt_payment: 0.0,
            investment: 0.0,
            emergency_cash: 0.0,
        }
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub month: u32,
    pub net_worth: f64,
    pub cash_on_hand: f64,
    pub savings: f64,
    pub investments: f64,
    pub debt_balance: f64,
    pub stress_level: u32,
    pub credit_score: u32,
    pub expenses: f64,
    pub income: f64,
    pub market_return: f64,
    pub event_label: String,
    pub event_key: Option<String>,
}

// ─── SimulationState ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimulationState {
    pub month: u32,
    pub cash_on_hand: f64,
    pub savings: f64,
    pub investments: f64,
    /// Cached sum of `debts[*].balance`.
    pub debt_balance: f64,
    pub debts: Vec<Debt>,
    pub stress_level: u32,
    pub credit_score: u32,
    #[serde(default)]
    pub history: VecDeque<Snapshot>,
    /// Event fired by the previous cycle. Kept apart from `history` so the
    /// no-repeat rule holds whatever the history cap.
    #[serde(default)]
    pub last_event_key: Option<String>,
}

impl SimulationState {
    /// Key of the event fired by the most recent cycle, if any.
    pub fn last_event_key(&self) -> Option<&str> {
        self.last_event_key.as_deref()
    }

    pub fn net_worth(&self) -> f64 {
        self.cash_on_hand + self.savings + self.investments - self.debt_balance
    }

    /// Recompute the cached aggregate after the debt list changed.
    pub fn sync_debt_balance(&mut self) {
        self.debt_balance = total_debt(&self.debts);
    }
}

// ─── ForecastPoint ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: u32,
    pub net_worth: f64,
    pub debt_balance: f64,
    pub investments: f64,
}
