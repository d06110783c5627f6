// Copyright © 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Tunable engine parameters.
//!
//! Everything here is plain data injected into [`crate::Engine`]. Nothing in
//! the engine reads a global; two simulations with different configs never
//! interfere.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("engine config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{rules} bounds are inverted ({min} > {max})")]
    InvertedBounds { rules: &'static str, min: u32, max: u32 },
}

// ---------------------------------------------------------------------------
// RepaymentStrategy
// ---------------------------------------------------------------------------

/// How a cycle's debt payment is spread over several debts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentStrategy {
    /// Highest-rate debt absorbs the whole payment (up to its balance)
    /// before the next debt sees anything. Lower-rate debts can go unpaid for
    /// many cycles.
    Avalanche,
    /// Cover every debt's minimum first (highest rate first), then send the
    /// surplus down the avalanche order.
    MinimumsFirst,
}

impl Default for RepaymentStrategy {
    fn default() -> Self { RepaymentStrategy::Avalanche }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Snapshots retained in `SimulationState::history`.
    pub history_cap: usize,
    /// Per-cycle chance that a life event fires.
    pub event_probability: f64,
    /// Half-width of the uniform market noise band (0.006 = ±0.6pp).
    pub market_noise: f64,
    /// Paying less than this share of total minimums counts as a miss.
    pub missed_payment_ratio: f64,
    /// Implied credit limit as a multiple of outstanding debt.
    pub credit_limit_factor: f64,
    pub repayment_strategy: RepaymentStrategy,
    pub credit: CreditRules,
    pub stress: StressRules,
    pub initial_credit_score: u32,
    pub initial_stress: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_cap: 72,
            event_probability: 0.2,
            market_noise: 0.006,
            missed_payment_ratio: 0.9,
            credit_limit_factor: 1.4,
            repayment_strategy: RepaymentStrategy::default(),
            credit: CreditRules::default(),
            stress: StressRules::default(),
            initial_credit_score: 680,
            initial_stress: 40,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Score bounds must be ordered; the engine clamps into them.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.credit.min > self.credit.max {
            return Err(ConfigError::InvertedBounds {
                rules: "credit",
                min: self.credit.min,
                max: self.credit.max,
            });
        }
        if self.stress.min > self.stress.max {
            return Err(ConfigError::InvertedBounds {
                rules: "stress",
                min: self.stress.min,
                max: self.stress.max,
            });
        }
        Ok(())
    }

    /// Config with market noise and life events switched off, so a cycle is
    /// fully determined by its inputs.
    pub fn deterministic() -> Self {
        Self {
            event_probability: 0.0,
            market_noise: 0.0,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// CreditRules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditRules {
    pub min: u32,
    pub max: u32,
    pub missed_penalty: i32,
    pub high_utilization: f64,
    pub high_utilization_delta: i32,
    pub low_utilization: f64,
    pub low_utilization_delta: i32,
    pub steady_delta: i32,
}

impl Default for CreditRules {
    fn default() -> Self {
        Self {
            min: 420,
            max: 850,
            missed_penalty: -20,
            high_utilization: 0.6,
            high_utilization_delta: -6,
            low_utilization: 0.3,
            low_utilization_delta: 6,
            steady_delta: 2,
        }
    }
}

impl CreditRules {
    /// Score movement for one cycle.
    pub fn delta(&self, missed: bool, utilization: f64) -> i32 {
        if missed {
            self.missed_penalty
        } else if utilization > self.high_utilization {
            self.high_utilization_delta
        } else if utilization < self.low_utilization {
            self.low_utilization_delta
        } else {
            self.steady_delta
        }
    }

    pub fn apply(&self, score: u32, delta: i32) -> u32 {
        (score as i64 + delta as i64).clamp(self.min as i64, self.max as i64) as u32
    }
}

// ---------------------------------------------------------------------------
// StressRules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressRules {
    pub min: u32,
    pub max: u32,
    pub baseline: f64,
    /// Relief per month of expenses held as cash.
    pub cash_cushion_weight: f64,
    /// Debt amount that adds `debt_weight` points.
    pub debt_scale: f64,
    pub debt_weight: f64,
}

impl Default for StressRules {
    fn default() -> Self {
        Self {
            min: 5,
            max: 95,
            baseline: 62.0,
            cash_cushion_weight: 18.0,
            debt_scale: 25_000.0,
            debt_weight: 28.0,
        }
    }
}

impl StressRules {
    pub fn level(&self, cash: f64, expenses: f64, total_debt: f64, event_delta: f64) -> u32 {
        let raw = self.baseline - (cash / expenses.max(1.0)) * self.cash_cushion_weight
            + (total_debt / self.debt_scale) * self.debt_weight
            + event_delta;
        let rounded = raw.round();
        if rounded.is_nan() {
            return self.max;
        }
        rounded.clamp(self.min as f64, self.max as f64) as u32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
