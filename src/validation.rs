// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Input Validation
//
// The engine itself accepts anything: unknown keys resolve to neutral
// defaults and amounts are taken as given. These checks sit in front of it
// for callers that want bad input rejected instead.

use std::str::FromStr;

use crate::catalog::Catalog;
use crate::types::{Debt, Decision, ExpensePlan, LifeStage, PriceTier};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown market climate `{0}`")]
    UnknownClimate(String),

    #[error("unknown risk profile `{0}`")]
    UnknownRisk(String),

    #[error("unknown expense item `{0}`")]
    UnknownItem(String),

    #[error("unknown price tier `{0}`")]
    UnknownTier(String),

    #[error("{field} must be a finite, non-negative amount (got {value})")]
    InvalidAmount { field: &'static str, value: f64 },
}

impl FromStr for PriceTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(PriceTier::Low),
            "typical" => Ok(PriceTier::Typical),
            "high" => Ok(PriceTier::High),
            _ => Err(ValidationError::UnknownTier(s.to_string())),
        }
    }
}

fn amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount { field, value })
    }
}

/// Decision amounts only. Catalog keys are left to the engine's fallbacks.
pub fn validate_amounts(decision: &Decision) -> Result<(), ValidationError> {
    amount("debt_payment", decision.debt_payment)?;
    amount("investment", decision.investment)?;
    amount("emergency_cash", decision.emergency_cash)?;
    Ok(())
}

/// Amounts plus catalog keys.
pub fn validate_decision(catalog: &Catalog, decision: &Decision) -> Result<(), ValidationError> {
    validate_amounts(decision)?;
    if catalog.find_climate(&decision.market_climate).is_none() {
        return Err(ValidationError::UnknownClimate(decision.market_climate.clone()));
    }
    if catalog.find_risk(&decision.risk_profile).is_none() {
        return Err(ValidationError::UnknownRisk(decision.risk_profile.clone()));
    }
    Ok(())
}

pub fn validate_plan(catalog: &Catalog, plan: &ExpensePlan) -> Result<(), ValidationError> {
    for key in plan.items.keys() {
        if catalog.find_item(key).is_none() {
            return Err(ValidationError::UnknownItem(key.clone()));
        }
    }
    Ok(())
}

pub fn validate_debts(debts: &[Debt]) -> Result<(), ValidationError> {
    for d in debts {
        amount("balance", d.balance)?;
        amount("annual_rate", d.annual_rate)?;
        amount("minimum_due", d.minimum_due)?;
    }
    Ok(())
}

pub fn validate_life_stage(life: &LifeStage) -> Result<(), ValidationError> {
    amount("monthly_income", life.monthly_income)?;
    amount("housing", life.housing)?;
    amount("utilities", life.utilities)?;
    amount("starting_cash", life.starting_cash)?;
    validate_debts(&life.debts)
}
