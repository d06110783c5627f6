// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Cycle Engine

pub mod types;
pub mod catalog;
pub mod config;
pub mod expenses;
pub mod sampler;
pub mod engine;
pub mod projection;
pub mod life;
pub mod validation;
pub mod simulation;

// Decimal arithmetic for the debt waterfall
pub mod adapter;
pub mod ledger;

pub use types::*;
pub use catalog::{Catalog, CatalogError, EventImpact, LifeEvent};
pub use config::{ConfigError, EngineConfig, RepaymentStrategy};
pub use engine::{CycleOutcome, Engine};
pub use expenses::resolve_expenses;
pub use ledger::{DebtLedger, LedgerOutcome};
pub use projection::Projection;
pub use sampler::{sample_cycle, CycleDraw, QUIET_MONTH};
pub use simulation::{CycleReport, HouseholdSimulation};
pub use validation::ValidationError;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Maps (the plan's item table) become plain JS objects, not `Map`s.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl HouseholdSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        HouseholdSimulation::with_engine(Engine::default(), seed)
    }

    /// Build with a substitute catalog and/or config, both given as JSON.
    /// Empty strings keep the built-in defaults.
    pub fn with_config(seed: u64, catalog_json: &str, config_json: &str) -> Result<HouseholdSimulation, JsValue> {
        let catalog = if catalog_json.trim().is_empty() {
            Catalog::default()
        } else {
            Catalog::from_json(catalog_json).map_err(js_err)?
        };
        let config = if config_json.trim().is_empty() {
            EngineConfig::default()
        } else {
            EngineConfig::from_json(config_json).map_err(js_err)?
        };
        Ok(HouseholdSimulation::with_engine(Engine::new(catalog, config), seed))
    }

    /// Run one cycle. Negative or non-finite amounts are rejected; unknown
    /// climate/risk keys fall back to neutral/moderate.
    pub fn run_cycle(&mut self, decision: JsValue) -> Result<JsValue, JsValue> {
        let decision: Decision = from_js(decision)?;
        validation::validate_amounts(&decision).map_err(js_err)?;
        let report = self.run_cycle_core(&decision);
        Ok(to_js(&report))
    }

    pub fn forecast(&self, decision: JsValue, periods: u32) -> Result<JsValue, JsValue> {
        let decision: Decision = from_js(decision)?;
        validation::validate_amounts(&decision).map_err(js_err)?;
        Ok(to_js(&self.forecast_core(&decision, periods)))
    }

    pub fn set_plan_item(&mut self, key: &str, quantity: u32, tier: &str) -> Result<(), JsValue> {
        let tier: PriceTier = tier.parse().map_err(js_err)?;
        if self.engine.catalog().find_item(key).is_none() {
            return Err(js_err(ValidationError::UnknownItem(key.to_string())));
        }
        self.set_plan_entry(key, quantity, tier);
        Ok(())
    }

    pub fn regenerate_life(&mut self) {
        self.regenerate_life_core();
    }

    pub fn reset(&mut self) {
        self.reset_core();
    }

    pub fn get_state(&self) -> JsValue {
        to_js(&self.state)
    }

    pub fn get_life_stage(&self) -> JsValue {
        to_js(&self.life)
    }

    pub fn get_plan(&self) -> JsValue {
        to_js(&self.plan)
    }

    pub fn get_breakdown(&self) -> JsValue {
        to_js(&self.breakdown())
    }

    pub fn get_catalog(&self) -> JsValue {
        to_js(self.engine.catalog())
    }

    pub fn get_month(&self) -> u32 {
        self.state.month
    }

    pub fn get_net_worth(&self) -> f64 {
        self.state.net_worth()
    }
}

// ─── WASM Tests ──────────────────────────────────────────────────────────────
