// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Simulation Core

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::engine::Engine;
use crate::life::{derive_expense_plan, generate_life_stage};
use crate::types::*;

// ─── CycleReport ─────────────────────────────────────────────────────────────

/// What the presentation layer needs after one "run a cycle" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub snapshot: Snapshot,
    pub missed_payment: bool,
    pub interest_accrued: f64,
    pub total_paid: f64,
    pub credit_delta: i32,
    pub debt_free: bool,
}

// ─── HouseholdSimulation struct ──────────────────────────────────────────────

/// One household timeline: a life stage, its expense plan, the live state
/// and the seeded random stream that drives it.
#[wasm_bindgen]
pub struct HouseholdSimulation {
    pub(crate) engine: Engine,
    pub(crate) life: LifeStage,
    pub(crate) plan: ExpensePlan,
    pub(crate) state: SimulationState,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) seed: u64,
    pub(crate) lives_generated: u64,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl HouseholdSimulation {
    /// Build a timeline on `engine`, generating the first life from `seed`.
    pub fn with_engine(engine: Engine, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let life = generate_life_stage(engine.catalog(), 0, &mut rng);
        let plan = derive_expense_plan(engine.catalog(), &life);
        let state = SimulationState::new(&life, engine.config());
        Self {
            engine,
            life,
            plan,
            state,
            rng,
            seed,
            lives_generated: 1,
        }
    }

    /// Build a timeline from caller-supplied parts.
    pub fn from_parts(
        engine: Engine,
        life: LifeStage,
        plan: ExpensePlan,
        state: SimulationState,
        seed: u64,
    ) -> Self {
        Self {
            engine,
            life,
            plan,
            state,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            lives_generated: 1,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn life(&self) -> &LifeStage {
        &self.life
    }

    pub fn plan(&self) -> &ExpensePlan {
        &self.plan
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn breakdown(&self) -> ExpenseBreakdown {
        self.engine.resolve_expenses(&self.life, &self.plan)
    }

    pub fn set_plan_entry(&mut self, key: &str, quantity: u32, tier: PriceTier) {
        self.plan.set(key, quantity, tier);
    }

    /// Replace the life stage with a newly generated one and restart the
    /// timeline at month one.
    pub fn regenerate_life_core(&mut self) {
        let id = self.lives_generated;
        self.lives_generated += 1;
        self.life = generate_life_stage(self.engine.catalog(), id, &mut self.rng);
        self.plan = derive_expense_plan(self.engine.catalog(), &self.life);
        self.state = SimulationState::new(&self.life, self.engine.config());
        info!(id, "life regenerated");
    }

    pub fn run_cycle_core(&mut self, decision: &Decision) -> CycleReport {
        let breakdown = self.breakdown();
        let current = std::mem::take(&mut self.state);
        let outcome = self
            .engine
            .step(&self.life, decision, &breakdown, current, &mut self.rng);
        self.state = outcome.state;
        CycleReport {
            debt_free: self.state.debts.iter().all(Debt::is_paid_off),
            snapshot: outcome.snapshot,
            missed_payment: outcome.ledger.missed,
            interest_accrued: outcome.ledger.interest_accrued,
            total_paid: outcome.ledger.total_paid,
            credit_delta: outcome.credit_delta,
        }
    }

    /// Run `cycles` cycles with the same decision, returning every report.
    pub fn run_cycles_core(&mut self, decision: &Decision, cycles: u32) -> Vec<CycleReport> {
        (0..cycles).map(|_| self.run_cycle_core(decision)).collect()
    }

    /// Forecast from the live state. Uses a copy of the random stream so the
    /// real timeline's draws are unaffected.
    pub fn forecast_core(&self, decision: &Decision, periods: u32) -> Vec<ForecastPoint> {
        let mut rng = self.rng.clone();
        let breakdown = self.breakdown();
        self.engine
            .project(&self.life, decision, &breakdown, &self.state, periods, &mut rng)
    }

    /// Restart the current life at month one with the original seed.
    pub fn reset_core(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.state = SimulationState::new(&self.life, self.engine.config());
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::EngineConfig;

    fn sim(seed: u64) -> HouseholdSimulation {
        HouseholdSimulation::with_engine(Engine::default(), seed)
    }

    #[test]
    fn forecast_does_not_disturb_live_stream() {
        let decision = Decision { investment: 200.0, ..Decision::default() };
        let mut a = sim(42);
        let mut b = sim(42);
        let _ = a.forecast_core(&decision, 24);
        let ra = a.run_cycle_core(&decision);
        let rb = b.run_cycle_core(&decision);
        assert_eq!(ra, rb);
    }

    #[test]
    fn forecast_matches_actual_run() {
        let decision = Decision { debt_payment: 300.0, ..Decision::default() };
        let mut s = sim(9);
        let forecast = s.forecast_core(&decision, 6);
        let actual = s.run_cycles_core(&decision, 6);
        for (f, a) in forecast.iter().zip(&actual) {
            assert_eq!(f.month, a.snapshot.month);
            assert_eq!(f.net_worth, a.snapshot.net_worth);
        }
    }

    #[test]
    fn regenerate_restarts_timeline() {
        let mut s = sim(1);
        s.run_cycles_core(&Decision::default(), 5);
        assert_eq!(s.state().month, 6);
        s.regenerate_life_core();
        assert_eq!(s.state().month, 1);
        assert_eq!(s.life().id, 1);
        assert!(s.state().history.is_empty());
    }

    #[test]
    fn reset_replays_same_draws() {
        let decision = Decision::default();
        let life = sim(5).life().clone();
        let engine = Engine::new(Catalog::default(), EngineConfig::default());
        let plan = derive_expense_plan(engine.catalog(), &life);
        let state = SimulationState::new(&life, engine.config());
        let mut s = HouseholdSimulation::from_parts(engine, life, plan, state, 77);
        let first = s.run_cycles_core(&decision, 4);
        s.reset_core();
        let second = s.run_cycles_core(&decision, 4);
        assert_eq!(first, second);
    }

    #[test]
    fn consecutive_cycles_carry_state_forward() {
        let decision = Decision { debt_payment: 250.0, investment: 100.0, ..Decision::default() };
        let mut s = sim(12);
        let first = s.run_cycle_core(&decision);
        assert_eq!(s.state().month, 2);
        assert_eq!(s.state().cash_on_hand, first.snapshot.cash_on_hand);
        assert_eq!(s.state().debt_balance, first.snapshot.debt_balance);
        let second = s.run_cycle_core(&decision);
        assert_eq!(second.snapshot.month, 2);
        assert_eq!(s.state().history.len(), 2);
        assert_eq!(s.state().debts.len(), s.life().debts.len());
    }

    #[test]
    fn plan_edits_change_breakdown() {
        let mut s = sim(3);
        let before = s.breakdown().total;
        s.set_plan_entry("gym", 2, PriceTier::High);
        let after = s.breakdown().total;
        assert!(after > before);
    }
}
