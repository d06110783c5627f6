// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Cycle Engine

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::expenses;
use crate::ledger::{DebtLedger, LedgerOutcome};
use crate::projection::Projection;
use crate::sampler::{self, CycleDraw};
use crate::types::*;

// ─── CycleOutcome ────────────────────────────────────────────────────────────

/// Everything one transition produced. `state` is the next state; the other
/// fields expose intermediate results the state does not keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleOutcome {
    pub state: SimulationState,
    pub snapshot: Snapshot,
    pub draw: CycleDraw,
    pub ledger: LedgerOutcome,
    pub credit_delta: i32,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Immutable cycle engine: catalog, tuning and the debt ledger.
///
/// An `Engine` holds no per-household state, so one instance can drive any
/// number of independent timelines.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Catalog,
    config: EngineConfig,
    ledger: DebtLedger,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Catalog::default(), EngineConfig::default())
    }
}

impl Engine {
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        let ledger = DebtLedger::new(config.repayment_strategy, config.missed_payment_ratio);
        Self { catalog, config, ledger }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &DebtLedger {
        &self.ledger
    }

    pub fn resolve_expenses(&self, life: &LifeStage, plan: &ExpensePlan) -> ExpenseBreakdown {
        expenses::resolve_expenses(&self.catalog, life, plan)
    }

    /// Sample this cycle's market and life event for `state`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        decision: &Decision,
        state: &SimulationState,
        rng: &mut R,
    ) -> CycleDraw {
        sampler::sample_cycle(
            &self.catalog,
            &self.config,
            &decision.market_climate,
            &decision.risk_profile,
            state.last_event_key(),
            rng,
        )
    }

    /// Advance `state` by one cycle.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        life: &LifeStage,
        decision: &Decision,
        breakdown: &ExpenseBreakdown,
        state: SimulationState,
        rng: &mut R,
    ) -> SimulationState {
        self.step(life, decision, breakdown, state, rng).state
    }

    /// [`advance`](Self::advance), keeping the intermediate results.
    pub fn step<R: Rng + ?Sized>(
        &self,
        life: &LifeStage,
        decision: &Decision,
        breakdown: &ExpenseBreakdown,
        state: SimulationState,
        rng: &mut R,
    ) -> CycleOutcome {
        let draw = self.sample(decision, &state, rng);
        self.apply_draw(life, decision, breakdown, state, draw)
    }

    /// The deterministic half of a cycle: apply an already-sampled draw.
    ///
    /// Cash is debited the full `decision.debt_payment`, even when the ledger
    /// applies less (no open debts, or a payment above what is owed). The
    /// unapplied remainder leaves net worth. Pending product review alongside
    /// the avalanche waterfall.
    pub fn apply_draw(
        &self,
        life: &LifeStage,
        decision: &Decision,
        breakdown: &ExpenseBreakdown,
        mut state: SimulationState,
        draw: CycleDraw,
    ) -> CycleOutcome {
        let impact = draw.impact();
        let market_return = draw.market_return;

        let income = life.monthly_income * impact.income_multiplier();
        let expenses = breakdown.total * impact.expense_multiplier() + impact.fixed_cost_delta();
        let outflow = expenses + decision.debt_payment + decision.emergency_cash + decision.investment;
        let cash = state.cash_on_hand + income - outflow + impact.cash_delta();

        let ledger = self.ledger.apply_cycle(&state.debts, decision.debt_payment);

        let savings = state.savings + decision.emergency_cash;
        let investments = (state.investments + decision.investment) * (1.0 + market_return);

        state.debts = ledger.debts.clone();
        state.sync_debt_balance();
        let total_debt = state.debt_balance;
        let net_worth = cash + savings + investments - total_debt;

        let credit_limit = (total_debt * self.config.credit_limit_factor).max(1.0);
        let utilization = total_debt / credit_limit;
        let credit_delta = self.config.credit.delta(ledger.missed, utilization);
        let credit_score = self.config.credit.apply(state.credit_score, credit_delta);

        let stress_level = self
            .config
            .stress
            .level(cash, expenses, total_debt, impact.stress_delta());

        let snapshot = Snapshot {
            month: state.month,
            net_worth,
            cash_on_hand: cash,
            savings,
            investments,
            debt_balance: total_debt,
            stress_level,
            credit_score,
            expenses,
            income,
            market_return,
            event_label: draw.event_label().to_string(),
            event_key: draw.event_key().map(str::to_string),
        };

        debug!(
            month = state.month,
            net_worth,
            cash,
            debt = total_debt,
            market_return,
            event = snapshot.event_label.as_str(),
            missed = ledger.missed,
            "cycle complete"
        );

        state.history.push_back(snapshot.clone());
        while state.history.len() > self.config.history_cap {
            state.history.pop_front();
        }

        state.last_event_key = snapshot.event_key.clone();
        state.month += 1;
        state.cash_on_hand = cash;
        state.savings = savings;
        state.investments = investments;
        state.credit_score = credit_score;
        state.stress_level = stress_level;

        CycleOutcome {
            state,
            snapshot,
            draw,
            ledger,
            credit_delta,
        }
    }

    /// Forecast `periods` cycles from `start` with a fixed decision and
    /// expense breakdown. `start` is not modified.
    pub fn project<R: Rng + ?Sized>(
        &self,
        life: &LifeStage,
        decision: &Decision,
        breakdown: &ExpenseBreakdown,
        start: &SimulationState,
        periods: u32,
        rng: &mut R,
    ) -> Vec<ForecastPoint> {
        Projection::new(self, life, decision, breakdown, start, periods, rng).collect()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EventImpact;
    use crate::catalog::LifeEvent;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::VecDeque;

    fn life() -> LifeStage {
        LifeStage {
            id: 1,
            age: 34,
            stability: StabilityTier::Medium,
            location: LocationTier::Mid,
            dependents: 0,
            monthly_income: 5200.0,
            housing: 1800.0,
            utilities: 300.0,
            starting_cash: 4000.0,
            debts: vec![Debt::new("Card", 12000.0, 0.12, 480.0)],
        }
    }

    fn breakdown() -> ExpenseBreakdown {
        ExpenseBreakdown {
            lines: Vec::new(),
            variable_total: 0.0,
            fixed_total: 2100.0,
            total: 2100.0,
        }
    }

    fn state() -> SimulationState {
        SimulationState {
            month: 1,
            cash_on_hand: 4000.0,
            savings: 1000.0,
            investments: 2500.0,
            debt_balance: 12000.0,
            debts: vec![Debt::new("Card", 12000.0, 0.12, 480.0)],
            stress_level: 40,
            credit_score: 680,
            history: VecDeque::new(),
            last_event_key: None,
        }
    }

    fn decision() -> Decision {
        Decision {
            market_climate: "neutral".into(),
            risk_profile: "moderate".into(),
            debt_payment: 350.0,
            investment: 500.0,
            emergency_cash: 200.0,
        }
    }

    #[test]
    fn quiet_cycle_cash_flow() {
        let engine = Engine::default();
        let out = engine.apply_draw(&life(), &decision(), &breakdown(), state(), CycleDraw::quiet(0.004));
        // 4000 + 5200 - (2100 + 350 + 200 + 500)
        assert!((out.state.cash_on_hand - 6050.0).abs() < 1e-9);
        assert_eq!(out.state.savings, 1200.0);
        assert!((out.state.investments - 3000.0 * 1.004).abs() < 1e-9);
        assert!((out.state.debt_balance - 11770.0).abs() < 1e-9);
        assert_eq!(out.state.month, 2);
        assert_eq!(out.snapshot.month, 1);
    }

    #[test]
    fn event_impact_flows_through() {
        let engine = Engine::default();
        let event = LifeEvent {
            key: "combo".into(),
            label: "Combo".into(),
            impact: EventImpact {
                cash_delta: Some(-300.0),
                income_multiplier: Some(0.5),
                expense_multiplier: Some(2.0),
                fixed_cost_delta: Some(100.0),
                stress_delta: Some(10.0),
                market_shock: Some(-0.1),
            },
        };
        let out = engine.apply_draw(
            &life(),
            &decision(),
            &breakdown(),
            state(),
            CycleDraw::with_event(0.0, event),
        );
        assert_eq!(out.snapshot.income, 2600.0);
        assert_eq!(out.snapshot.expenses, 4300.0);
        // 4000 + 2600 - (4300 + 1050) - 300
        assert!((out.state.cash_on_hand - 950.0).abs() < 1e-9);
        assert!((out.state.investments - 3000.0 * 0.9).abs() < 1e-9);
        assert_eq!(out.snapshot.event_key.as_deref(), Some("combo"));
        assert_eq!(out.state.last_event_key(), Some("combo"));
        // 62 - (950 / 4300) * 18 + (11770 / 25000) * 28 + 10 = 81.2
        assert_eq!(out.snapshot.stress_level, 81);
        assert_eq!(out.state.stress_level, 81);
    }

    #[test]
    fn quiet_cycle_clears_last_event() {
        let engine = Engine::default();
        let mut s = state();
        s.last_event_key = Some("bonus".into());
        let out = engine.apply_draw(&life(), &decision(), &breakdown(), s, CycleDraw::quiet(0.0));
        assert_eq!(out.state.last_event_key(), None);
    }

    #[test]
    fn unapplied_debt_payment_still_leaves_cash() {
        let engine = Engine::default();
        let mut s = state();
        s.debts.clear();
        s.sync_debt_balance();
        let out = engine.apply_draw(&life(), &decision(), &breakdown(), s, CycleDraw::quiet(0.0));
        assert_eq!(out.ledger.total_paid, 0.0);
        // Full 350 is debited even though no debt absorbed it.
        assert!((out.state.cash_on_hand - 6050.0).abs() < 1e-9);
    }

    #[test]
    fn debt_balance_matches_debts() {
        let engine = Engine::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut s = state();
        for _ in 0..24 {
            s = engine.advance(&life(), &decision(), &breakdown(), s, &mut rng);
            let sum: f64 = s.debts.iter().map(|d| d.balance).sum();
            assert_eq!(s.debt_balance, sum);
        }
    }

    #[test]
    fn credit_rewards_low_utilization_without_debt() {
        let engine = Engine::default();
        let mut s = state();
        s.debts.clear();
        s.sync_debt_balance();
        let out = engine.apply_draw(&life(), &decision(), &breakdown(), s, CycleDraw::quiet(0.0));
        // utilization 0 / max(0, 1) = 0 -> +6
        assert_eq!(out.credit_delta, 6);
        assert_eq!(out.state.credit_score, 686);
    }

    #[test]
    fn missed_payment_hits_credit_floor() {
        let engine = Engine::default();
        let mut s = state();
        s.credit_score = 430;
        let d = Decision { debt_payment: 0.0, ..decision() };
        let out = engine.apply_draw(&life(), &d, &breakdown(), s, CycleDraw::quiet(0.0));
        assert!(out.ledger.missed);
        assert_eq!(out.credit_delta, -20);
        assert_eq!(out.state.credit_score, 420);
    }

    #[test]
    fn decision_leaves_life_stage_untouched() {
        let engine = Engine::default();
        let stage = life();
        let before = stage.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let _ = engine.advance(&stage, &decision(), &breakdown(), state(), &mut rng);
        assert_eq!(stage, before);
    }

    #[test]
    fn history_is_capped() {
        let config = EngineConfig { history_cap: 5, ..EngineConfig::default() };
        let engine = Engine::new(Catalog::default(), config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut s = state();
        for _ in 0..9 {
            s = engine.advance(&life(), &decision(), &breakdown(), s, &mut rng);
        }
        let months: Vec<u32> = s.history.iter().map(|h| h.month).collect();
        assert_eq!(months, vec![5, 6, 7, 8, 9]);
    }
}
