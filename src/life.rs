// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Life Generation

use std::collections::VecDeque;

use rand::Rng;
use tracing::info;

use crate::catalog::{Catalog, DebtTemplate};
use crate::config::EngineConfig;
use crate::types::*;

const STABILITY_TIERS: [StabilityTier; 3] = [StabilityTier::Low, StabilityTier::Medium, StabilityTier::High];
const LOCATION_TIERS: [LocationTier; 3] = [LocationTier::Low, LocationTier::Mid, LocationTier::High];
const MAX_DEPENDENTS: u32 = 3;
const MAX_STARTING_DEBTS: usize = 3;
const MIN_PAYMENT_FLOOR: f64 = 25.0;

/// Draw a fresh household profile from the catalog's templates.
pub fn generate_life_stage<R: Rng + ?Sized>(catalog: &Catalog, id: u64, rng: &mut R) -> LifeStage {
    let t = &catalog.households;
    let age = rng.gen_range(22..=60);
    let stability = STABILITY_TIERS[rng.gen_range(0..STABILITY_TIERS.len())];
    let location = LOCATION_TIERS[rng.gen_range(0..LOCATION_TIERS.len())];
    let dependents = rng.gen_range(0..=MAX_DEPENDENTS);

    let monthly_income = round_to(uniform(rng, t.income_range(stability)), 10.0);
    let multiplier = catalog.location_multiplier(location);
    let household = 1.0 + dependents as f64 * t.dependent_cost_share;
    let housing = (t.base_housing * multiplier * household).round();
    let utilities = (t.base_utilities * multiplier * household).round();
    let starting_cash = round_to(monthly_income * uniform(rng, t.starting_cash_months), 10.0);

    let debts = draw_debts(&t.debts, rng);

    info!(
        id,
        age,
        ?stability,
        ?location,
        dependents,
        monthly_income,
        debts = debts.len(),
        "generated life stage"
    );

    LifeStage {
        id,
        age,
        stability,
        location,
        dependents,
        monthly_income,
        housing,
        utilities,
        starting_cash,
        debts,
    }
}

/// Starting consumption plan: each item's base quantity plus its
/// per-dependent extra, all at the typical price tier.
pub fn derive_expense_plan(catalog: &Catalog, life: &LifeStage) -> ExpensePlan {
    let mut plan = ExpensePlan::default();
    for item in &catalog.expense_items {
        let quantity = item.base_quantity + item.per_dependent * life.dependents;
        plan.set(item.key.clone(), quantity, PriceTier::Typical);
    }
    plan
}

impl SimulationState {
    /// Month-one state for a freshly generated life.
    pub fn new(life: &LifeStage, config: &EngineConfig) -> Self {
        let mut state = Self {
            month: 1,
            cash_on_hand: life.starting_cash,
            savings: 0.0,
            investments: 0.0,
            debt_balance: 0.0,
            debts: life.debts.clone(),
            stress_level: config.initial_stress.clamp(config.stress.min, config.stress.max),
            credit_score: config.initial_credit_score.clamp(config.credit.min, config.credit.max),
            history: VecDeque::with_capacity(config.history_cap),
            last_event_key: None,
        };
        state.sync_debt_balance();
        state
    }
}

fn draw_debts<R: Rng + ?Sized>(templates: &[DebtTemplate], rng: &mut R) -> Vec<Debt> {
    let count = rng.gen_range(0..=MAX_STARTING_DEBTS.min(templates.len()));
    // Partial Fisher-Yates over template indices so no template repeats.
    let mut order: Vec<usize> = (0..templates.len()).collect();
    for i in 0..count {
        let j = rng.gen_range(i..order.len());
        order.swap(i, j);
    }

    let mut debts: Vec<Debt> = order[..count]
        .iter()
        .map(|&idx| {
            let tpl = &templates[idx];
            let balance = round_to(uniform(rng, tpl.balance_range), 10.0);
            let rate = (uniform(rng, tpl.rate_range) * 10_000.0).round() / 10_000.0;
            let minimum = (balance * tpl.minimum_share).max(MIN_PAYMENT_FLOOR).round();
            Debt::new(tpl.label.clone(), balance, rate, minimum)
        })
        .collect();
    debts.sort_by(|a, b| a.annual_rate.total_cmp(&b.annual_rate));
    debts
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn round_to(v: f64, step: f64) -> f64 {
    (v / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generated_lives_respect_templates() {
        let catalog = Catalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for id in 0..200 {
            let life = generate_life_stage(&catalog, id, &mut rng);
            let (lo, hi) = catalog.households.income_range(life.stability);
            assert!(life.monthly_income >= lo - 10.0 && life.monthly_income <= hi + 10.0);
            assert!((22..=60).contains(&life.age));
            assert!(life.dependents <= MAX_DEPENDENTS);
            assert!(life.debts.len() <= MAX_STARTING_DEBTS);
            assert!(life.housing > 0.0 && life.utilities > 0.0);
            for d in &life.debts {
                assert!(d.balance > 0.0);
                assert!(d.minimum_due >= MIN_PAYMENT_FLOOR);
            }
            let mut labels: Vec<&str> = life.debts.iter().map(|d| d.label.as_str()).collect();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), life.debts.len());
        }
    }

    #[test]
    fn same_seed_same_life() {
        let catalog = Catalog::default();
        let a = generate_life_stage(&catalog, 1, &mut ChaCha8Rng::seed_from_u64(8));
        let b = generate_life_stage(&catalog, 1, &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(a, b);
    }

    #[test]
    fn plan_scales_with_dependents() {
        let catalog = Catalog::default();
        let mut life = generate_life_stage(&catalog, 1, &mut ChaCha8Rng::seed_from_u64(2));
        life.dependents = 2;
        let plan = derive_expense_plan(&catalog, &life);
        assert_eq!(plan.get("groceries").unwrap().quantity, 3);
        assert_eq!(plan.get("childcare").unwrap().quantity, 2);
        assert_eq!(plan.get("phone").unwrap().quantity, 1);
        assert_eq!(plan.get("gym").unwrap().quantity, 0);
    }

    #[test]
    fn initial_state_mirrors_life() {
        let catalog = Catalog::default();
        let config = EngineConfig::default();
        let mut life = generate_life_stage(&catalog, 3, &mut ChaCha8Rng::seed_from_u64(5));
        life.debts = vec![Debt::new("A", 1000.0, 0.1, 30.0), Debt::new("B", 2500.0, 0.2, 60.0)];
        let state = SimulationState::new(&life, &config);
        assert_eq!(state.month, 1);
        assert_eq!(state.cash_on_hand, life.starting_cash);
        assert_eq!(state.debt_balance, 3500.0);
        assert_eq!(state.credit_score, 680);
        assert!(state.history.is_empty());
    }
}
