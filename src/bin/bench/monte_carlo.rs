// Monte Carlo Infrastructure: N runs per scenario with statistical aggregation
// Run i uses seed base+i for both the household draw and the monthly draws

use household_engine::life::{derive_expense_plan, generate_life_stage};
use household_engine::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::{MonthSnapshot, TimeSeriesRecorder};

use std::time::Instant;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    months: u32,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> BenchResult {
    let start = Instant::now();
    let engine = Engine::new(Catalog::default(), (scenario.config)());
    let config = engine.config();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let life = generate_life_stage(engine.catalog(), seed, &mut rng);
    let plan = derive_expense_plan(engine.catalog(), &life);
    let breakdown = engine.resolve_expenses(&life, &plan);
    let mut state = SimulationState::new(&life, config);
    let starting_debt = state.debt_balance;

    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new(months as usize));

    let mut missed_payments = 0u32;
    let mut events_fired = 0u32;
    let mut total_interest = 0.0;
    let mut debt_free_month = if starting_debt <= 0.0 { Some(0) } else { None };
    let mut bounds_held = true;

    for _ in 0..months {
        let decision = (scenario.policy)(&life, &state, &breakdown, scenario.climate, scenario.risk);
        let outcome = engine.step(&life, &decision, &breakdown, state, &mut rng);

        if outcome.ledger.missed {
            missed_payments += 1;
        }
        if outcome.draw.event.is_some() {
            events_fired += 1;
        }
        total_interest += outcome.ledger.interest_accrued;

        let snap = &outcome.snapshot;
        let in_bounds = (config.stress.min..=config.stress.max).contains(&snap.stress_level)
            && (config.credit.min..=config.credit.max).contains(&snap.credit_score)
            && outcome.state.history.len() <= config.history_cap
            && outcome.state.debts.iter().all(|d| d.balance >= 0.0);
        bounds_held &= in_bounds;

        if debt_free_month.is_none() && outcome.state.debts.iter().all(Debt::is_paid_off) {
            debt_free_month = Some(snap.month);
        }

        if let Some(ts) = time_series.as_mut() {
            ts.record(MonthSnapshot::from_cycle(snap, &outcome.state, outcome.ledger.missed));
        }

        state = outcome.state;
    }

    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = ts.write_jsonl(&path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write time series");
        }
    }

    let mut pass = true;
    if scenario.criteria.require_bounds && !bounds_held {
        pass = false;
    }
    if let Some(max_missed) = scenario.criteria.max_missed_payments {
        if missed_payments > max_missed {
            pass = false;
        }
    }

    BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        months,
        monthly_income: life.monthly_income,
        dependents: life.dependents,
        starting_debt,
        final_net_worth: state.net_worth(),
        final_debt: state.debt_balance,
        final_cash: state.cash_on_hand,
        final_investments: state.investments,
        final_stress: state.stress_level,
        final_credit: state.credit_score,
        missed_payments,
        events_fired,
        total_interest,
        debt_free_month,
        bounds_held,
        elapsed_ms: start.elapsed().as_millis(),
    }
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    months_override: Option<u32>,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> MonteCarloReport {
    let months = months_override.unwrap_or(scenario.months);
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let results: Vec<BenchResult> = (0..n_runs)
        .map(|i| run_single(scenario, months, base_seed + i as u64, ts_dir.as_deref()))
        .collect();

    aggregate(scenario, results)
}

fn stats_of(results: &[BenchResult], f: impl Fn(&BenchResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let denom = n.max(1) as f64;
    let debt_free: Vec<f64> = results
        .iter()
        .filter_map(|r| r.debt_free_month.map(f64::from))
        .collect();
    let debt_free_share = debt_free.len() as f64 / denom;

    let mut passed = results.iter().filter(|r| r.pass).count();
    if let Some(min_share) = scenario.criteria.min_debt_free_share {
        if debt_free_share < min_share {
            passed = 0;
        }
    }

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate: passed as f64 / denom,
        debt_free_share,
        final_net_worth: stats_of(&results, |r| r.final_net_worth),
        final_debt: stats_of(&results, |r| r.final_debt),
        final_stress: stats_of(&results, |r| r.final_stress as f64),
        final_credit: stats_of(&results, |r| r.final_credit as f64),
        missed_payments: stats_of(&results, |r| r.missed_payments as f64),
        total_interest: stats_of(&results, |r| r.total_interest),
        debt_free_month: Stats::from_samples(&debt_free),
        elapsed_ms: stats_of(&results, |r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}
