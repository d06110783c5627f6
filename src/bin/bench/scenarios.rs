// Scenario Definitions: decision policies crossed with market regimes
// Each scenario draws a fresh household per run and applies one policy every month

use household_engine::{Decision, EngineConfig, ExpenseBreakdown, LifeStage, RepaymentStrategy, SimulationState};

// ─── Scenario Configuration ─────────────────────────────────────────────────

/// Picks the month's allocation from the household and its current state.
pub type Policy = fn(&LifeStage, &SimulationState, &ExpenseBreakdown, &str, &str) -> Decision;

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub months: u32,
    pub climate: &'static str,
    pub risk: &'static str,
    pub policy: Policy,
    pub config: fn() -> EngineConfig,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    /// Share of runs that must end with every debt paid off.
    pub min_debt_free_share: Option<f64>,
    /// Upper bound on missed payments in a single run.
    pub max_missed_payments: Option<u32>,
    pub require_bounds: bool,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            min_debt_free_share: None,
            max_missed_payments: None,
            require_bounds: true,
        }
    }
}

// ─── Policies ───────────────────────────────────────────────────────────────

fn minimums(state: &SimulationState) -> f64 {
    state
        .debts
        .iter()
        .filter(|d| !d.is_paid_off())
        .map(|d| d.minimum_due.min(d.balance))
        .sum()
}

/// Leftover after income covers expenses, never negative.
fn surplus(life: &LifeStage, breakdown: &ExpenseBreakdown) -> f64 {
    (life.monthly_income - breakdown.total).max(0.0)
}

fn decision(climate: &str, risk: &str, debt_payment: f64, investment: f64, emergency_cash: f64) -> Decision {
    Decision {
        market_climate: climate.to_string(),
        risk_profile: risk.to_string(),
        debt_payment,
        investment,
        emergency_cash,
    }
}

fn minimum_payer(_: &LifeStage, state: &SimulationState, _: &ExpenseBreakdown, climate: &str, risk: &str) -> Decision {
    decision(climate, risk, minimums(state), 0.0, 0.0)
}

fn avalanche_payer(life: &LifeStage, state: &SimulationState, b: &ExpenseBreakdown, climate: &str, risk: &str) -> Decision {
    let spare = surplus(life, b);
    let pay = (minimums(state) + spare * 0.7).min(state.debt_balance);
    let invest = if state.debt_balance <= 0.0 { spare * 0.5 } else { 0.0 };
    decision(climate, risk, pay, invest, spare * 0.1)
}

fn investor(life: &LifeStage, state: &SimulationState, b: &ExpenseBreakdown, climate: &str, risk: &str) -> Decision {
    let spare = surplus(life, b);
    decision(climate, risk, minimums(state), spare * 0.6, 0.0)
}

fn saver(life: &LifeStage, state: &SimulationState, b: &ExpenseBreakdown, climate: &str, risk: &str) -> Decision {
    let spare = surplus(life, b);
    decision(climate, risk, minimums(state), spare * 0.1, spare * 0.5)
}

fn skipper(_: &LifeStage, _: &SimulationState, _: &ExpenseBreakdown, climate: &str, risk: &str) -> Decision {
    decision(climate, risk, 0.0, 0.0, 0.0)
}

// ─── Engine Configurations ──────────────────────────────────────────────────

fn default_config() -> EngineConfig {
    EngineConfig::default()
}

fn minimums_first_config() -> EngineConfig {
    EngineConfig {
        repayment_strategy: RepaymentStrategy::MinimumsFirst,
        ..EngineConfig::default()
    }
}

fn eventful_config() -> EngineConfig {
    EngineConfig {
        event_probability: 0.5,
        ..EngineConfig::default()
    }
}

fn calm_config() -> EngineConfig {
    EngineConfig::deterministic()
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "AVALANCHE_NEUTRAL",
            label: "Avalanche payer, neutral market",
            category: "repayment",
            months: 120,
            climate: "neutral",
            risk: "moderate",
            policy: avalanche_payer,
            config: default_config,
            criteria: PassCriteria {
                max_missed_payments: Some(0),
                ..PassCriteria::default()
            },
        },
        Scenario {
            name: "AVALANCHE_MINIMUMS_FIRST",
            label: "Avalanche payer, minimums-first ledger",
            category: "repayment",
            months: 120,
            climate: "neutral",
            risk: "moderate",
            policy: avalanche_payer,
            config: minimums_first_config,
            criteria: PassCriteria {
                max_missed_payments: Some(0),
                ..PassCriteria::default()
            },
        },
        Scenario {
            name: "MINIMUM_PAYER",
            label: "Minimum payer, neutral market",
            category: "repayment",
            months: 120,
            climate: "neutral",
            risk: "moderate",
            policy: minimum_payer,
            config: default_config,
            criteria: PassCriteria {
                max_missed_payments: Some(0),
                ..PassCriteria::default()
            },
        },
        Scenario {
            name: "SKIPPER",
            label: "No debt payments",
            category: "repayment",
            months: 36,
            climate: "neutral",
            risk: "moderate",
            policy: skipper,
            config: default_config,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "INVESTOR_BULL",
            label: "Aggressive investor, bull market",
            category: "market",
            months: 120,
            climate: "bull",
            risk: "aggressive",
            policy: investor,
            config: default_config,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "INVESTOR_BEAR",
            label: "Aggressive investor, bear market",
            category: "market",
            months: 120,
            climate: "bear",
            risk: "aggressive",
            policy: investor,
            config: default_config,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "INVESTOR_VOLATILE",
            label: "Moderate investor, volatile market",
            category: "market",
            months: 120,
            climate: "volatile",
            risk: "moderate",
            policy: investor,
            config: default_config,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "SAVER_EVENTFUL",
            label: "Saver, frequent life events",
            category: "events",
            months: 120,
            climate: "neutral",
            risk: "conservative",
            policy: saver,
            config: eventful_config,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "AVALANCHE_CALM",
            label: "Avalanche payer, no noise or events",
            category: "baseline",
            months: 240,
            climate: "neutral",
            risk: "moderate",
            policy: avalanche_payer,
            config: calm_config,
            criteria: PassCriteria {
                min_debt_free_share: Some(0.5),
                max_missed_payments: Some(0),
                ..PassCriteria::default()
            },
        },
    ]
}
