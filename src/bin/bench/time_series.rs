// Per-Month JSONL Time Series Recorder
// Outputs one JSON line per simulated month for independent analysis

use household_engine::{Snapshot, SimulationState};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct MonthSnapshot {
    pub month: u32,
    pub net_worth: f64,
    pub cash_on_hand: f64,
    pub savings: f64,
    pub investments: f64,
    pub debt_balance: f64,
    pub open_debts: usize,
    pub stress_level: u32,
    pub credit_score: u32,
    pub income: f64,
    pub expenses: f64,
    pub market_return: f64,
    pub event: Option<String>,
    pub missed_payment: bool,
}

impl MonthSnapshot {
    /// `state` is the post-cycle state that `snapshot` was taken from.
    pub fn from_cycle(snapshot: &Snapshot, state: &SimulationState, missed_payment: bool) -> Self {
        Self {
            month: snapshot.month,
            net_worth: snapshot.net_worth,
            cash_on_hand: snapshot.cash_on_hand,
            savings: snapshot.savings,
            investments: snapshot.investments,
            debt_balance: snapshot.debt_balance,
            open_debts: state.debts.iter().filter(|d| !d.is_paid_off()).count(),
            stress_level: snapshot.stress_level,
            credit_score: snapshot.credit_score,
            income: snapshot.income,
            expenses: snapshot.expenses,
            market_return: snapshot.market_return,
            event: snapshot.event_key.clone(),
            missed_payment,
        }
    }
}

pub struct TimeSeriesRecorder {
    pub snapshots: Vec<MonthSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, snapshot: MonthSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snap in &self.snapshots {
            let line = serde_json::to_string(snap)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }
}
