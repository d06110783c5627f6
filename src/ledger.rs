// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Debt ledger -- one payment cycle over a household's debts.
//!
//! Each cycle accrues a month of interest on every debt and pours the cycle's
//! payment down the debts in descending-rate order. Arithmetic runs in
//! `Decimal` so balances do not drift over long timelines; the public
//! [`Debt`] type stays f64.
//!
//! ```text
//! new_balance = max(balance + balance * rate / 12 - paid, 0)
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::adapter::{from_decimal, to_decimal};
use crate::config::RepaymentStrategy;
use crate::types::Debt;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of one ledger cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerOutcome {
    /// Debts after the cycle, ascending by annual rate.
    pub debts: Vec<Debt>,
    /// Total paid fell short of the required share of minimum dues.
    pub missed: bool,
    pub total_paid: f64,
    pub interest_accrued: f64,
    /// Sum of (capped) minimum dues this cycle.
    pub minimum_required: f64,
}

/// Working row for one debt during a cycle.
#[derive(Debug, Clone)]
struct Row {
    label: String,
    balance: Decimal,
    rate: Decimal,
    /// Configured minimum, carried through unchanged.
    minimum_due: f64,
    /// Minimum for this cycle, capped at balance + interest.
    minimum: Decimal,
    interest: Decimal,
    paid: Decimal,
}

impl Row {
    fn owed(&self) -> Decimal {
        self.balance.saturating_add(self.interest)
    }

    fn headroom(&self) -> Decimal {
        (self.owed() - self.paid).max(Decimal::ZERO)
    }

    /// Pay up to `cap` from `remaining`, never past what is owed.
    fn pay(&mut self, remaining: &mut Decimal, cap: Decimal) {
        let amount = (*remaining).min(cap).min(self.headroom()).max(Decimal::ZERO);
        self.paid += amount;
        *remaining -= amount;
    }
}

// ---------------------------------------------------------------------------
// DebtLedger
// ---------------------------------------------------------------------------

/// Stateless repayment engine -- holds the waterfall strategy and the missed
/// payment threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtLedger {
    pub strategy: RepaymentStrategy,
    /// Share of total minimum dues that must be paid (default 0.90).
    pub missed_ratio: Decimal,
}

impl Default for DebtLedger {
    fn default() -> Self {
        Self {
            strategy: RepaymentStrategy::Avalanche,
            missed_ratio: dec!(0.90),
        }
    }
}

impl DebtLedger {
    pub fn new(strategy: RepaymentStrategy, missed_ratio: f64) -> Self {
        Self {
            strategy,
            missed_ratio: to_decimal(missed_ratio),
        }
    }

    /// Accrue one month of interest and apply `payment` across `debts`.
    ///
    /// Negative payments are treated as zero. An empty debt list is a no-op
    /// that is never "missed".
    pub fn apply_cycle(&self, debts: &[Debt], payment: f64) -> LedgerOutcome {
        let mut rows: Vec<Row> = debts
            .iter()
            .map(|d| {
                let balance = to_decimal(d.balance).max(Decimal::ZERO);
                let rate = to_decimal(d.annual_rate);
                // Saturate rather than panic on balances near Decimal's range.
                let interest = (balance.saturating_mul(rate) / MONTHS_PER_YEAR).max(Decimal::ZERO);
                let minimum = to_decimal(d.minimum_due)
                    .max(Decimal::ZERO)
                    .min(balance.saturating_add(interest));
                Row {
                    label: d.label.clone(),
                    balance,
                    rate,
                    minimum_due: d.minimum_due,
                    minimum,
                    interest,
                    paid: Decimal::ZERO,
                }
            })
            .collect();

        // Highest rate first; stable so equal rates keep their input order.
        rows.sort_by(|a, b| b.rate.cmp(&a.rate));

        let mut remaining = to_decimal(payment).max(Decimal::ZERO);
        match self.strategy {
            RepaymentStrategy::Avalanche => {
                for row in rows.iter_mut() {
                    let minimum = row.minimum;
                    row.pay(&mut remaining, minimum);
                    row.pay(&mut remaining, Decimal::MAX);
                }
            }
            RepaymentStrategy::MinimumsFirst => {
                for row in rows.iter_mut() {
                    let minimum = row.minimum;
                    row.pay(&mut remaining, minimum);
                }
                for row in rows.iter_mut() {
                    row.pay(&mut remaining, Decimal::MAX);
                }
            }
        }

        let total_paid = saturating_sum(rows.iter().map(|r| r.paid));
        let interest = saturating_sum(rows.iter().map(|r| r.interest));
        let required = saturating_sum(rows.iter().map(|r| r.minimum));
        let missed = total_paid < required.saturating_mul(self.missed_ratio);

        for row in &rows {
            trace!(
                debt = %row.label,
                rate = %row.rate,
                interest = %row.interest,
                paid = %row.paid,
                "ledger row"
            );
        }
        if missed {
            debug!(paid = %total_paid, required = %required, "missed debt payment");
        }

        rows.sort_by(|a, b| a.rate.cmp(&b.rate));
        let debts = rows
            .into_iter()
            .map(|r| {
                let balance = (r.owed() - r.paid).max(Decimal::ZERO);
                Debt {
                    label: r.label,
                    balance: from_decimal(balance),
                    annual_rate: from_decimal(r.rate),
                    minimum_due: r.minimum_due,
                }
            })
            .collect();

        LedgerOutcome {
            debts,
            missed,
            total_paid: from_decimal(total_paid),
            interest_accrued: from_decimal(interest),
            minimum_required: from_decimal(required),
        }
    }
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
