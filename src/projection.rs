// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Projector

use rand::Rng;

use crate::engine::Engine;
use crate::types::{Decision, ExpenseBreakdown, ForecastPoint, LifeStage, SimulationState};

/// Forecast iterator: runs the cycle engine on a private copy of the start
/// state, yielding one point per cycle until `periods` are exhausted.
///
/// The sequence cannot be rewound. Replaying it means building a new
/// `Projection` from the same start state with an identically seeded RNG.
pub struct Projection<'a, R: Rng + ?Sized> {
    engine: &'a Engine,
    life: &'a LifeStage,
    decision: &'a Decision,
    breakdown: &'a ExpenseBreakdown,
    state: Option<SimulationState>,
    remaining: u32,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Projection<'a, R> {
    pub fn new(
        engine: &'a Engine,
        life: &'a LifeStage,
        decision: &'a Decision,
        breakdown: &'a ExpenseBreakdown,
        start: &SimulationState,
        periods: u32,
        rng: &'a mut R,
    ) -> Self {
        Self {
            engine,
            life,
            decision,
            breakdown,
            state: Some(start.clone()),
            remaining: periods,
            rng,
        }
    }
}

impl<R: Rng + ?Sized> Iterator for Projection<'_, R> {
    type Item = ForecastPoint;

    fn next(&mut self) -> Option<ForecastPoint> {
        if self.remaining == 0 {
            return None;
        }
        let state = self.state.take()?;
        self.remaining -= 1;

        let outcome = self
            .engine
            .step(self.life, self.decision, self.breakdown, state, &mut *self.rng);
        let point = ForecastPoint {
            month: outcome.snapshot.month,
            net_worth: outcome.snapshot.net_worth,
            debt_balance: outcome.snapshot.debt_balance,
            investments: outcome.snapshot.investments,
        };
        self.state = Some(outcome.state);
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl<R: Rng + ?Sized> ExactSizeIterator for Projection<'_, R> {}
