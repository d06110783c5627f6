// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Household Finance Simulation - Market/Event Sampler

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, EventImpact, LifeEvent};
use crate::config::EngineConfig;

/// Label recorded when no life event fires.
pub const QUIET_MONTH: &str = "Quiet month";

/// Stochastic inputs for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleDraw {
    /// Climate base return scaled by the risk multiplier.
    pub expected_return: f64,
    pub noise: f64,
    /// `expected_return + noise + event market shock`.
    pub market_return: f64,
    pub event: Option<LifeEvent>,
}

impl CycleDraw {
    /// A draw with no noise and no event.
    pub fn quiet(expected_return: f64) -> Self {
        Self {
            expected_return,
            noise: 0.0,
            market_return: expected_return,
            event: None,
        }
    }

    /// A draw with no noise and the given event.
    pub fn with_event(expected_return: f64, event: LifeEvent) -> Self {
        let market_return = expected_return + event.impact.market_shock();
        Self {
            expected_return,
            noise: 0.0,
            market_return,
            event: Some(event),
        }
    }

    pub fn impact(&self) -> EventImpact {
        self.event.as_ref().map(|e| e.impact).unwrap_or_default()
    }

    pub fn event_label(&self) -> &str {
        self.event.as_ref().map(|e| e.label.as_str()).unwrap_or(QUIET_MONTH)
    }

    pub fn event_key(&self) -> Option<&str> {
        self.event.as_ref().map(|e| e.key.as_str())
    }
}

/// Expected monthly return for a climate/risk pair, with lenient fallbacks.
pub fn expected_return(catalog: &Catalog, climate: &str, risk: &str) -> f64 {
    catalog.climate_return(climate) * catalog.risk_multiplier(risk)
}

/// Draw this cycle's market return and at most one life event.
///
/// Market noise is uniform in `±config.market_noise`. The event roll is an
/// independent draw; a fired event is picked uniformly among catalog events
/// other than `last_event`.
pub fn sample_cycle<R: Rng + ?Sized>(
    catalog: &Catalog,
    config: &EngineConfig,
    climate: &str,
    risk: &str,
    last_event: Option<&str>,
    rng: &mut R,
) -> CycleDraw {
    let expected = expected_return(catalog, climate, risk);

    let noise = if config.market_noise > 0.0 {
        rng.gen_range(-config.market_noise..=config.market_noise)
    } else {
        0.0
    };

    let fired = config.event_probability > 0.0 && rng.gen::<f64>() < config.event_probability;
    let event = if fired { pick_event(catalog, last_event, rng) } else { None };

    let shock = event.as_ref().map(|e| e.impact.market_shock()).unwrap_or(0.0);
    if let Some(e) = &event {
        debug!(event = %e.key, "life event fired");
    }

    CycleDraw {
        expected_return: expected,
        noise,
        market_return: expected + noise + shock,
        event,
    }
}

fn pick_event<R: Rng + ?Sized>(
    catalog: &Catalog,
    last_event: Option<&str>,
    rng: &mut R,
) -> Option<LifeEvent> {
    let candidates: Vec<&LifeEvent> = catalog
        .events
        .iter()
        .filter(|e| Some(e.key.as_str()) != last_event)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..candidates.len());
    Some(candidates[idx].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn always_fire() -> EngineConfig {
        EngineConfig { event_probability: 1.0, ..EngineConfig::default() }
    }

    #[test]
    fn deterministic_config_returns_expected() {
        let catalog = Catalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let draw = sample_cycle(&catalog, &EngineConfig::deterministic(), "bull", "aggressive", None, &mut rng);
        assert!((draw.market_return - 0.012 * 1.6).abs() < 1e-12);
        assert!(draw.event.is_none());
        assert_eq!(draw.event_label(), QUIET_MONTH);
    }

    #[test]
    fn noise_stays_in_band() {
        let catalog = Catalog::default();
        let config = EngineConfig { event_probability: 0.0, ..EngineConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let draw = sample_cycle(&catalog, &config, "neutral", "moderate", None, &mut rng);
            assert!(draw.noise.abs() <= 0.006);
            assert!((draw.market_return - draw.expected_return - draw.noise).abs() < 1e-12);
        }
    }

    #[test]
    fn unknown_selection_uses_neutral_moderate() {
        let catalog = Catalog::default();
        assert_eq!(
            expected_return(&catalog, "hyperinflation", "reckless"),
            expected_return(&catalog, "neutral", "moderate")
        );
    }

    #[test]
    fn fired_event_never_repeats_previous() {
        let catalog = Catalog::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut last: Option<String> = None;
        for _ in 0..300 {
            let draw = sample_cycle(&catalog, &always_fire(), "neutral", "moderate", last.as_deref(), &mut rng);
            let key = draw.event_key().map(str::to_string);
            assert!(key.is_some());
            assert_ne!(key, last);
            last = key;
        }
    }

    #[test]
    fn single_event_catalog_goes_quiet_after_firing() {
        let mut catalog = Catalog::default();
        catalog.events.truncate(1);
        let only = catalog.events[0].key.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let draw = sample_cycle(&catalog, &always_fire(), "neutral", "moderate", Some(only.as_str()), &mut rng);
        assert!(draw.event.is_none());
    }

    #[test]
    fn market_shock_feeds_return() {
        let catalog = Catalog::default();
        let crash = catalog.find_event("market_crash").unwrap().clone();
        let draw = CycleDraw::with_event(0.004, crash);
        assert!((draw.market_return - (0.004 - 0.08)).abs() < 1e-12);
    }

    #[test]
    fn firing_rate_tracks_probability() {
        let catalog = Catalog::default();
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let fired = (0..5000)
            .filter(|_| sample_cycle(&catalog, &config, "neutral", "moderate", None, &mut rng).event.is_some())
            .count();
        let rate = fired as f64 / 5000.0;
        assert!((0.17..0.23).contains(&rate), "rate {rate}");
    }
}
