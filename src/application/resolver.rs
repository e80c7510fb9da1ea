//! SCORE2 tier resolution.
//!
//! Strategies are tried in order of authority. The first one that yields an
//! estimate wins; when none does, the calibrated approximation is used.

use crate::application::CoefficientStore;
use crate::domain::models::score2;
use crate::domain::models::{Score2Estimate, Score2Input};
use crate::domain::Score2Tier;

/// One way of producing a SCORE2 estimate from the store.
pub trait Score2Strategy: Send + Sync {
    fn tier(&self) -> Score2Tier;

    /// `None` when this strategy has nothing to say for the input.
    fn estimate(&self, store: &CoefficientStore, input: &Score2Input) -> Option<Score2Estimate>;
}

/// Tier 1: published risk charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableStrategy;

impl Score2Strategy for TableStrategy {
    fn tier(&self) -> Score2Tier {
        Score2Tier::Table
    }

    fn estimate(&self, store: &CoefficientStore, input: &Score2Input) -> Option<Score2Estimate> {
        let table = store.score2_table(&input.key())?;
        score2::table_lookup(table, input)
    }
}

/// Tier 2: official equation with loaded coefficients.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoefficientStrategy;

impl Score2Strategy for CoefficientStrategy {
    fn tier(&self) -> Score2Tier {
        Score2Tier::Coefficients
    }

    fn estimate(&self, store: &CoefficientStore, input: &Score2Input) -> Option<Score2Estimate> {
        score2::coefficient_model(store.score2_coefficients(&input.key()), input)
    }
}

/// Ordered strategy chain with a total fallback.
pub struct Score2Resolver {
    strategies: Vec<Box<dyn Score2Strategy>>,
}

impl Score2Resolver {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn Score2Strategy>>) -> Self {
        Self { strategies }
    }

    /// Tiers that may be tried before the approximation, in order.
    pub fn tiers(&self) -> impl Iterator<Item = Score2Tier> + '_ {
        self.strategies.iter().map(|s| s.tier())
    }

    #[must_use]
    pub fn resolve(&self, store: &CoefficientStore, input: &Score2Input) -> Score2Estimate {
        for strategy in &self.strategies {
            match strategy.estimate(store, input) {
                Some(estimate) => {
                    tracing::debug!(
                        tier = strategy.tier().number(),
                        percent = estimate.percent,
                        "SCORE2 resolved"
                    );
                    return estimate;
                }
                None => {
                    tracing::debug!(tier = strategy.tier().number(), "SCORE2 tier yielded nothing");
                }
            }
        }

        let estimate = score2::approximation(input);
        tracing::debug!(
            tier = Score2Tier::Approximation.number(),
            percent = estimate.percent,
            "SCORE2 resolved"
        );
        estimate
    }
}

impl Default for Score2Resolver {
    fn default() -> Self {
        Self::new(vec![Box::new(TableStrategy), Box::new(CoefficientStrategy)])
    }
}

impl std::fmt::Debug for Score2Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tiers()).finish()
    }
}
