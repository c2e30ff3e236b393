//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::error::{GaError, Result};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the Genetic Algorithm.
///
/// Controls population size, ranked selection, termination conditions,
/// history gathering, seeding, and parallelism.
///
/// # Defaults
///
/// ```
/// use ranked_ga::ga::GaConfig;
/// use std::time::Duration;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 500);
/// assert_eq!(config.generation_limit, 1_000_000);
/// assert_eq!(config.time_limit, Duration::from_millis(5000));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use ranked_ga::ga::GaConfig;
/// use std::time::Duration;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_ranking_groups(8)
///     .with_fitness_cap(0.995)
///     .with_time_limit(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Number of genotypes in every generation.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub generation_limit: usize,

    /// Stop as soon as the best fitness of a generation reaches this value.
    pub fitness_cap: f64,

    /// Wall-clock time limit.
    ///
    /// Checked before each generation, so a run may overshoot by at most one
    /// generation's worth of work.
    pub time_limit: Duration,

    /// Number of rank groups used by selection.
    pub ranking_groups: usize,

    /// Whether to keep a record of every generation in the statistics.
    pub gather_history: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds every generator from operating-system entropy.
    pub seed: Option<u64>,

    /// Whether to evaluate fitness in parallel using rayon.
    ///
    /// Only effective with the `parallel` cargo feature.
    pub parallel: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            generation_limit: 1_000_000,
            fitness_cap: 0.9,
            time_limit: Duration::from_millis(5000),
            ranking_groups: 5,
            gather_history: false,
            seed: None,
            parallel: false,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation limit.
    pub fn with_generation_limit(mut self, n: usize) -> Self {
        self.generation_limit = n;
        self
    }

    /// Sets the fitness cap.
    pub fn with_fitness_cap(mut self, cap: f64) -> Self {
        self.fitness_cap = cap;
        self
    }

    /// Sets the wall-clock time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(self, ms: u64) -> Self {
        self.with_time_limit(Duration::from_millis(ms))
    }

    /// Sets the number of ranking groups.
    pub fn with_ranking_groups(mut self, groups: usize) -> Self {
        self.ranking_groups = groups;
        self
    }

    /// Enables or disables per-generation history.
    pub fn with_history(mut self, gather: bool) -> Self {
        self.gather_history = gather;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration on its own.
    ///
    /// Checks that depend on the genotype model or the rank function are
    /// done by [`Algorithm::run`](super::Algorithm::run).
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(GaError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        if self.ranking_groups == 0 {
            return Err(GaError::ZeroRankingGroups);
        }
        if self.ranking_groups > self.population_size {
            return Err(GaError::TooManyRankingGroups {
                groups: self.ranking_groups,
                population: self.population_size,
            });
        }
        if self.fitness_cap.is_nan() {
            return Err(GaError::InvalidConfig("fitness_cap must not be NaN".into()));
        }
        Ok(())
    }
}
