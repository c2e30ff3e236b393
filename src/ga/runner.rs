//! GA evolutionary loop execution.
//!
//! [`Algorithm`] orchestrates the complete evolutionary process:
//! initialization → (evaluation → selection → reproduction) → repeat,
//! until the generation limit, the fitness cap, or the time limit is hit.

use super::config::GaConfig;
use super::error::{GaError, Result};
use super::model::GenotypeModel;
use super::population::Population;
use super::selection::survivor_count;
use super::statistics::{GenerationRecord, Observer, Statistics, StopReason};
use super::types::{Gene, Genotype};
use crate::random::RandomGenerator;
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Lifecycle of an [`Algorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmState {
    /// Constructed, never run.
    Idle,
    /// Inside the generation loop.
    Running,
    /// The last run ended (stop condition met or configuration rejected).
    Terminated,
}

/// Drives a population through generations.
///
/// Holds the caller's fitness function (`genotype -> score`, higher is
/// better) and rank-distribution function (`group index -> retention
/// fraction`, fittest group is 0).
///
/// For the best fitness to be non-decreasing across generations the rank
/// function must keep the whole fittest group, i.e. `rank_fn(0) == 1.0`.
///
/// # Usage
///
/// ```
/// use ranked_ga::ga::{Algorithm, Crossover, GaConfig, GeneParams, Genotype, GenotypeModel, Mutation};
///
/// let model = GenotypeModel::homogeneous(GeneParams::range(0u8, 1), 16)
///     .unwrap()
///     .with_crossover(Crossover::one_point())
///     .with_mutation(Mutation::random_value(0.5));
///
/// let fitness = |g: &Genotype<u8>| g.iter().map(|&b| b as f64).sum::<f64>() / 16.0;
/// let rank = |group: usize| if group == 0 { 1.0 } else { 0.5 };
///
/// let mut algorithm = Algorithm::new(fitness, rank);
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_generation_limit(200)
///     .with_fitness_cap(1.0)
///     .with_seed(42);
///
/// let population = algorithm.run(model, &config).unwrap();
/// assert!(population.best_genotype().is_some());
/// assert!(algorithm.statistics().generations() <= 200);
/// ```
pub struct Algorithm<T, F, R> {
    fitness_fn: F,
    rank_fn: R,
    state: AlgorithmState,
    statistics: Statistics,
    _gene: PhantomData<fn() -> T>,
}

impl<T, F, R> Algorithm<T, F, R>
where
    T: Gene,
    F: Fn(&Genotype<T>) -> f64 + Sync,
    R: Fn(usize) -> f64,
{
    /// Creates an idle algorithm.
    pub fn new(fitness_fn: F, rank_fn: R) -> Self {
        Self {
            fitness_fn,
            rank_fn,
            state: AlgorithmState::Idle,
            statistics: Statistics::default(),
            _gene: PhantomData,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    /// Statistics of the latest run.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// The fitness function, e.g. for re-scoring the returned best genotype.
    pub fn fitness_fn(&self) -> &F {
        &self.fitness_fn
    }

    /// Runs the GA without observers.
    pub fn run(&mut self, model: GenotypeModel<T>, config: &GaConfig) -> Result<Population<T>> {
        self.run_with_observers(model, config, &mut [])
    }

    /// Runs the GA, notifying every observer after each generation.
    ///
    /// The population takes ownership of `model` for the run and is
    /// returned at termination; use [`Population::into_model`] to get the
    /// model back.
    ///
    /// All configuration errors are reported before the first generation.
    #[instrument(level = "debug", skip_all, fields(
        population_size = config.population_size,
        genome_len = model.genome_len(),
    ))]
    pub fn run_with_observers(
        &mut self,
        mut model: GenotypeModel<T>,
        config: &GaConfig,
        observers: &mut [&mut dyn Observer],
    ) -> Result<Population<T>> {
        if let Err(err) = self.validate(&model, config) {
            warn!(error = %err, "rejected GA configuration");
            self.state = AlgorithmState::Terminated;
            return Err(err);
        }
        if model.mutations().is_empty() {
            warn!("genotype model has no mutation operators; offspring will not be mutated");
        }

        let mut source = match config.seed {
            Some(seed) => {
                let mut source = RandomGenerator::seeded(seed);
                model.reseed(&mut source);
                source
            }
            None => RandomGenerator::new(),
        };

        let mut population = Population::new(model, config.population_size)
            .with_rng(source.split())
            .with_parallel(config.parallel);
        population.init();

        self.statistics
            .reset(config.gather_history, config.generation_limit.min(1024));
        self.state = AlgorithmState::Running;
        info!(
            population_size = config.population_size,
            generation_limit = config.generation_limit,
            fitness_cap = config.fitness_cap,
            time_limit_ms = config.time_limit.as_millis() as u64,
            ranking_groups = config.ranking_groups,
            "GA run started"
        );

        let start = Instant::now();
        let mut generations = 0usize;
        let mut best = f64::NEG_INFINITY;
        let mut elapsed = Duration::ZERO;

        let reason = loop {
            if generations >= config.generation_limit {
                break StopReason::GenerationLimit;
            }
            if best >= config.fitness_cap {
                break StopReason::FitnessCap;
            }
            if elapsed >= config.time_limit {
                break StopReason::TimeLimit;
            }

            if let Err(err) =
                population.evolve(&self.fitness_fn, &self.rank_fn, config.ranking_groups)
            {
                self.state = AlgorithmState::Terminated;
                return Err(err);
            }

            best = population.best_achieved_fitness();
            elapsed = start.elapsed();
            generations += 1;

            let record = GenerationRecord {
                generation_index: generations,
                best_achieved_fitness: best,
                mean_fitness: population.overall_fitness(),
            };
            self.statistics.record_generation(record, elapsed);
            debug!(
                generation = generations,
                best_fitness = best,
                mean_fitness = record.mean_fitness,
                "generation evolved"
            );

            for observer in observers.iter_mut() {
                observer.on_generation(&self.statistics);
            }
        };

        self.statistics.set_stop_reason(reason);
        self.state = AlgorithmState::Terminated;
        info!(
            ?reason,
            generations,
            best_fitness = best,
            elapsed_ms = elapsed.as_millis() as u64,
            "GA run finished"
        );

        Ok(population)
    }

    /// Entry checks that need the model and the rank function.
    fn validate(&self, model: &GenotypeModel<T>, config: &GaConfig) -> Result<()> {
        config.validate()?;

        let survivors = survivor_count(config.population_size, config.ranking_groups, &self.rank_fn);
        if survivors < 2 {
            return Err(GaError::InsufficientSurvivors { survivors });
        }
        if survivors < config.population_size {
            model.validate_for_breeding()?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Crossover, GeneParams, Mutation};

    // ---- OneMax over 0/1 genes, fitness normalized to [0, 1] ----

    const BITS: usize = 20;

    fn onemax_model() -> GenotypeModel<u8> {
        GenotypeModel::homogeneous(GeneParams::range(0u8, 1), BITS)
            .expect("valid model")
            .with_crossover(Crossover::one_point())
            .with_mutation(Mutation::random_value(0.5))
            .with_mutation(Mutation::random_value_shift(0.5))
    }

    fn onemax(g: &Genotype<u8>) -> f64 {
        g.iter().map(|&b| b as f64).sum::<f64>() / BITS as f64
    }

    fn elitist(group: usize) -> f64 {
        if group == 0 {
            1.0
        } else {
            0.4
        }
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(60)
            .with_generation_limit(300)
            .with_fitness_cap(1.0)
            .with_time_limit_ms(10_000)
            .with_ranking_groups(4)
            .with_seed(42)
    }

    #[test]
    fn test_onemax_convergence() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let population = algorithm.run(onemax_model(), &config()).expect("valid setup");

        let best = population.best_genotype().expect("evaluated");
        assert!(onemax(best) >= 0.9, "expected near-optimal, got {}", onemax(best));
        assert_eq!(algorithm.state(), AlgorithmState::Terminated);
        assert_eq!(population.size(), 60);
    }

    #[test]
    fn test_generation_limit_termination() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let config = config().with_generation_limit(7).with_fitness_cap(2.0);
        algorithm.run(onemax_model(), &config).expect("valid setup");

        assert_eq!(algorithm.statistics().generations(), 7);
        assert_eq!(
            algorithm.statistics().stop_reason(),
            Some(StopReason::GenerationLimit)
        );
    }

    #[test]
    fn test_zero_generation_limit() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let population = algorithm
            .run(onemax_model(), &config().with_generation_limit(0))
            .expect("valid setup");
        assert_eq!(algorithm.statistics().generations(), 0);
        assert_eq!(population.size(), 60);
        assert!(population.best_genotype().is_none());
    }

    #[test]
    fn test_fitness_cap_termination() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let config = config().with_fitness_cap(0.5);
        algorithm.run(onemax_model(), &config).expect("valid setup");

        let stats = algorithm.statistics();
        assert_eq!(stats.stop_reason(), Some(StopReason::FitnessCap));
        assert!(stats.best_achieved_fitness() >= 0.5);
    }

    #[test]
    fn test_time_limit_termination() {
        let slow = |g: &Genotype<u8>| {
            std::thread::sleep(Duration::from_micros(50));
            onemax(g)
        };
        let mut algorithm = Algorithm::new(slow, elitist);
        let config = config()
            .with_generation_limit(usize::MAX)
            .with_fitness_cap(f64::INFINITY)
            .with_time_limit_ms(50);
        algorithm.run(onemax_model(), &config).expect("valid setup");

        let stats = algorithm.statistics();
        assert_eq!(stats.stop_reason(), Some(StopReason::TimeLimit));
        assert!(stats.elapsed() >= Duration::from_millis(50));
        // One generation is 60 sleeps of 50µs; allow generous scheduling slack
        assert!(stats.elapsed() < Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_time_limit_runs_nothing() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        algorithm
            .run(onemax_model(), &config().with_time_limit(Duration::ZERO))
            .expect("valid setup");
        assert_eq!(algorithm.statistics().generations(), 0);
        assert_eq!(
            algorithm.statistics().stop_reason(),
            Some(StopReason::TimeLimit)
        );
    }

    #[test]
    fn test_best_fitness_is_monotonic_with_elitism() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let config = config().with_generation_limit(80).with_fitness_cap(2.0).with_history(true);
        algorithm.run(onemax_model(), &config).expect("valid setup");

        let history = algorithm.statistics().history();
        assert_eq!(history.len(), 80);
        for window in history.windows(2) {
            assert!(
                window[1].best_achieved_fitness >= window[0].best_achieved_fitness,
                "best fitness decreased: {:?} -> {:?}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_observers_called_once_per_generation() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let mut indices = Vec::new();
        let mut count = 0usize;
        {
            let mut record = |s: &Statistics| indices.push(s.last_generation().generation_index);
            let mut counter = |_: &Statistics| count += 1;
            let config = config().with_generation_limit(12).with_fitness_cap(2.0);
            algorithm
                .run_with_observers(onemax_model(), &config, &mut [&mut record, &mut counter])
                .expect("valid setup");
        }
        assert_eq!(indices, (1..=12).collect::<Vec<_>>());
        assert_eq!(count, 12);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut algorithm = Algorithm::new(onemax, elitist);
            let config = config().with_generation_limit(25).with_fitness_cap(2.0).with_history(true);
            let population = algorithm.run(onemax_model(), &config).expect("valid setup");
            (
                population.best_genotype().cloned(),
                algorithm.statistics().history().to_vec(),
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_missing_crossover_rejected_at_entry() {
        let model = GenotypeModel::homogeneous(GeneParams::range(0u8, 1), BITS)
            .expect("valid model")
            .with_mutation(Mutation::random_value(0.1));
        let mut algorithm = Algorithm::new(onemax, elitist);
        let err = algorithm.run(model, &config()).unwrap_err();
        assert_eq!(err, GaError::MissingCrossover);
        assert_eq!(algorithm.state(), AlgorithmState::Terminated);
        assert_eq!(algorithm.statistics().generations(), 0);
    }

    #[test]
    fn test_keep_everyone_needs_no_crossover() {
        let model = GenotypeModel::homogeneous(GeneParams::range(0u8, 1), 2).expect("valid model");
        let mut algorithm = Algorithm::new(|g: &Genotype<u8>| g[0] as f64, |_: usize| 1.0);
        let population = algorithm
            .run(model, &config().with_generation_limit(3).with_fitness_cap(5.0))
            .expect("no breeding needed");
        assert_eq!(population.size(), 60);
        assert_eq!(algorithm.statistics().generations(), 3);
    }

    #[test]
    fn test_short_genome_rejected_at_entry() {
        let model = GenotypeModel::homogeneous(GeneParams::range(0u8, 1), 2)
            .expect("valid model")
            .with_crossover(Crossover::one_point());
        let mut algorithm = Algorithm::new(onemax, elitist);
        assert_eq!(
            algorithm.run(model, &config()).unwrap_err(),
            GaError::GenomeTooShort { len: 2, min: 3 }
        );
    }

    #[test]
    fn test_insufficient_survivors_rejected_at_entry() {
        let mut algorithm = Algorithm::new(onemax, |_: usize| 0.0);
        assert_eq!(
            algorithm.run(onemax_model(), &config()).unwrap_err(),
            GaError::InsufficientSurvivors { survivors: 0 }
        );
    }

    #[test]
    fn test_too_many_groups_rejected_at_entry() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let config = config().with_ranking_groups(61);
        assert_eq!(
            algorithm.run(onemax_model(), &config).unwrap_err(),
            GaError::TooManyRankingGroups {
                groups: 61,
                population: 60
            }
        );
    }

    #[test]
    fn test_state_transitions() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        assert_eq!(algorithm.state(), AlgorithmState::Idle);
        let config = config().with_generation_limit(2).with_fitness_cap(2.0);
        let mut observed = Vec::new();
        {
            let mut obs = |s: &Statistics| observed.push(s.generations());
            algorithm
                .run_with_observers(onemax_model(), &config, &mut [&mut obs])
                .expect("valid setup");
        }
        assert_eq!(observed, vec![1, 2]);
        assert_eq!(algorithm.state(), AlgorithmState::Terminated);

        // A second run resets statistics
        algorithm
            .run(onemax_model(), &config.with_generation_limit(1))
            .expect("valid setup");
        assert_eq!(algorithm.statistics().generations(), 1);
    }

    #[test]
    fn test_run_without_mutations() {
        let model = GenotypeModel::homogeneous(GeneParams::range(0u8, 1), BITS)
            .expect("valid model")
            .with_crossover(Crossover::one_point());
        let mut algorithm = Algorithm::new(onemax, elitist);
        let population = algorithm
            .run(model, &config().with_generation_limit(10).with_fitness_cap(2.0))
            .expect("mutation set may be empty");
        assert_eq!(population.size(), 60);
    }

    #[test]
    fn test_model_returned_with_population() {
        let mut algorithm = Algorithm::new(onemax, elitist);
        let population = algorithm
            .run(onemax_model(), &config().with_generation_limit(1))
            .expect("valid setup");
        let model = population.into_model();
        assert_eq!(model.genome_len(), BITS);
        assert_eq!(model.mutations().len(), 2);
    }
}
