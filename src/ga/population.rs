//! Population: one generation of genotypes plus their fitness records.
//!
//! A generation step ([`Population::evolve`]) runs
//! evaluation → ranked selection → reproduction. Fitness records refer to
//! genotypes by index into the current generation, and the generation vector
//! is rebuilt (not patched) at selection, so a record can never dangle.

use super::error::{GaError, Result};
use super::model::GenotypeModel;
use super::selection::split_by_groups_and_select;
use super::types::{Gene, Genotype};
use crate::random::RandomGenerator;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fitness of the genotype at `index` in the current generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessRecord {
    /// Score returned by the fitness function.
    pub fitness: f64,
    /// Position of the scored genotype in the current generation.
    pub index: usize,
}

/// Sort key that ranks NaN below every real score.
fn rank_key(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}

/// The evolving set of candidate solutions.
///
/// Exclusively owns its genotypes and the [`GenotypeModel`] that shapes them.
/// After [`init`](Population::init) and after every
/// [`evolve`](Population::evolve), `size() == max_size()`.
#[derive(Debug, Clone)]
pub struct Population<T> {
    model: GenotypeModel<T>,
    max_size: usize,
    generation: Vec<Genotype<T>>,
    fitness: Vec<FitnessRecord>,
    best_achieved_fitness: f64,
    overall_fitness: f64,
    rng: RandomGenerator,
    parallel: bool,
}

impl<T: Gene> Population<T> {
    /// Creates an empty population with room for `max_size` genotypes.
    pub fn new(model: GenotypeModel<T>, max_size: usize) -> Self {
        Self {
            model,
            max_size,
            generation: Vec::with_capacity(max_size),
            fitness: Vec::with_capacity(max_size),
            best_achieved_fitness: 0.0,
            overall_fitness: 0.0,
            rng: RandomGenerator::new(),
            parallel: false,
        }
    }

    /// Replaces the population's own generator (used for seeded runs).
    pub fn with_rng(mut self, rng: RandomGenerator) -> Self {
        self.rng = rng;
        self
    }

    /// Evaluates fitness in parallel when the `parallel` feature is enabled.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Current number of genotypes.
    pub fn size(&self) -> usize {
        self.generation.len()
    }

    /// Capacity restored by every reproduction step.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// The current generation, fittest survivors first after selection.
    pub fn genotypes(&self) -> &[Genotype<T>] {
        &self.generation
    }

    /// Fitness records from the latest evaluation or selection.
    pub fn fitness_records(&self) -> &[FitnessRecord] {
        &self.fitness
    }

    /// The genotype model.
    pub fn model(&self) -> &GenotypeModel<T> {
        &self.model
    }

    /// Mutable access to the genotype model.
    pub fn model_mut(&mut self) -> &mut GenotypeModel<T> {
        &mut self.model
    }

    /// Consumes the population and hands the model back.
    pub fn into_model(self) -> GenotypeModel<T> {
        self.model
    }

    /// Highest fitness seen by the latest evaluation.
    pub fn best_achieved_fitness(&self) -> f64 {
        self.best_achieved_fitness
    }

    /// Mean fitness of the latest evaluation.
    pub fn overall_fitness(&self) -> f64 {
        self.overall_fitness
    }

    /// Fills the population to capacity with random genotypes.
    pub fn init(&mut self) {
        self.generation.clear();
        self.fitness.clear();
        self.best_achieved_fitness = 0.0;
        self.overall_fitness = 0.0;

        for _ in 0..self.max_size {
            let genotype = self.model.random_genotype(&mut self.rng);
            self.generation.push(genotype);
        }
    }

    /// Evaluates every genotype exactly once and rebuilds the fitness records.
    pub fn calculate_fitness<F>(&mut self, fitness_fn: &F)
    where
        F: Fn(&Genotype<T>) -> f64 + Sync,
    {
        let scores = self.evaluate(fitness_fn);

        self.fitness = scores
            .iter()
            .enumerate()
            .map(|(index, &fitness)| FitnessRecord { fitness, index })
            .collect();

        if scores.is_empty() {
            self.best_achieved_fitness = 0.0;
            self.overall_fitness = 0.0;
            return;
        }

        self.best_achieved_fitness = scores
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, |acc, f| if f > acc { f } else { acc });
        self.overall_fitness = scores.iter().sum::<f64>() / scores.len() as f64;
    }

    #[cfg(feature = "parallel")]
    fn evaluate<F>(&self, fitness_fn: &F) -> Vec<f64>
    where
        F: Fn(&Genotype<T>) -> f64 + Sync,
    {
        if self.parallel {
            self.generation.par_iter().map(|g| fitness_fn(g)).collect()
        } else {
            self.generation.iter().map(fitness_fn).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate<F>(&self, fitness_fn: &F) -> Vec<f64>
    where
        F: Fn(&Genotype<T>) -> f64 + Sync,
    {
        self.generation.iter().map(fitness_fn).collect()
    }

    /// Keeps the fittest genotypes according to ranked group selection.
    ///
    /// Members are sorted by descending fitness (stable, NaN last), split
    /// into `ranking_groups` groups, and the head of each group survives.
    /// The generation is rebuilt from the survivors in rank order.
    pub fn make_selection<R>(&mut self, ranking_groups: usize, rank_fn: R)
    where
        R: Fn(usize) -> f64,
    {
        let mut records = std::mem::take(&mut self.fitness);
        records.sort_by(|a, b| rank_key(b.fitness).total_cmp(&rank_key(a.fitness)));
        let selected = split_by_groups_and_select(records, ranking_groups, rank_fn);

        let mut previous: Vec<Option<Genotype<T>>> = std::mem::take(&mut self.generation)
            .into_iter()
            .map(Some)
            .collect();

        let mut next = Vec::with_capacity(self.max_size);
        let mut fitness = Vec::with_capacity(self.max_size);
        for record in selected {
            if let Some(genotype) = previous.get_mut(record.index).and_then(Option::take) {
                fitness.push(FitnessRecord {
                    fitness: record.fitness,
                    index: next.len(),
                });
                next.push(genotype);
            }
        }

        trace!(survivors = next.len(), "selection complete");
        self.generation = next;
        self.fitness = fitness;
    }

    /// Breeds survivors back up to capacity.
    ///
    /// The first parent walks the survivors from the fittest onwards
    /// (wrapping over `0..survivors - 1`); the second parent is drawn
    /// uniformly from `[first + 1, survivors - 1]`. Each pair yields two
    /// children that are mutated independently; a final odd slot takes only
    /// the first child. With no mutation operators installed, children are
    /// left unmutated.
    pub fn reproduce(&mut self) -> Result<()> {
        let survivors = self.generation.len();
        if survivors >= self.max_size {
            return Ok(());
        }
        if survivors < 2 {
            return Err(GaError::InsufficientSurvivors { survivors });
        }

        let amount = self.max_size - survivors;
        let mutate = !self.model.mutations().is_empty();
        let mut first = 0;
        let mut produced = 0;

        while produced < amount {
            let second = self.rng.uniform(first + 1, survivors - 1);
            let (mut child1, mut child2) = self
                .model
                .crossover(&self.generation[first], &self.generation[second])?;

            if mutate {
                self.model.mutate(&mut child1)?;
                self.model.mutate(&mut child2)?;
            }

            self.generation.push(child1);
            produced += 1;
            if produced < amount {
                self.generation.push(child2);
                produced += 1;
            }

            first = (first + 1) % (survivors - 1);
        }

        trace!(children = amount, "reproduction complete");
        Ok(())
    }

    /// One generation step: evaluate, select, reproduce.
    pub fn evolve<F, R>(&mut self, fitness_fn: &F, rank_fn: R, ranking_groups: usize) -> Result<()>
    where
        F: Fn(&Genotype<T>) -> f64 + Sync,
        R: Fn(usize) -> f64,
    {
        self.calculate_fitness(fitness_fn);
        self.make_selection(ranking_groups, rank_fn);
        self.reproduce()
    }

    /// The genotype with the highest recorded fitness.
    ///
    /// `None` before the first evaluation.
    pub fn best_genotype(&self) -> Option<&Genotype<T>> {
        self.fitness
            .iter()
            .max_by(|a, b| rank_key(a.fitness).total_cmp(&rank_key(b.fitness)))
            .and_then(|record| self.generation.get(record.index))
    }
}
