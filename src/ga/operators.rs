//! Genetic operators over fixed-length numeric genotypes.
//!
//! The catalogue is small and closed, so operators are modelled as enums
//! dispatched by `match` rather than trait objects. Each operator instance
//! owns its own [`RandomGenerator`].
//!
//! # Crossover Operators
//!
//! - [`OnePointCrossover`]: split both parents at one interior point and swap tails
//!
//! # Mutation Operators
//!
//! - [`RandomValueMutation`]: redraw one gene uniformly from its range
//! - [`RandomValueShiftMutation`]: nudge one gene by its increment or decrement
//!
//! Both mutations touch exactly one gene per call and apply with probability
//! `base_probability × mutation_probability_multiplier` of the chosen gene.

use super::error::{GaError, Result};
use super::types::{clamp_gene, Gene, GeneParams, Genotype};
use crate::random::RandomGenerator;

/// Base probability used by the mutation constructors' `Default` impls.
pub const DEFAULT_MUTATION_PROBABILITY: f64 = 0.01;

/// Shortest genome one-point crossover accepts: the point is drawn from the
/// interior `[1, len - 2]`.
pub const MIN_ONE_POINT_LENGTH: usize = 3;

// ============================================================================
// Crossover operators
// ============================================================================

/// Splits two parents at `point` and swaps their tails.
///
/// `child1 = a[..point] ++ b[point..]`, `child2 = b[..point] ++ a[point..]`.
///
/// # Panics
/// Panics if `point` exceeds either parent's length.
pub fn one_point_crossover<T: Clone>(a: &[T], b: &[T], point: usize) -> (Vec<T>, Vec<T>) {
    let mut child1 = Vec::with_capacity(a.len());
    child1.extend_from_slice(&a[..point]);
    child1.extend_from_slice(&b[point..]);

    let mut child2 = Vec::with_capacity(b.len());
    child2.extend_from_slice(&b[..point]);
    child2.extend_from_slice(&a[point..]);

    (child1, child2)
}

/// One-point crossover with a uniformly drawn interior point.
#[derive(Debug, Clone, Default)]
pub struct OnePointCrossover {
    rng: RandomGenerator,
}

impl OnePointCrossover {
    /// Creates the operator with an entropy-seeded generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the operator with an explicit generator.
    pub fn with_rng(rng: RandomGenerator) -> Self {
        Self { rng }
    }

    /// Produces two children from equal-length parents.
    ///
    /// Fails with [`GaError::LengthMismatch`] or [`GaError::GenomeTooShort`].
    pub fn apply<T: Gene>(
        &mut self,
        a: &Genotype<T>,
        b: &Genotype<T>,
    ) -> Result<(Genotype<T>, Genotype<T>)> {
        if a.len() != b.len() {
            return Err(GaError::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }
        let len = a.len();
        if len < MIN_ONE_POINT_LENGTH {
            return Err(GaError::GenomeTooShort {
                len,
                min: MIN_ONE_POINT_LENGTH,
            });
        }

        let point = self.rng.uniform(1, len - 2);
        let (c1, c2) = one_point_crossover(a.genes(), b.genes(), point);
        Ok((Genotype::new(c1), Genotype::new(c2)))
    }
}

/// The crossover strategy installed on a genotype model.
#[derive(Debug, Clone)]
pub enum Crossover {
    OnePoint(OnePointCrossover),
}

impl Crossover {
    /// Shorthand for an entropy-seeded one-point crossover.
    pub fn one_point() -> Self {
        Crossover::OnePoint(OnePointCrossover::new())
    }

    /// Recombines two parents into two children.
    pub fn apply<T: Gene>(
        &mut self,
        a: &Genotype<T>,
        b: &Genotype<T>,
    ) -> Result<(Genotype<T>, Genotype<T>)> {
        match self {
            Crossover::OnePoint(op) => op.apply(a, b),
        }
    }

    /// Minimum genome length the operator supports.
    pub fn min_genome_len(&self) -> usize {
        match self {
            Crossover::OnePoint(_) => MIN_ONE_POINT_LENGTH,
        }
    }

    pub(crate) fn reseed(&mut self, rng: RandomGenerator) {
        match self {
            Crossover::OnePoint(op) => op.rng = rng,
        }
    }
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Replaces one gene with a fresh uniform draw from its range.
#[derive(Debug, Clone)]
pub struct RandomValueMutation {
    probability: f64,
    rng: RandomGenerator,
}

impl RandomValueMutation {
    /// Creates the operator with a base probability.
    pub fn new(probability: f64) -> Self {
        Self::with_rng(probability, RandomGenerator::new())
    }

    /// Creates the operator with an explicit generator.
    pub fn with_rng(probability: f64, rng: RandomGenerator) -> Self {
        Self { probability, rng }
    }

    /// Base probability before the per-gene multiplier.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Mutates one randomly chosen gene of `genotype` in place.
    pub fn apply<T: Gene>(&mut self, params: &[GeneParams<T>], genotype: &mut Genotype<T>) {
        let Some(index) = self.rng.pick_index(genotype.len()) else {
            return;
        };
        let Some(gene) = params.get(index) else {
            return;
        };
        if !self
            .rng
            .chance(self.probability * gene.mutation_probability_multiplier)
        {
            return;
        }
        genotype.genes_mut()[index] = self.rng.uniform(gene.min_value, gene.max_value);
    }
}

impl Default for RandomValueMutation {
    fn default() -> Self {
        Self::new(DEFAULT_MUTATION_PROBABILITY)
    }
}

/// Shifts one gene up by its increment or down by its decrement, then clamps.
#[derive(Debug, Clone)]
pub struct RandomValueShiftMutation {
    probability: f64,
    rng: RandomGenerator,
}

impl RandomValueShiftMutation {
    /// Creates the operator with a base probability.
    pub fn new(probability: f64) -> Self {
        Self::with_rng(probability, RandomGenerator::new())
    }

    /// Creates the operator with an explicit generator.
    pub fn with_rng(probability: f64, rng: RandomGenerator) -> Self {
        Self { probability, rng }
    }

    /// Base probability before the per-gene multiplier.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Shifts one randomly chosen gene of `genotype` in place.
    pub fn apply<T: Gene>(&mut self, params: &[GeneParams<T>], genotype: &mut Genotype<T>) {
        let Some(index) = self.rng.pick_index(genotype.len()) else {
            return;
        };
        let Some(gene) = params.get(index) else {
            return;
        };
        if !self
            .rng
            .chance(self.probability * gene.mutation_probability_multiplier)
        {
            return;
        }

        let value = genotype[index];
        let shifted = if self.rng.coin() {
            value.shift_up(gene.increment)
        } else {
            value.shift_down(gene.decrement)
        };
        genotype.genes_mut()[index] = clamp_gene(shifted, gene.min_value, gene.max_value);
    }
}

impl Default for RandomValueShiftMutation {
    fn default() -> Self {
        Self::new(DEFAULT_MUTATION_PROBABILITY)
    }
}

/// A mutation strategy installed on a genotype model.
#[derive(Debug, Clone)]
pub enum Mutation {
    RandomValue(RandomValueMutation),
    RandomValueShift(RandomValueShiftMutation),
}

impl Mutation {
    /// Shorthand for [`RandomValueMutation::new`].
    pub fn random_value(probability: f64) -> Self {
        Mutation::RandomValue(RandomValueMutation::new(probability))
    }

    /// Shorthand for [`RandomValueShiftMutation::new`].
    pub fn random_value_shift(probability: f64) -> Self {
        Mutation::RandomValueShift(RandomValueShiftMutation::new(probability))
    }

    /// Base probability of the wrapped operator.
    pub fn probability(&self) -> f64 {
        match self {
            Mutation::RandomValue(op) => op.probability(),
            Mutation::RandomValueShift(op) => op.probability(),
        }
    }

    /// Applies the wrapped operator.
    pub fn apply<T: Gene>(&mut self, params: &[GeneParams<T>], genotype: &mut Genotype<T>) {
        match self {
            Mutation::RandomValue(op) => op.apply(params, genotype),
            Mutation::RandomValueShift(op) => op.apply(params, genotype),
        }
    }

    pub(crate) fn reseed(&mut self, rng: RandomGenerator) {
        match self {
            Mutation::RandomValue(op) => op.rng = rng,
            Mutation::RandomValueShift(op) => op.rng = rng,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
