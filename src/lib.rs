//! Generic genetic algorithm with ranked group selection.
//!
//! Provides a small, single-objective GA engine:
//!
//! - **Genotype model**: per-gene value ranges and mutation tuning, with the
//!   crossover and mutation operators for the problem.
//! - **Population**: fitness evaluation, ranked group selection with
//!   group-proportional retention, and reproduction.
//! - **Algorithm driver**: the generation loop, stopping on a generation
//!   limit, a fitness cap, or a wall-clock time limit, and reporting
//!   per-generation statistics to observers.
//! - **Randomness provider**: per-component generators seeded from the
//!   operating system or from an explicit seed.
//!
//! # Architecture
//!
//! The crate contains no domain concepts. Problems plug in through a
//! fitness function over [`ga::Genotype`] values and a rank-distribution
//! function; everything else is generic over the gene type.

pub mod ga;
pub mod random;
