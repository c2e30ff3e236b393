//! Genetic Algorithm framework.
//!
//! A generic GA over fixed-length numeric genotypes. Users describe their
//! problem with a [`GenotypeModel`] (per-gene ranges and mutation tuning
//! plus the operators to use), a fitness function (higher is better), and a
//! rank-distribution function that shapes selection.
//!
//! # Key Types
//!
//! - [`GenotypeModel`]: Gene parameters, crossover and mutation operators
//! - [`Population`]: One generation and its fitness records
//! - [`Algorithm`]: Executes the evolutionary loop against stop conditions
//! - [`GaConfig`]: Run parameters (population size, limits, ranking groups)
//! - [`Statistics`] / [`Observer`]: Per-generation progress reporting
//!
//! # Generation Step
//!
//! 1. Evaluate every genotype
//! 2. Sort by fitness, split into rank groups, keep the head of each group
//! 3. Breed survivors back to capacity with crossover and mutation
//!
//! # Submodules
//!
//! - [`operators`]: One-point crossover, random-value and shift mutations
//! - [`selection`]: Ranked group selection helpers
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

mod config;
mod error;
mod model;
pub mod operators;
mod population;
mod runner;
pub mod selection;
mod statistics;
mod types;

pub use config::GaConfig;
pub use error::{GaError, Result};
pub use model::GenotypeModel;
pub use operators::{Crossover, Mutation};
pub use population::{FitnessRecord, Population};
pub use runner::{Algorithm, AlgorithmState};
pub use statistics::{GenerationRecord, Observer, Statistics, StopReason, TracingObserver};
pub use types::{Gene, GeneParams, Genotype};
