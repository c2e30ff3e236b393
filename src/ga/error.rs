//! Error taxonomy for the GA.
//!
//! All variants are configuration errors: they are raised at model
//! construction or at [`Algorithm::run`](super::Algorithm::run) entry, never
//! in the middle of a generation.

/// Errors reported by the GA.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaError {
    #[error("genotype model must have at least one gene")]
    EmptyGenome,

    #[error("gene {index}: min_value must not exceed max_value and both must be finite with a finite span")]
    InvalidGeneRange { index: usize },

    #[error("gene {index}: increment and decrement must be finite")]
    InvalidMutationStep { index: usize },

    #[error("gene {index}: mutation probability multiplier must be finite and non-negative, got {value}")]
    InvalidMutationMultiplier { index: usize, value: f64 },

    #[error("gene index {index} out of range for genome of length {len}")]
    GeneIndexOutOfRange { index: usize, len: usize },

    #[error("no crossover operator configured")]
    MissingCrossover,

    #[error("no mutation operator configured")]
    MissingMutation,

    #[error("genome length {len} is too short for one-point crossover (need at least {min})")]
    GenomeTooShort { len: usize, min: usize },

    #[error("parents have different lengths: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("population_size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },

    #[error("ranking_groups must be at least 1")]
    ZeroRankingGroups,

    #[error("ranking_groups ({groups}) exceeds population size ({population})")]
    TooManyRankingGroups { groups: usize, population: usize },

    #[error("selection keeps {survivors} genotypes; at least 2 are needed to breed")]
    InsufficientSurvivors { survivors: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the GA module.
pub type Result<T> = std::result::Result<T, GaError>;
