//! Core value types: gene values, gene parameters, and the genotype.
//!
//! [`Gene`] is the contract between the generic GA engine and the numeric
//! type stored at each gene position. Built-in implementations exist for
//! `i8`..`i64`, `u8`..`u64`, `usize`, `f32` and `f64`.

use super::error::{GaError, Result};
use rand::distr::uniform::SampleUniform;
use std::ops::{Deref, Index};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A numeric gene value.
///
/// Genes must be uniformly sampleable over a closed range, ordered, and
/// support the bounded increment/decrement used by shift mutation.
pub trait Gene: SampleUniform + PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// The default mutation step (`1` for integers, `1.0` for reals).
    fn unit() -> Self;

    /// `self + by`, saturating at the type's limits for integers.
    fn shift_up(self, by: Self) -> Self;

    /// `self - by`, saturating at the type's limits for integers.
    fn shift_down(self, by: Self) -> Self;

    /// Whether the value can bound a uniform range.
    fn is_finite(self) -> bool {
        true
    }

    /// Whether `max - min` is representable, so the range can be sampled.
    fn span_is_finite(_min: Self, _max: Self) -> bool {
        true
    }
}

macro_rules! impl_integer_gene {
    ($($t:ty),* $(,)?) => {
        $(
            impl Gene for $t {
                fn unit() -> Self {
                    1
                }

                fn shift_up(self, by: Self) -> Self {
                    self.saturating_add(by)
                }

                fn shift_down(self, by: Self) -> Self {
                    self.saturating_sub(by)
                }
            }
        )*
    };
}

impl_integer_gene!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

macro_rules! impl_real_gene {
    ($($t:ty),* $(,)?) => {
        $(
            impl Gene for $t {
                fn unit() -> Self {
                    1.0
                }

                fn shift_up(self, by: Self) -> Self {
                    self + by
                }

                fn shift_down(self, by: Self) -> Self {
                    self - by
                }

                fn is_finite(self) -> bool {
                    <$t>::is_finite(self)
                }

                fn span_is_finite(min: Self, max: Self) -> bool {
                    (max - min).is_finite()
                }
            }
        )*
    };
}

impl_real_gene!(f32, f64);

/// Clamps `value` into `[min, max]`.
pub(crate) fn clamp_gene<T: Gene>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Legal range and mutation tuning for one gene position.
///
/// Fixed when the [`GenotypeModel`](super::GenotypeModel) is built and
/// read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneParams<T> {
    /// Smallest legal value (inclusive).
    pub min_value: T,
    /// Largest legal value (inclusive).
    pub max_value: T,
    /// Step added by shift mutation on heads.
    pub increment: T,
    /// Step subtracted by shift mutation on tails.
    pub decrement: T,
    /// Scales each mutation operator's base probability for this gene.
    pub mutation_probability_multiplier: f64,
}

impl<T: Gene> GeneParams<T> {
    /// Creates fully specified gene parameters.
    pub fn new(
        min_value: T,
        max_value: T,
        increment: T,
        decrement: T,
        mutation_probability_multiplier: f64,
    ) -> Self {
        Self {
            min_value,
            max_value,
            increment,
            decrement,
            mutation_probability_multiplier,
        }
    }

    /// Range-only parameters: unit steps and a multiplier of `1.0`.
    pub fn range(min_value: T, max_value: T) -> Self {
        Self::new(min_value, max_value, T::unit(), T::unit(), 1.0)
    }

    /// Checks `min <= max`, finiteness of bounds, span and steps, and a
    /// usable multiplier.
    pub(crate) fn validate(&self, index: usize) -> Result<()> {
        let range_ok = self.min_value.is_finite()
            && self.max_value.is_finite()
            && self.min_value <= self.max_value
            && T::span_is_finite(self.min_value, self.max_value);
        if !range_ok {
            return Err(GaError::InvalidGeneRange { index });
        }
        if !self.increment.is_finite() || !self.decrement.is_finite() {
            return Err(GaError::InvalidMutationStep { index });
        }
        let m = self.mutation_probability_multiplier;
        if !m.is_finite() || m < 0.0 {
            return Err(GaError::InvalidMutationMultiplier { index, value: m });
        }
        Ok(())
    }

    /// Whether `value` lies within `[min_value, max_value]`.
    pub fn contains(&self, value: T) -> bool {
        self.min_value <= value && value <= self.max_value
    }
}

/// One candidate solution: a fixed-length sequence of gene values.
///
/// The length is set at construction and never changes; operators may
/// rewrite values in place through [`genes_mut`](Genotype::genes_mut) but
/// cannot resize.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Genotype<T> {
    genes: Vec<T>,
}

impl<T> Genotype<T> {
    /// Wraps a gene vector.
    pub fn new(genes: Vec<T>) -> Self {
        Self { genes }
    }

    /// Gene values in position order.
    pub fn genes(&self) -> &[T] {
        &self.genes
    }

    /// Mutable view of the gene values.
    pub fn genes_mut(&mut self) -> &mut [T] {
        &mut self.genes
    }

    /// Consumes the genotype, returning its genes.
    pub fn into_genes(self) -> Vec<T> {
        self.genes
    }
}

impl<T> Deref for Genotype<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.genes
    }
}

impl<T> Index<usize> for Genotype<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.genes[index]
    }
}

impl<T> From<Vec<T>> for Genotype<T> {
    fn from(genes: Vec<T>) -> Self {
        Self::new(genes)
    }
}
