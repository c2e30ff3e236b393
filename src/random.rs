//! Randomness provider.
//!
//! Every stochastic component of the GA owns its own [`RandomGenerator`]
//! instead of sharing global state, so operators can later be moved to
//! separate workers without synchronization.
//!
//! Generators are seeded once from the operating system (or from an explicit
//! seed for reproducible runs) and then driven by a fast non-cryptographic
//! PRNG ([`SmallRng`]).

use rand::distr::uniform::SampleUniform;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
///
/// Used by tests and by seeded runs.
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Per-component random source.
///
/// # Examples
///
/// ```
/// use ranked_ga::random::RandomGenerator;
///
/// let mut rg = RandomGenerator::seeded(7);
/// let v: i32 = rg.uniform(1, 6);
/// assert!((1..=6).contains(&v));
/// ```
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    rng: SmallRng,
}

impl RandomGenerator {
    /// Creates a generator seeded from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Creates a generator with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }

    /// Derives an independent child generator from this one.
    ///
    /// Deterministic when `self` is seeded.
    pub fn split(&mut self) -> Self {
        Self::seeded(self.rng.random())
    }

    /// Draws uniformly from the closed interval `[min, max]`.
    ///
    /// # Panics
    /// Panics if `min > max` or either bound is not finite. Gene parameters
    /// are validated at model construction so callers inside the crate never
    /// hit this.
    pub fn uniform<T>(&mut self, min: T, max: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        self.rng.random_range(min..=max)
    }

    /// Picks a uniformly random index into a collection of `len` elements.
    ///
    /// Returns `None` for an empty collection.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.random_range(0..len))
        }
    }

    /// Picks one element uniformly. Returns `None` for an empty slice.
    ///
    /// Hands out a shared borrow. When the picked element must be mutated
    /// afterwards (as with mutation operators, which own their generator),
    /// draw with [`pick_index`](Self::pick_index) and index instead.
    pub fn pick_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Bernoulli trial with success probability `p`, clamped to `[0, 1]`.
    ///
    /// NaN counts as zero.
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.random_bool(p)
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}
