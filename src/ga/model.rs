//! Genotype model: per-gene parameters plus the installed operators.

use super::error::{GaError, Result};
use super::operators::{Crossover, Mutation};
use super::types::{Gene, GeneParams, Genotype};
use crate::random::RandomGenerator;
use tracing::{debug, instrument};

/// Describes a problem's genome and how it recombines and mutates.
///
/// Holds one [`GeneParams`] per gene position, at most one active
/// [`Crossover`], and any number of [`Mutation`]s. An empty mutation set is
/// allowed; offspring are then never mutated.
///
/// # Examples
///
/// ```
/// use ranked_ga::ga::{Crossover, GeneParams, GenotypeModel, Mutation};
///
/// let model = GenotypeModel::homogeneous(GeneParams::range(0i16, 2), 10)
///     .unwrap()
///     .with_crossover(Crossover::one_point())
///     .with_mutation(Mutation::random_value(0.05))
///     .with_mutation(Mutation::random_value_shift(0.05));
///
/// assert_eq!(model.genome_len(), 10);
/// assert_eq!(model.mutations().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GenotypeModel<T> {
    params: Vec<GeneParams<T>>,
    crossover: Option<Crossover>,
    mutations: Vec<Mutation>,
    rng: RandomGenerator,
}

impl<T: Gene> GenotypeModel<T> {
    /// Builds a model from explicit per-gene parameters.
    ///
    /// Fails on an empty genome or any invalid gene range.
    #[instrument(level = "debug", skip(params), fields(len = params.len()))]
    pub fn new(params: Vec<GeneParams<T>>) -> Result<Self> {
        if params.is_empty() {
            return Err(GaError::EmptyGenome);
        }
        for (index, p) in params.iter().enumerate() {
            p.validate(index)?;
        }
        debug!("genotype model created");

        Ok(Self {
            params,
            crossover: None,
            mutations: Vec::new(),
            rng: RandomGenerator::new(),
        })
    }

    /// Builds a model where every gene shares the same parameters.
    pub fn homogeneous(params: GeneParams<T>, len: usize) -> Result<Self> {
        Self::new(vec![params; len])
    }

    /// Installs `op` as the crossover strategy (builder form).
    pub fn with_crossover(mut self, op: Crossover) -> Self {
        self.set_crossover(op);
        self
    }

    /// Appends a mutation strategy (builder form).
    pub fn with_mutation(mut self, op: Mutation) -> Self {
        self.add_mutation(op);
        self
    }

    /// Replaces the active crossover strategy. Last write wins.
    pub fn set_crossover(&mut self, op: Crossover) {
        self.crossover = Some(op);
    }

    /// Appends a mutation strategy. Order carries no priority.
    pub fn add_mutation(&mut self, op: Mutation) {
        self.mutations.push(op);
    }

    /// Number of genes per genotype.
    pub fn genome_len(&self) -> usize {
        self.params.len()
    }

    /// Parameters of the gene at `index`.
    pub fn gene_params(&self, index: usize) -> Result<&GeneParams<T>> {
        self.params.get(index).ok_or(GaError::GeneIndexOutOfRange {
            index,
            len: self.params.len(),
        })
    }

    /// All gene parameters in position order.
    pub fn params(&self) -> &[GeneParams<T>] {
        &self.params
    }

    /// The active crossover strategy, if any.
    pub fn crossover_operator(&self) -> Option<&Crossover> {
        self.crossover.as_ref()
    }

    /// The installed mutation strategies.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Recombines two parents with the active crossover strategy.
    pub fn crossover(
        &mut self,
        a: &Genotype<T>,
        b: &Genotype<T>,
    ) -> Result<(Genotype<T>, Genotype<T>)> {
        match self.crossover.as_mut() {
            Some(op) => op.apply(a, b),
            None => Err(GaError::MissingCrossover),
        }
    }

    /// Applies one uniformly chosen mutation strategy to `genotype`.
    ///
    /// Whether the chosen gene actually changes is decided by the operator's
    /// base probability times the gene's multiplier.
    pub fn mutate(&mut self, genotype: &mut Genotype<T>) -> Result<()> {
        let index = self
            .rng
            .pick_index(self.mutations.len())
            .ok_or(GaError::MissingMutation)?;
        self.mutations[index].apply(&self.params, genotype);
        Ok(())
    }

    /// Builds a genotype with every gene drawn uniformly from its range.
    pub fn random_genotype(&self, rng: &mut RandomGenerator) -> Genotype<T> {
        let genes = self
            .params
            .iter()
            .map(|p| rng.uniform(p.min_value, p.max_value))
            .collect();
        Genotype::new(genes)
    }

    /// Whether `genotype` has the model's length and every gene is in range.
    pub fn contains(&self, genotype: &Genotype<T>) -> bool {
        genotype.len() == self.params.len()
            && genotype
                .iter()
                .zip(self.params.iter())
                .all(|(&v, p)| p.contains(v))
    }

    /// Checks that the model can breed: a crossover strategy is installed and
    /// the genome is long enough for it.
    pub fn validate_for_breeding(&self) -> Result<()> {
        let op = self.crossover.as_ref().ok_or(GaError::MissingCrossover)?;
        let min = op.min_genome_len();
        if self.params.len() < min {
            return Err(GaError::GenomeTooShort {
                len: self.params.len(),
                min,
            });
        }
        Ok(())
    }

    /// Reseeds the model and each operator from `source`.
    pub(crate) fn reseed(&mut self, source: &mut RandomGenerator) {
        self.rng = source.split();
        if let Some(op) = self.crossover.as_mut() {
            op.reseed(source.split());
        }
        for op in &mut self.mutations {
            op.reseed(source.split());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(len: usize) -> GenotypeModel<i32> {
        GenotypeModel::homogeneous(GeneParams::range(0, 9), len).expect("valid model")
    }

    #[test]
    fn test_empty_genome_rejected() {
        let err = GenotypeModel::<i32>::new(vec![]).unwrap_err();
        assert_eq!(err, GaError::EmptyGenome);
        assert!(GenotypeModel::homogeneous(GeneParams::range(0, 1), 0).is_err());
    }

    #[test]
    fn test_invalid_gene_reported_with_index() {
        let params = vec![GeneParams::range(0, 1), GeneParams::range(5, 2)];
        let err = GenotypeModel::new(params).unwrap_err();
        assert_eq!(err, GaError::InvalidGeneRange { index: 1 });
    }

    fn sample_every_gene<T: Gene>(min: T, max: T) {
        let mut m = GenotypeModel::homogeneous(GeneParams::range(min, max), 4)
            .expect("valid model")
            .with_mutation(Mutation::random_value_shift(1.0))
            .with_mutation(Mutation::random_value(1.0));
        let mut rng = RandomGenerator::seeded(11);
        for _ in 0..20 {
            let mut g = m.random_genotype(&mut rng);
            assert!(m.contains(&g));
            m.mutate(&mut g).expect("has mutations");
            assert!(m.contains(&g));
        }
    }

    #[test]
    fn test_model_over_every_gene_type() {
        sample_every_gene(-5i8, 5);
        sample_every_gene(-500i16, 500);
        sample_every_gene(i32::MIN, i32::MAX);
        sample_every_gene(i64::MIN, i64::MAX);
        sample_every_gene(0u8, u8::MAX);
        sample_every_gene(0u16, 9);
        sample_every_gene(0u32, u32::MAX);
        sample_every_gene(0u64, u64::MAX);
        sample_every_gene(0usize, 7);
        sample_every_gene(-1.0f32, 1.0);
        sample_every_gene(-1e300f64, 1e300);
    }

    #[test]
    fn test_non_finite_step_rejected() {
        let params = vec![
            GeneParams::range(0.0, 1.0),
            GeneParams::new(0.0, 1.0, f64::NAN, f64::NAN, 1.0),
        ];
        assert_eq!(
            GenotypeModel::new(params).unwrap_err(),
            GaError::InvalidMutationStep { index: 1 }
        );
    }

    #[test]
    fn test_unsampleable_real_range_rejected() {
        let err = GenotypeModel::homogeneous(GeneParams::range(f64::MIN, f64::MAX), 4).unwrap_err();
        assert_eq!(err, GaError::InvalidGeneRange { index: 0 });
    }

    #[test]
    fn test_gene_params_lookup() {
        let m = GenotypeModel::new(vec![GeneParams::range(0, 1), GeneParams::range(-3, 3)])
            .expect("valid");
        assert_eq!(m.gene_params(1).expect("in range").min_value, -3);
        assert_eq!(
            m.gene_params(2).unwrap_err(),
            GaError::GeneIndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_crossover_without_operator_fails() {
        let mut m = model(5);
        let g = Genotype::new(vec![0; 5]);
        assert_eq!(m.crossover(&g, &g).unwrap_err(), GaError::MissingCrossover);
        assert_eq!(m.validate_for_breeding().unwrap_err(), GaError::MissingCrossover);
    }

    #[test]
    fn test_mutate_without_operator_fails() {
        let mut m = model(5);
        let mut g = Genotype::new(vec![0; 5]);
        assert_eq!(m.mutate(&mut g).unwrap_err(), GaError::MissingMutation);
        assert_eq!(g.genes(), &[0; 5]);
    }

    #[test]
    fn test_set_crossover_last_write_wins() {
        let mut m = model(5);
        m.set_crossover(Crossover::one_point());
        m.set_crossover(Crossover::one_point());
        assert!(m.crossover_operator().is_some());
        assert!(m.validate_for_breeding().is_ok());
    }

    #[test]
    fn test_short_genome_cannot_breed() {
        let m = model(2).with_crossover(Crossover::one_point());
        assert_eq!(
            m.validate_for_breeding().unwrap_err(),
            GaError::GenomeTooShort { len: 2, min: 3 }
        );
    }

    #[test]
    fn test_random_genotype_respects_per_gene_ranges() {
        let m = GenotypeModel::new(vec![
            GeneParams::range(0.0, 1.0),
            GeneParams::range(10.0, 10.5),
            GeneParams::range(-4.0, -2.0),
        ])
        .expect("valid");
        let mut rng = RandomGenerator::seeded(42);
        for _ in 0..200 {
            let g = m.random_genotype(&mut rng);
            assert!(m.contains(&g), "out of range: {g:?}");
        }
    }

    #[test]
    fn test_mutate_stays_in_range() {
        let mut m = model(6)
            .with_mutation(Mutation::random_value(1.0))
            .with_mutation(Mutation::random_value_shift(1.0));
        m.reseed(&mut RandomGenerator::seeded(5));
        let mut g = Genotype::new(vec![9, 0, 9, 0, 9, 0]);
        for _ in 0..500 {
            m.mutate(&mut g).expect("has mutations");
            assert!(m.contains(&g));
        }
    }

    #[test]
    fn test_reseed_makes_model_deterministic() {
        let build = || {
            let mut m = model(10)
                .with_crossover(Crossover::one_point())
                .with_mutation(Mutation::random_value(1.0));
            m.reseed(&mut RandomGenerator::seeded(77));
            m
        };
        let mut a = build();
        let mut b = build();
        let p1 = Genotype::new((0..10).collect());
        let p2 = Genotype::new((0..10).rev().collect());
        for _ in 0..10 {
            let (mut a1, _) = a.crossover(&p1, &p2).expect("valid");
            let (mut b1, _) = b.crossover(&p1, &p2).expect("valid");
            a.mutate(&mut a1).expect("has mutations");
            b.mutate(&mut b1).expect("has mutations");
            assert_eq!(a1, b1);
        }
    }

    #[test]
    fn test_contains_rejects_wrong_length() {
        let m = model(3);
        assert!(!m.contains(&Genotype::new(vec![0, 0])));
        assert!(!m.contains(&Genotype::new(vec![0, 0, 10])));
        assert!(m.contains(&Genotype::new(vec![0, 9, 4])));
    }
}
