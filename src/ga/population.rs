//! Population and the per-generation operators.
//!
//! A [`Population`] exposes the three steps a generation is made of:
//!
//! 1. [`natural_selection`](Population::natural_selection): merge the
//!    offspring pool, rank by Pareto front and crowding, keep `n_pop`
//! 2. [`binary_tournament`](Population::binary_tournament): crossover
//!    offspring from uniformly drawn parents
//! 3. [`mutation`](Population::mutation): mutated copies of population
//!    members and offspring
//!
//! The offspring and mutants together form the next call's offspring pool.
//! The population holds no other state between calls.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use super::chromosome::Chromosome;
use super::config::OptimizerConfig;
use super::multi_objective::selection_order;
use super::types::{Direction, Objectives};
use crate::distance::DistanceProvider;
use crate::error::MtspError;

/// A generation of chromosomes sharing one distance provider.
///
/// # Usage
///
/// ```
/// use std::sync::Arc;
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::ga::{OptimizerConfig, Population};
/// use u_mtsp::models::Stop;
/// use u_mtsp::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let stops = Stop::random_stops(12, 10..=500, 10..=500, &mut rng);
/// let provider = Arc::new(DistanceMatrix::from_stops(&stops));
/// let config = OptimizerConfig::default().with_population_size(20);
///
/// let mut population = Population::new(&config, provider, &mut rng).unwrap();
/// let mut pool = Vec::new();
/// for _ in 0..5 {
///     population.natural_selection(pool).unwrap();
///     let offspring = population.binary_tournament(&mut rng).unwrap();
///     let mutants = population.mutation(&offspring, &mut rng);
///     pool = offspring.into_iter().chain(mutants).collect();
/// }
/// assert_eq!(population.len(), 20);
/// ```
pub struct Population {
    members: Vec<Chromosome>,
    ranks: Vec<usize>,
    config: OptimizerConfig,
    provider: Arc<dyn DistanceProvider>,
}

impl Population {
    /// Creates `population_size` random chromosomes.
    ///
    /// # Errors
    ///
    /// [`MtspError::InvalidArgument`] if the configuration is invalid or the
    /// depot lies outside the provider's address space.
    pub fn new<R: Rng>(
        config: &OptimizerConfig,
        provider: Arc<dyn DistanceProvider>,
        rng: &mut R,
    ) -> Result<Self, MtspError> {
        config.validate_for(provider.size())?;

        let members = (0..config.population_size)
            .map(|_| {
                Chromosome::random(config.n_buses, config.start_position, provider.as_ref(), rng)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            members,
            ranks: Vec::new(),
            config: config.clone(),
            provider,
        })
    }

    /// Members in selection order (best first) after the first selection.
    pub fn members(&self) -> &[Chromosome] {
        &self.members
    }

    /// Pareto rank of each member from the last selection.
    ///
    /// Empty before the first call to
    /// [`natural_selection`](Self::natural_selection).
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    /// Members of the first front from the last selection.
    pub fn pareto_front(&self) -> impl Iterator<Item = &Chromosome> {
        self.members
            .iter()
            .zip(&self.ranks)
            .filter(|(_, rank)| **rank == 0)
            .map(|(c, _)| c)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn DistanceProvider> {
        &self.provider
    }

    /// Consumes the population, returning its members.
    pub fn into_members(self) -> Vec<Chromosome> {
        self.members
    }

    /// Replaces the population with the best `n_pop` of the population and
    /// `offspring` together.
    ///
    /// Every candidate is evaluated, sorted into strict-dominance fronts,
    /// and ordered by front, then by crowding distance (largest first).
    /// Afterwards the population holds `min(n_pop, candidates)` members.
    pub fn natural_selection(&mut self, offspring: Vec<Chromosome>) -> Result<(), MtspError> {
        let retained = self.members.len();
        let mut working = std::mem::take(&mut self.members);
        working.extend(offspring);

        if let Err(err) = evaluate_all(&mut working, self.provider.as_ref(), self.config.parallel) {
            // The previous population stays in place; offspring are dropped.
            working.truncate(retained);
            self.members = working;
            return Err(err);
        }

        let objectives: Vec<[f64; 2]> = working
            .iter()
            .map(|c| c.fitness().map(|f| f.as_array()))
            .collect::<Option<_>>()
            .ok_or_else(|| MtspError::structural("chromosome left unevaluated"))?;

        let order = selection_order(&objectives);
        let keep = self.config.population_size.min(order.len());

        let mut slots: Vec<Option<Chromosome>> = working.into_iter().map(Some).collect();
        self.members = order[..keep]
            .iter()
            .filter_map(|r| slots[r.index].take())
            .collect();
        self.ranks = order[..keep].iter().map(|r| r.rank).collect();

        debug!(
            candidates = objectives.len(),
            kept = keep,
            fronts = order.last().map_or(0, |r| r.rank + 1),
            first_front = self.ranks.iter().filter(|&&r| r == 0).count(),
            "natural selection"
        );

        Ok(())
    }

    /// Produces `floor(n_pop * crossover_rate)` offspring, rounded down to
    /// an even number.
    ///
    /// Each pair of parents is drawn uniformly with replacement and
    /// recombined with [`Direction::Successor`].
    pub fn binary_tournament<R: Rng>(&self, rng: &mut R) -> Result<Vec<Chromosome>, MtspError> {
        let pairs = self.config.offspring_count() / 2;
        let n = self.members.len();
        let mut offspring = Vec::with_capacity(pairs * 2);

        for _ in 0..pairs {
            let parent1 = &self.members[rng.random_range(0..n)];
            let parent2 = &self.members[rng.random_range(0..n)];
            let (child1, child2) = Chromosome::crossover(
                parent1,
                parent2,
                Direction::Successor,
                self.provider.as_ref(),
                rng,
            )?;
            offspring.push(child1);
            offspring.push(child2);
        }

        Ok(offspring)
    }

    /// Produces `floor(n_pop * mutation_rate)` mutants.
    ///
    /// Each mutant is a deep copy of a uniformly drawn member of the
    /// population or of `offspring`; the originals are never modified.
    pub fn mutation<R: Rng>(&self, offspring: &[Chromosome], rng: &mut R) -> Vec<Chromosome> {
        let count = self.config.mutant_count();
        let pool_size = self.members.len() + offspring.len();
        let mut mutants = Vec::with_capacity(count);

        for _ in 0..count {
            let idx = rng.random_range(0..pool_size);
            let source = if idx < self.members.len() {
                &self.members[idx]
            } else {
                &offspring[idx - self.members.len()]
            };

            let mut mutant = source.clone();
            mutant.mutate_with(self.config.mutation_exchanges, rng);
            mutants.push(mutant);
        }

        mutants
    }

    /// Objectives of the current members, in member order.
    ///
    /// Members that were never evaluated are skipped.
    pub fn objectives(&self) -> Vec<Objectives> {
        self.members.iter().filter_map(|c| c.fitness()).collect()
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all(
    members: &mut [Chromosome],
    provider: &dyn DistanceProvider,
    parallel: bool,
) -> Result<(), MtspError> {
    use rayon::prelude::*;

    if parallel {
        members
            .par_iter_mut()
            .try_for_each(|c| c.evaluate(provider).map(|_| ()))
    } else {
        members
            .iter_mut()
            .try_for_each(|c| c.evaluate(provider).map(|_| ()))
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(
    members: &mut [Chromosome],
    provider: &dyn DistanceProvider,
    _parallel: bool,
) -> Result<(), MtspError> {
    members
        .iter_mut()
        .try_for_each(|c| c.evaluate(provider).map(|_| ()))
}
