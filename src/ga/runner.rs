//! Generational driver.
//!
//! [`Optimizer`] runs the fixed generation loop over a [`Population`]:
//! selection → crossover offspring → mutants → next offspring pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use super::chromosome::Chromosome;
use super::config::OptimizerConfig;
use super::population::Population;
use super::types::Objectives;
use crate::distance::DistanceProvider;
use crate::error::MtspError;
use crate::random::create_rng;

/// Objectives of one population member after one selection.
///
/// This is the row format of the run history table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationRecord {
    pub generation: usize,

    /// Maximum route cost.
    pub objective_1: f64,

    /// Total route cost.
    pub objective_2: f64,
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Final population in selection order (best first).
    pub population: Vec<Chromosome>,

    /// Members of the final first front.
    pub pareto_front: Vec<Chromosome>,

    /// One record per member per selection.
    pub history: Vec<GenerationRecord>,

    /// Lowest maximum route cost after each selection, with its total cost.
    pub best_history: Vec<Objectives>,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped on the wall-clock limit.
    pub timed_out: bool,
}

impl RunResult {
    /// First member of the final population.
    pub fn best(&self) -> Option<&Chromosome> {
        self.population.first()
    }

    /// Member of the Pareto front with the lowest maximum route cost.
    pub fn best_max_route(&self) -> Option<&Chromosome> {
        best_by_max_route(&self.pareto_front)
    }
}

/// Executes the generational loop.
///
/// # Usage
///
/// ```
/// use std::sync::Arc;
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::ga::{Optimizer, OptimizerConfig};
/// use u_mtsp::models::Stop;
/// use u_mtsp::random::create_rng;
///
/// let stops = Stop::random_stops(15, 10..=500, 10..=500, &mut create_rng(1));
/// let provider = Arc::new(DistanceMatrix::from_stops(&stops));
/// let config = OptimizerConfig::default()
///     .with_population_size(30)
///     .with_max_generations(10)
///     .with_seed(42);
///
/// let result = Optimizer::run(&config, provider).unwrap();
/// assert_eq!(result.generations, 10);
/// assert!(!result.pareto_front.is_empty());
/// ```
pub struct Optimizer;

impl Optimizer {
    /// Runs the optimization for `max_generations` generations.
    pub fn run(
        config: &OptimizerConfig,
        provider: Arc<dyn DistanceProvider>,
    ) -> Result<RunResult, MtspError> {
        Self::run_with_cancel(config, provider, None)
    }

    /// Runs the optimization with an optional cancellation flag.
    ///
    /// If `cancel` is set, the loop stops before the next generation and
    /// returns the population selected so far.
    #[instrument(skip_all, fields(n_pop = config.population_size, n_buses = config.n_buses))]
    pub fn run_with_cancel(
        config: &OptimizerConfig,
        provider: Arc<dyn DistanceProvider>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult, MtspError> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let start = Instant::now();
        let mut population = Population::new(config, provider, &mut rng)?;

        let mut history = Vec::with_capacity(config.population_size * (config.max_generations + 1));
        let mut best_history = Vec::with_capacity(config.max_generations + 1);
        let mut pool: Vec<Chromosome> = Vec::new();
        let mut generations = 0;
        let mut cancelled = false;
        let mut timed_out = false;

        for generation in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if start.elapsed().as_millis() as u64 >= limit {
                    timed_out = true;
                    break;
                }
            }

            population.natural_selection(pool)?;
            record(&population, generation, &mut history, &mut best_history);

            let offspring = population.binary_tournament(&mut rng)?;
            let mutants = population.mutation(&offspring, &mut rng);
            pool = offspring.into_iter().chain(mutants).collect();

            generations = generation + 1;
        }

        // Fold the last offspring pool in so the result reflects it.
        population.natural_selection(pool)?;
        record(&population, generations, &mut history, &mut best_history);

        let pareto_front: Vec<Chromosome> = population.pareto_front().cloned().collect();
        if let Some(best) = best_history.last() {
            info!(
                generations,
                cancelled,
                timed_out,
                front = pareto_front.len(),
                max_route_cost = best.max_route_cost,
                total_cost = best.total_cost,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "optimization finished"
            );
        }

        Ok(RunResult {
            population: population.into_members(),
            pareto_front,
            history,
            best_history,
            generations,
            cancelled,
            timed_out,
        })
    }
}

/// Appends the population's objectives to the history.
fn record(
    population: &Population,
    generation: usize,
    history: &mut Vec<GenerationRecord>,
    best_history: &mut Vec<Objectives>,
) {
    let objectives = population.objectives();
    history.extend(objectives.iter().map(|o| GenerationRecord {
        generation,
        objective_1: o.max_route_cost,
        objective_2: o.total_cost,
    }));

    if let Some(best) = objectives.iter().copied().min_by(|a, b| cmp_max_route(a, b)) {
        debug!(
            generation,
            max_route_cost = best.max_route_cost,
            total_cost = best.total_cost,
            "generation"
        );
        best_history.push(best);
    }
}

fn cmp_max_route(a: &Objectives, b: &Objectives) -> std::cmp::Ordering {
    a.max_route_cost
        .total_cmp(&b.max_route_cost)
        .then(a.total_cost.total_cmp(&b.total_cost))
}

fn best_by_max_route(chromosomes: &[Chromosome]) -> Option<&Chromosome> {
    chromosomes
        .iter()
        .filter(|c| c.fitness().is_some())
        .min_by(|a, b| match (a.fitness(), b.fitness()) {
            (Some(fa), Some(fb)) => cmp_max_route(&fa, &fb),
            _ => std::cmp::Ordering::Equal,
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::Stop;

    fn provider(n: usize) -> Arc<dyn DistanceProvider> {
        let stops = Stop::random_stops(n, 10..=500, 10..=500, &mut create_rng(5));
        Arc::new(DistanceMatrix::from_stops(&stops))
    }

    fn config() -> OptimizerConfig {
        OptimizerConfig::default()
            .with_population_size(40)
            .with_max_generations(30)
            .with_n_buses(3)
            .with_seed(42)
    }

    #[test]
    fn test_run_completes() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let result = Optimizer::run(&config(), provider(20)).unwrap();

        assert_eq!(result.generations, 30);
        assert!(!result.cancelled);
        assert!(!result.timed_out);
        assert_eq!(result.population.len(), 40);
        assert!(result.population.iter().all(|c| c.check_partition().is_ok()));
        assert!(!result.pareto_front.is_empty());
        assert!(result.best().is_some());
        assert!(result.best_max_route().is_some());
    }

    #[test]
    fn test_history_shape() {
        let result = Optimizer::run(&config(), provider(20)).unwrap();

        // Selections at generations 0..30 plus the final fold.
        assert_eq!(result.best_history.len(), 31);
        assert_eq!(result.history.len(), 31 * 40);
        assert_eq!(result.history.first().map(|r| r.generation), Some(0));
        assert_eq!(result.history.last().map(|r| r.generation), Some(30));
        assert!(result
            .history
            .iter()
            .all(|r| r.objective_2 >= r.objective_1));
    }

    #[test]
    fn test_improves_over_random_start() {
        let result = Optimizer::run(&config().with_max_generations(60), provider(25)).unwrap();
        let first = result.best_history.first().unwrap();
        let last = result.best_history.last().unwrap();
        assert!(
            last.max_route_cost <= first.max_route_cost || last.total_cost <= first.total_cost,
            "expected progress on some objective: first={first:?}, last={last:?}"
        );
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = Optimizer::run(&config(), provider(15)).unwrap();
        let b = Optimizer::run(&config(), provider(15)).unwrap();
        assert_eq!(a.history, b.history);
        let enc_a: Vec<_> = a.population.iter().map(|c| c.encode()).collect();
        let enc_b: Vec<_> = b.population.iter().map(|c| c.encode()).collect();
        assert_eq!(enc_a, enc_b);
    }

    #[test]
    fn test_cancellation_before_start() {
        let cancel = Arc::new(AtomicBool::new(true));
        let result = Optimizer::run_with_cancel(&config(), provider(15), Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.population.len(), 40);
        assert_eq!(result.best_history.len(), 1);
    }

    #[test]
    fn test_cancellation_from_other_thread() {
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let cfg = config().with_max_generations(1_000_000);
        let result = Optimizer::run_with_cancel(&cfg, provider(15), Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert!(result.generations < 1_000_000);
    }

    #[test]
    fn test_time_limit() {
        let cfg = config()
            .with_max_generations(1_000_000)
            .with_time_limit_ms(20);
        let result = Optimizer::run(&cfg, provider(15)).unwrap();
        assert!(result.timed_out);
        assert!(result.generations < 1_000_000);
    }

    #[test]
    fn test_invalid_config() {
        let cfg = config().with_start_position(99);
        assert!(matches!(
            Optimizer::run(&cfg, provider(10)),
            Err(MtspError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_more_buses_than_stops() {
        let cfg = config().with_n_buses(8).with_max_generations(5);
        let result = Optimizer::run(&cfg, provider(4)).unwrap();
        assert!(result.population.iter().all(|c| c.n_buses() == 8));
        assert!(result.population.iter().all(|c| c.check_partition().is_ok()));
    }
}
