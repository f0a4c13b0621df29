//! Optimizer configuration.
//!
//! [`OptimizerConfig`] holds every parameter the population and the
//! generational driver read at construction time.

use super::operators::DEFAULT_MUTATION_EXCHANGES;
use super::types::StopId;
use crate::error::MtspError;

/// Configuration for the multi-objective genetic optimizer.
///
/// # Defaults
///
/// ```
/// use u_mtsp::ga::OptimizerConfig;
///
/// let config = OptimizerConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.n_buses, 2);
/// assert_eq!(config.start_position, 0);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_mtsp::ga::OptimizerConfig;
///
/// let config = OptimizerConfig::default()
///     .with_population_size(500)
///     .with_n_buses(3)
///     .with_crossover_rate(0.4)
///     .with_mutation_rate(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    /// Number of chromosomes kept after each selection (`n_pop`).
    pub population_size: usize,

    /// Number of generations the driver runs.
    pub max_generations: usize,

    /// Fraction of `population_size` produced as crossover offspring
    /// per generation (0.0–1.0).
    pub crossover_rate: f64,

    /// Fraction of `population_size` produced as mutants per generation
    /// (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of vehicles, i.e. routes per chromosome.
    pub n_buses: usize,

    /// Depot stop shared by every route.
    pub start_position: StopId,

    /// Exchange attempts applied by one mutation.
    pub mutation_exchanges: usize,

    /// Whether to evaluate fitness in parallel using rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so a run may overshoot by
    /// up to one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 100,
            crossover_rate: 0.4,
            mutation_rate: 0.2,
            n_buses: 2,
            start_position: 0,
            mutation_exchanges: DEFAULT_MUTATION_EXCHANGES,
            parallel: false,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl OptimizerConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate. Out-of-range values fail validation.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate. Out-of-range values fail validation.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of vehicles.
    pub fn with_n_buses(mut self, n: usize) -> Self {
        self.n_buses = n;
        self
    }

    /// Sets the depot stop.
    pub fn with_start_position(mut self, stop: StopId) -> Self {
        self.start_position = stop;
        self
    }

    /// Sets the exchange attempts per mutation.
    pub fn with_mutation_exchanges(mut self, n: usize) -> Self {
        self.mutation_exchanges = n;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick runs on small instances.
    ///
    /// - Population: 50, Generations: 50, Time limit: 10s
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 50,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Preset balancing solution quality and run time.
    ///
    /// - Population: 200, Generations: 100, Time limit: 30s
    pub fn balanced() -> Self {
        Self {
            population_size: 200,
            max_generations: 100,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for large instances.
    ///
    /// - Population: 1000, Generations: 200, Time limit: 120s, parallel
    pub fn quality() -> Self {
        Self {
            population_size: 1000,
            max_generations: 200,
            time_limit_ms: Some(120_000),
            parallel: true,
            ..Self::default()
        }
    }

    /// Selects a preset by instance size.
    ///
    /// - `stop_count < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ stop_count < 200` → [`balanced()`](Self::balanced)
    /// - `stop_count ≥ 200` → [`quality()`](Self::quality)
    pub fn auto_select(stop_count: usize) -> Self {
        if stop_count < 50 {
            Self::fast()
        } else if stop_count < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Crossover offspring per generation: `floor(n_pop * crossover_rate)`.
    pub fn offspring_count(&self) -> usize {
        (self.population_size as f64 * self.crossover_rate).floor() as usize
    }

    /// Mutants per generation: `floor(n_pop * mutation_rate)`.
    pub fn mutant_count(&self) -> usize {
        (self.population_size as f64 * self.mutation_rate).floor() as usize
    }

    /// Validates the configuration independently of any instance.
    pub fn validate(&self) -> Result<(), MtspError> {
        if self.population_size == 0 {
            return Err(MtspError::invalid("population_size must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(MtspError::invalid("max_generations must be at least 1"));
        }
        if self.n_buses == 0 {
            return Err(MtspError::invalid("n_buses must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(MtspError::invalid(format!(
                "crossover_rate must be within [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(MtspError::invalid(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.time_limit_ms == Some(0) {
            return Err(MtspError::invalid("time_limit_ms must be positive or None"));
        }
        Ok(())
    }

    /// Validates the configuration against an instance of `stop_count` stops.
    pub fn validate_for(&self, stop_count: usize) -> Result<(), MtspError> {
        self.validate()?;
        if self.start_position >= stop_count {
            return Err(MtspError::invalid(format!(
                "start_position {} is outside the {stop_count} available stops",
                self.start_position
            )));
        }
        Ok(())
    }
}
