//! Multi-objective genetic optimizer for depot-anchored vehicle routes.
//!
//! A [`Chromosome`] splits every non-depot stop among `n_buses` routes that
//! all start at the depot. Fitness is a pair of objectives, the costliest
//! single route and the sum of all routes, both minimized.
//!
//! # Key Types
//!
//! - [`Chromosome`]: Route set with cached [`Objectives`]
//! - [`Population`]: Selection, tournament crossover and mutation over a set of chromosomes
//! - [`OptimizerConfig`]: Population size, rates, fleet size, presets
//! - [`Optimizer`]: Executes the generational loop
//! - [`RunResult`]: Final population, Pareto front and per-generation history
//!
//! # Submodules
//!
//! - [`operators`]: Nearest-neighbour crossover and exchange mutation on route sets
//! - [`multi_objective`]: Non-dominated sorting and crowding distance
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Bektas (2006), *The multiple traveling salesman problem: an overview
//!   of formulations and solution procedures*

mod chromosome;
mod config;
pub mod multi_objective;
pub mod operators;
mod population;
mod route;
mod runner;
mod types;

pub use chromosome::Chromosome;
pub use config::OptimizerConfig;
pub use population::Population;
pub use route::Route;
pub use runner::{GenerationRecord, Optimizer, RunResult};
pub use types::{Direction, Objectives, StopId};
