//! Multi-vehicle TSP optimization with a multi-objective genetic algorithm.
//!
//! A fleet of vehicles leaves a shared depot and together visits every
//! stop exactly once. Solutions are ranked on two objectives at once:
//!
//! - **f1**: cost of the most expensive single route (balance)
//! - **f2**: total cost of all routes (efficiency)
//!
//! # Modules
//!
//! - [`ga`]: Chromosomes, population, selection and the generational driver
//! - [`distance`]: The [`DistanceProvider`](distance::DistanceProvider)
//!   abstraction with in-memory and remote implementations
//! - [`models`]: Stop coordinates and random instance generation
//! - [`report`]: CSV/JSON export of run results (feature `report`)
//!
//! # Features
//!
//! - `parallel`: rayon-based fitness evaluation
//! - `serde`: `Serialize`/`Deserialize` on public data types
//! - `report`: history and solution export
//! - `remote`: distance matrix fetched from an HTTP routing service

pub mod distance;
pub mod error;
pub mod ga;
pub mod models;
pub mod random;
#[cfg(feature = "report")]
pub mod report;

pub use error::{DistanceError, MtspError};
