//! Domain model types.
//!
//! Stops are passive coordinate holders; the optimizer only ever sees
//! their indices through a [`DistanceProvider`](crate::distance::DistanceProvider).

mod stop;

pub use stop::{Stop, DEFAULT_COORDINATE_RANGE};
