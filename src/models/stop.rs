//! Stop coordinates.

use rand::Rng;
use std::ops::RangeInclusive;

/// A stop location in the plane.
///
/// Stops carry no identity of their own: a stop's identifier is its index
/// in the slice handed to
/// [`DistanceMatrix::from_stops`](crate::distance::DistanceMatrix::from_stops).
///
/// # Examples
///
/// ```
/// use u_mtsp::models::Stop;
///
/// let a = Stop::new(0.0, 0.0);
/// let b = Stop::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    x: f64,
    y: f64,
}

/// Default coordinate range for generated instances.
pub const DEFAULT_COORDINATE_RANGE: RangeInclusive<i32> = 10..=500;

impl Stop {
    /// Creates a stop at the given coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another stop.
    pub fn distance_to(&self, other: &Stop) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Generates `n` stops with integer coordinates drawn uniformly from
    /// the given inclusive ranges.
    pub fn random_stops<R: Rng>(
        n: usize,
        x_range: RangeInclusive<i32>,
        y_range: RangeInclusive<i32>,
        rng: &mut R,
    ) -> Vec<Stop> {
        (0..n)
            .map(|_| {
                let x = rng.random_range(x_range.clone());
                let y = rng.random_range(y_range.clone());
                Stop::new(x as f64, y as f64)
            })
            .collect()
    }
}
