//! Distance provider trait and dense in-memory matrix.

use crate::error::DistanceError;
use crate::ga::StopId;
use crate::models::Stop;

/// Pairwise travel cost lookup.
///
/// The optimizer depends only on this trait. Costs must be non-negative
/// and must not change during a run. Symmetry is not assumed.
///
/// Implementations must be safe for concurrent reads: fitness evaluation
/// may call [`cost`](DistanceProvider::cost) from several threads.
pub trait DistanceProvider: Send + Sync {
    /// Number of addressable stops, `0..size()`.
    fn size(&self) -> usize;

    /// Travel cost from `from` to `to`.
    fn cost(&self, from: StopId, to: StopId) -> Result<f64, DistanceError>;
}

/// A dense n×n distance matrix stored in row-major order.
///
/// # Examples
///
/// ```
/// use u_mtsp::distance::{DistanceMatrix, DistanceProvider};
/// use u_mtsp::models::Stop;
///
/// let stops = vec![Stop::new(0.0, 0.0), Stop::new(3.0, 4.0)];
/// let dm = DistanceMatrix::from_stops(&stops);
/// assert!((dm.cost(0, 1).unwrap() - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes the Euclidean distance matrix of the given stops.
    pub fn from_stops(stops: &[Stop]) -> Self {
        let n = stops.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = stops[i].distance_to(&stops[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a matrix from an explicit row-major grid.
    ///
    /// Fails if the length is not `size * size` or any entry is negative
    /// or not finite.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self, DistanceError> {
        if data.len() != size * size {
            return Err(DistanceError::MalformedMatrix(format!(
                "expected {} entries for a {size}x{size} matrix, got {}",
                size * size,
                data.len()
            )));
        }
        for (idx, &cost) in data.iter().enumerate() {
            if !cost.is_finite() {
                return Err(DistanceError::MalformedMatrix(format!(
                    "entry ({}, {}) is not finite",
                    idx / size,
                    idx % size
                )));
            }
            if cost < 0.0 {
                return Err(DistanceError::Negative {
                    from: idx / size,
                    to: idx % size,
                    cost,
                });
            }
        }
        Ok(Self { data, size })
    }

    /// Creates a matrix from a list of rows, as returned by matrix services.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DistanceError> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(DistanceError::MalformedMatrix(format!(
                "row {i} has {} entries, expected {size}",
                row.len()
            )));
        }
        Self::from_data(size, rows.into_iter().flatten().collect())
    }

    /// Returns the distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds. Use
    /// [`DistanceProvider::cost`] for a checked lookup.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Row-major entries.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

impl DistanceProvider for DistanceMatrix {
    fn size(&self) -> usize {
        self.size
    }

    fn cost(&self, from: StopId, to: StopId) -> Result<f64, DistanceError> {
        for stop in [from, to] {
            if stop >= self.size {
                return Err(DistanceError::UnknownStop {
                    stop,
                    size: self.size,
                });
            }
        }
        Ok(self.get(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stops() -> Vec<Stop> {
        vec![
            Stop::new(0.0, 0.0),
            Stop::new(3.0, 4.0),
            Stop::new(0.0, 8.0),
        ]
    }

    #[test]
    fn test_from_stops() {
        let dm = DistanceMatrix::from_stops(&sample_stops());
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!(dm.get(0, 0).abs() < 1e-10);
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 7.0, 0.0]).expect("valid");
        assert_eq!(dm.cost(0, 1).unwrap(), 5.0);
        assert_eq!(dm.cost(1, 0).unwrap(), 7.0);
        assert!(!dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(matches!(
            DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]),
            Err(DistanceError::MalformedMatrix(_))
        ));
    }

    #[test]
    fn test_from_data_negative() {
        assert!(matches!(
            DistanceMatrix::from_data(2, vec![0.0, -1.0, 1.0, 0.0]),
            Err(DistanceError::Negative { from: 0, to: 1, .. })
        ));
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(DistanceMatrix::from_rows(rows).is_err());
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![vec![0.0, 1.0], vec![2.0, 0.0]];
        let dm = DistanceMatrix::from_rows(rows).expect("square");
        assert_eq!(dm.get(1, 0), 2.0);
    }

    #[test]
    fn test_cost_out_of_range() {
        let dm = DistanceMatrix::new(3);
        assert!(matches!(
            dm.cost(0, 3),
            Err(DistanceError::UnknownStop { stop: 3, size: 3 })
        ));
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }
}
