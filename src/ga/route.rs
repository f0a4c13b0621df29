//! Single-vehicle itinerary.

use super::types::StopId;
use crate::distance::DistanceProvider;
use crate::error::DistanceError;

/// One vehicle's ordered stops, always starting at the depot.
///
/// The cost covers consecutive legs only; the return leg to the depot is
/// not included.
///
/// # Examples
///
/// ```
/// use u_mtsp::ga::Route;
///
/// let mut route = Route::new(0);
/// route.push(3);
/// route.push(1);
/// assert_eq!(route.stops(), &[0, 3, 1]);
/// assert_eq!(route.customer_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    stops: Vec<StopId>,
}

impl Route {
    /// Creates a route holding only the depot.
    pub fn new(depot: StopId) -> Self {
        Self { stops: vec![depot] }
    }

    /// Builds a route from a depot-prefixed stop list.
    pub(crate) fn from_stops(stops: Vec<StopId>) -> Self {
        debug_assert!(!stops.is_empty(), "route must contain the depot");
        Self { stops }
    }

    /// Appends a stop at the end of the route.
    pub fn push(&mut self, stop: StopId) {
        self.stops.push(stop);
    }

    /// All stops, depot first.
    pub fn stops(&self) -> &[StopId] {
        &self.stops
    }

    pub fn depot(&self) -> StopId {
        self.stops[0]
    }

    /// Total number of elements including the depot.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always `false`: a route holds at least the depot.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of non-depot stops.
    pub fn customer_count(&self) -> usize {
        self.stops.len() - 1
    }

    /// Returns `true` if the route visits nothing but the depot.
    pub fn is_idle(&self) -> bool {
        self.stops.len() == 1
    }

    /// Exchanges the stops at two non-depot positions of two routes.
    pub(crate) fn swap_between(a: &mut Route, pos_a: usize, b: &mut Route, pos_b: usize) {
        debug_assert!(pos_a > 0 && pos_b > 0, "depot position is fixed");
        std::mem::swap(&mut a.stops[pos_a], &mut b.stops[pos_b]);
    }

    /// Swaps two non-depot positions within this route.
    pub(crate) fn swap_within(&mut self, pos_a: usize, pos_b: usize) {
        debug_assert!(pos_a > 0 && pos_b > 0, "depot position is fixed");
        self.stops.swap(pos_a, pos_b);
    }

    /// Removes and returns the stop at a non-depot position.
    pub(crate) fn remove(&mut self, pos: usize) -> StopId {
        debug_assert!(pos > 0, "depot position is fixed");
        self.stops.remove(pos)
    }

    /// Sum of leg costs along the route.
    pub fn cost<D: DistanceProvider + ?Sized>(&self, provider: &D) -> Result<f64, DistanceError> {
        self.stops
            .windows(2)
            .try_fold(0.0, |acc, leg| Ok(acc + provider.cost(leg[0], leg[1])?))
    }
}
