//! Core value types shared by the genetic operators.

/// Index of a stop in the distance provider's address space.
pub type StopId = usize;

/// The two objectives of a solution. Both are minimized.
///
/// # Example
///
/// ```
/// use u_mtsp::ga::Objectives;
///
/// let f = Objectives::new(2.0, 5.0);
/// assert_eq!(f.as_array(), [2.0, 5.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objectives {
    /// Cost of the most expensive route.
    pub max_route_cost: f64,

    /// Sum of all route costs.
    pub total_cost: f64,
}

impl Objectives {
    pub fn new(max_route_cost: f64, total_cost: f64) -> Self {
        Self {
            max_route_cost,
            total_cost,
        }
    }

    /// Objective vector in `[f1, f2]` order.
    pub fn as_array(&self) -> [f64; 2] {
        [self.max_route_cost, self.total_cost]
    }
}

/// Which neighbour of the anchor stop crossover follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// The element after the anchor, wrapping to the first.
    #[default]
    Successor,

    /// The element before the anchor, wrapping to the last.
    Predecessor,
}
