//! Multi-objective selection utilities.
//!
//! Pareto sorting and crowding distance in the style of NSGA-II, with two
//! deliberate differences from the textbook algorithm:
//!
//! - Dominance is **strict on every objective**: `a` dominates `b` only if
//!   `a` is better than `b` in all objectives. Solutions that tie on any
//!   objective land in the same front.
//! - Crowding distances are normalized by the objective range of the whole
//!   working set, not of the individual front.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: front assignment (Deb et al., 2002)
//! - [`crowding_distance`]: per-front diversity measure
//! - [`selection_order`]: fronts ascending, crowding descending
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Non-dominated sorting under strict dominance.
///
/// All objectives are **minimized**. Front 0 holds every solution no other
/// solution dominates; removing it and repeating yields the next fronts.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_mtsp::ga::multi_objective::non_dominated_sort;
///
/// let objectives = [
///     [1.0, 5.0], // A
///     [3.0, 3.0], // B
///     [4.0, 4.0], // C, dominated by B
///     [3.0, 4.5], // D, ties with B on the first objective
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 1, 0]);
/// ```
pub fn non_dominated_sort<const M: usize>(objectives: &[[f64; M]]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    let mut fronts = vec![front_0];
    loop {
        let current = fronts.last().expect("fronts is initialized with front_0; never empty");
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Dominance comparison result.
#[derive(Debug, PartialEq)]
enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compare two solutions for strict Pareto dominance (minimization).
fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    if a.iter().zip(b).all(|(va, vb)| va < vb) {
        Dominance::Left
    } else if a.iter().zip(b).all(|(va, vb)| vb < va) {
        Dominance::Right
    } else {
        Dominance::Neither
    }
}

/// Returns `true` if `a` is strictly better than `b` in every objective.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Per-objective `(min, max)` over all solutions.
///
/// Returns `(INFINITY, NEG_INFINITY)` pairs for an empty slice.
pub fn objective_bounds<const M: usize>(objectives: &[[f64; M]]) -> [(f64, f64); M] {
    let mut bounds = [(f64::INFINITY, f64::NEG_INFINITY); M];
    for obj in objectives {
        for (b, &v) in bounds.iter_mut().zip(obj) {
            b.0 = b.0.min(v);
            b.1 = b.1.max(v);
        }
    }
    bounds
}

/// Crowding distance of each member of one front.
///
/// For every objective the front is sorted by that objective; the two
/// boundary members get infinity and each interior member adds
/// `(above - below) / (max - min)`, with `max - min` taken from `bounds`
/// (the range over the whole working set). Objectives with zero range
/// contribute nothing to interior members.
///
/// Fronts of one or two members are all boundary.
///
/// # Returns
///
/// One distance per entry of `front`, in the same order.
///
/// # Example
///
/// ```
/// use u_mtsp::ga::multi_objective::{crowding_distance, objective_bounds};
///
/// let objectives = [[1.0, 5.0], [3.0, 3.0], [5.0, 1.0], [9.0, 9.0]];
/// let bounds = objective_bounds(&objectives);
///
/// let distances = crowding_distance(&objectives, &[0, 1, 2], &bounds);
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// // (5 - 1) / (9 - 1) per objective
/// assert!((distances[1] - 1.0).abs() < 1e-12);
/// ```
pub fn crowding_distance<const M: usize>(
    objectives: &[[f64; M]],
    front: &[usize],
    bounds: &[(f64, f64); M],
) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..M {
        // Positions within `front`, sorted by this objective
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            objectives[front[a]][obj_idx]
                .partial_cmp(&objectives[front[b]][obj_idx])
                .unwrap_or(Ordering::Equal)
        });

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let (min_val, max_val) = bounds[obj_idx];
        let range = max_val - min_val;

        if range > 0.0 {
            for i in 1..(n - 1) {
                let below = objectives[front[order[i - 1]]][obj_idx];
                let above = objectives[front[order[i + 1]]][obj_idx];
                distances[order[i]] += (above - below) / range;
            }
        }
    }

    distances
}

/// A solution's place in the selection order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedIndex {
    /// Index into the objectives slice.
    pub index: usize,

    /// Pareto front (0 = best).
    pub rank: usize,

    /// Summed crowding distance within the front.
    pub crowding: f64,
}

/// Orders all solutions for survivor selection.
///
/// Fronts come first in increasing rank; within a front, members with a
/// larger crowding distance (more isolated) come first. The sort is stable,
/// so equal crowding keeps the order of the input.
pub fn selection_order<const M: usize>(objectives: &[[f64; M]]) -> Vec<RankedIndex> {
    let sorted = non_dominated_sort(objectives);
    let bounds = objective_bounds(objectives);

    let mut order = Vec::with_capacity(objectives.len());
    for (rank, front) in sorted.fronts.iter().enumerate() {
        let distances = crowding_distance(objectives, front, &bounds);

        let mut members: Vec<RankedIndex> = front
            .iter()
            .zip(distances)
            .map(|(&index, crowding)| RankedIndex {
                index,
                rank,
                crowding,
            })
            .collect();
        members.sort_by(|a, b| b.crowding.partial_cmp(&a.crowding).unwrap_or(Ordering::Equal));

        order.extend(members);
    }

    order
}

// ============================================================================
// Tests
// ============================================================================
