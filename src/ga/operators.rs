//! Genetic operators for depot-delimited route encodings.
//!
//! These work on the raw representations (flat stop sequences and route
//! lists) and know nothing about caching or populations; see
//! [`Chromosome`](super::Chromosome) for the wrapped versions.
//!
//! # Crossover
//!
//! - [`nearest_neighbor_crossover`]: greedy recombination over the two
//!   parents' adjacency structure. Depot repeats ride along inside the
//!   sequence as route-boundary tokens, so visiting order and route
//!   assignment are recombined together.
//!
//! # Mutation
//!
//! - [`exchange_mutation`]: swap or relocate stops between random routes

use rand::seq::SliceRandom;
use rand::Rng;

use super::route::Route;
use super::types::{Direction, StopId};
use crate::distance::DistanceProvider;
use crate::error::MtspError;

/// Number of exchange attempts per mutation.
pub const DEFAULT_MUTATION_EXCHANGES: usize = 4;

// ============================================================================
// Crossover
// ============================================================================

/// Greedy nearest-neighbour crossover of two flat encodings.
///
/// Both parents must be encodings of the same configuration: depot first,
/// the depot repeated once per route, every other stop exactly once.
///
/// # Algorithm
///
/// 1. Drop the leading depot from each parent to get the working sequences
/// 2. Pick a random anchor `k` from parent 1's working sequence
/// 3. Until one element remains: take the neighbours `x`, `y` of `k` in
///    each working sequence (circular, in `direction`), remove `k` from
///    both, and continue from whichever of `x`, `y` is cheaper to reach
///    from `k` (ties go to `y`)
/// 4. The child is `[depot, k0, k1, ...]`; its sibling keeps the leading
///    depot and shuffles the rest
///
/// Removal is by value and takes the first occurrence, which matters only
/// for depot repeats.
///
/// # Errors
///
/// Propagates distance lookup failures. Returns
/// [`MtspError::StructuralViolation`] if the parents do not share a multiset
/// of elements.
///
/// # Panics
///
/// Panics if the parents have different lengths or are empty.
pub fn nearest_neighbor_crossover<D, R>(
    parent1: &[StopId],
    parent2: &[StopId],
    direction: Direction,
    provider: &D,
    rng: &mut R,
) -> Result<(Vec<StopId>, Vec<StopId>), MtspError>
where
    D: DistanceProvider + ?Sized,
    R: Rng,
{
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    assert!(!parent1.is_empty(), "parents must not be empty");

    let depot = parent1[0];
    let work1 = parent1[1..].to_vec();
    let work2 = parent2[1..].to_vec();

    // A lone depot: nothing to recombine.
    if work1.is_empty() {
        return Ok((parent1.to_vec(), parent1.to_vec()));
    }

    let anchor = work1[rng.random_range(0..work1.len())];
    let child = greedy_walk(work1, work2, depot, anchor, direction, provider)?;

    let mut sibling = child.clone();
    sibling[1..].shuffle(rng);

    Ok((child, sibling))
}

/// Builds the child sequence from a fixed anchor.
fn greedy_walk<D>(
    mut work1: Vec<StopId>,
    mut work2: Vec<StopId>,
    depot: StopId,
    anchor: StopId,
    direction: Direction,
    provider: &D,
) -> Result<Vec<StopId>, MtspError>
where
    D: DistanceProvider + ?Sized,
{
    let mut child = Vec::with_capacity(work1.len() + 1);
    child.push(depot);
    child.push(anchor);

    let mut k = anchor;
    while work1.len() > 1 {
        let x = neighbor(&work1, k, direction)?;
        let y = neighbor(&work2, k, direction)?;

        remove_first(&mut work1, k)?;
        remove_first(&mut work2, k)?;

        let next = if provider.cost(k, x)? < provider.cost(k, y)? {
            x
        } else {
            y
        };

        child.push(next);
        k = next;
    }

    Ok(child)
}

/// Element adjacent to the first occurrence of `k`, wrapping circularly.
fn neighbor(seq: &[StopId], k: StopId, direction: Direction) -> Result<StopId, MtspError> {
    let n = seq.len();
    let idx = position(seq, k)?;
    let adjacent = match direction {
        Direction::Successor => (idx + 1) % n,
        Direction::Predecessor => (idx + n - 1) % n,
    };
    Ok(seq[adjacent])
}

fn remove_first(seq: &mut Vec<StopId>, k: StopId) -> Result<(), MtspError> {
    let idx = position(seq, k)?;
    seq.remove(idx);
    Ok(())
}

fn position(seq: &[StopId], k: StopId) -> Result<usize, MtspError> {
    seq.iter().position(|&s| s == k).ok_or_else(|| {
        MtspError::structural(format!("stop {k} missing from crossover working sequence"))
    })
}

// ============================================================================
// Mutation
// ============================================================================

/// Perturbs routes in place with `attempts` random exchanges.
///
/// Each attempt picks two routes by index, with replacement:
///
/// - both have non-depot stops: swap one random stop between them
///   (within the route when both picks are the same route)
/// - only one has stops: move one of its stops to the end of the other
/// - neither has stops: skip
///
/// The depot position of every route is never touched, so the partition
/// is preserved.
pub fn exchange_mutation<R: Rng>(routes: &mut [Route], attempts: usize, rng: &mut R) {
    let n = routes.len();
    if n == 0 {
        return;
    }

    for _ in 0..attempts {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);

        if i == j {
            let route = &mut routes[i];
            if !route.is_idle() {
                let pos_a = rng.random_range(1..route.len());
                let pos_b = rng.random_range(1..route.len());
                route.swap_within(pos_a, pos_b);
            }
            continue;
        }

        let (a, b) = pair_mut(routes, i, j);
        match (a.is_idle(), b.is_idle()) {
            (false, false) => {
                let pos_a = rng.random_range(1..a.len());
                let pos_b = rng.random_range(1..b.len());
                Route::swap_between(a, pos_a, b, pos_b);
            }
            (false, true) => {
                let pos = rng.random_range(1..a.len());
                let stop = a.remove(pos);
                b.push(stop);
            }
            (true, false) => {
                let pos = rng.random_range(1..b.len());
                let stop = b.remove(pos);
                a.push(stop);
            }
            (true, true) => {}
        }
    }
}

/// Two distinct mutable routes.
fn pair_mut(routes: &mut [Route], i: usize, j: usize) -> (&mut Route, &mut Route) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = routes.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = routes.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

// ============================================================================
// Tests
// ============================================================================
