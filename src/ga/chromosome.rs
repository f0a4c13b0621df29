//! Multi-vehicle solution representation.
//!
//! A [`Chromosome`] holds one [`Route`] per vehicle. Every non-depot stop
//! of the provider's address space appears in exactly one route, exactly
//! once; every route starts at the depot.
//!
//! # Encoding
//!
//! [`encode`](Chromosome::encode) concatenates the routes, so the depot
//! appears once per route and acts as a route boundary:
//!
//! ```text
//! [[0, 2, 3], [0, 4, 1]]  <->  [0, 2, 3, 0, 4, 1]
//! ```

use rand::Rng;

use super::operators::{exchange_mutation, nearest_neighbor_crossover, DEFAULT_MUTATION_EXCHANGES};
use super::route::Route;
use super::types::{Direction, Objectives, StopId};
use crate::distance::DistanceProvider;
use crate::error::MtspError;

/// A candidate solution: one route per vehicle plus cached objectives.
///
/// # Examples
///
/// ```
/// use u_mtsp::distance::DistanceMatrix;
/// use u_mtsp::ga::Chromosome;
/// use u_mtsp::random::create_rng;
///
/// let dm = DistanceMatrix::new(6);
/// let mut rng = create_rng(42);
/// let c = Chromosome::random(2, 0, &dm, &mut rng).unwrap();
/// assert_eq!(c.n_buses(), 2);
/// assert_eq!(c.encode().len(), 2 + 5);
/// assert!(c.fitness().is_none());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome {
    routes: Vec<Route>,
    depot: StopId,
    stop_count: usize,
    fitness: Option<Objectives>,
}

impl Chromosome {
    /// Creates a chromosome with a uniformly random partition.
    ///
    /// Every route starts as the lone depot; unvisited stops are drawn
    /// uniformly and appended to a uniformly chosen route until none remain.
    ///
    /// # Errors
    ///
    /// [`MtspError::InvalidArgument`] if `n_buses` is zero or the depot is
    /// outside the provider's address space.
    pub fn random<D, R>(
        n_buses: usize,
        depot: StopId,
        provider: &D,
        rng: &mut R,
    ) -> Result<Self, MtspError>
    where
        D: DistanceProvider + ?Sized,
        R: Rng,
    {
        let stop_count = provider.size();
        check_configuration(n_buses, depot, stop_count)?;

        let mut routes = vec![Route::new(depot); n_buses];
        let mut unvisited: Vec<StopId> = (0..stop_count).filter(|&s| s != depot).collect();

        while !unvisited.is_empty() {
            let stop = unvisited.swap_remove(rng.random_range(0..unvisited.len()));
            let route = rng.random_range(0..n_buses);
            routes[route].push(stop);
        }

        Ok(Self {
            routes,
            depot,
            stop_count,
            fitness: None,
        })
    }

    /// Decodes and validates a flat encoding.
    ///
    /// Unlike [`decode`](Self::decode), this checks the full partition.
    pub fn from_encoded(
        encoded: &[StopId],
        n_buses: usize,
        depot: StopId,
        stop_count: usize,
    ) -> Result<Self, MtspError> {
        check_configuration(n_buses, depot, stop_count)?;
        let chromosome = Self {
            routes: decode_routes(encoded, n_buses, depot)?,
            depot,
            stop_count,
            fitness: None,
        };
        chromosome.check_partition()?;
        Ok(chromosome)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn n_buses(&self) -> usize {
        self.routes.len()
    }

    pub fn depot(&self) -> StopId {
        self.depot
    }

    /// Size of the stop address space, depot included.
    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    /// Cached objectives, `None` until evaluated.
    pub fn fitness(&self) -> Option<Objectives> {
        self.fitness
    }

    /// Drops the cached objectives.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Returns the cached objectives, computing them first if needed.
    ///
    /// `max_route_cost` is the most expensive route, `total_cost` the sum
    /// over all routes. A failed lookup leaves the cache empty.
    pub fn evaluate<D>(&mut self, provider: &D) -> Result<Objectives, MtspError>
    where
        D: DistanceProvider + ?Sized,
    {
        if let Some(fitness) = self.fitness {
            return Ok(fitness);
        }

        let mut max_route_cost = 0.0f64;
        let mut total_cost = 0.0;
        for route in &self.routes {
            let cost = route.cost(provider)?;
            max_route_cost = max_route_cost.max(cost);
            total_cost += cost;
        }

        let fitness = Objectives::new(max_route_cost, total_cost);
        self.fitness = Some(fitness);
        Ok(fitness)
    }

    /// Flattens the routes in order. Length is `n_buses + stop_count - 1`.
    pub fn encode(&self) -> Vec<StopId> {
        let mut flat = Vec::with_capacity(self.n_buses() + self.stop_count.saturating_sub(1));
        for route in &self.routes {
            flat.extend_from_slice(route.stops());
        }
        flat
    }

    /// Rebuilds a chromosome with this one's configuration from a flat
    /// encoding.
    ///
    /// Each depot occurrence opens a new route. This is a structural
    /// transform: it rejects sequences that do not start with the depot or
    /// do not hold exactly `n_buses` depots, but does not re-check the stop
    /// set (see [`check_partition`](Self::check_partition)).
    pub fn decode(&self, encoded: &[StopId]) -> Result<Chromosome, MtspError> {
        Ok(Self {
            routes: decode_routes(encoded, self.n_buses(), self.depot)?,
            depot: self.depot,
            stop_count: self.stop_count,
            fitness: None,
        })
    }

    /// Applies [`DEFAULT_MUTATION_EXCHANGES`] random exchanges.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) {
        self.mutate_with(DEFAULT_MUTATION_EXCHANGES, rng);
    }

    /// Applies `attempts` random exchanges and invalidates the fitness.
    pub fn mutate_with<R: Rng>(&mut self, attempts: usize, rng: &mut R) {
        exchange_mutation(&mut self.routes, attempts, rng);
        self.invalidate();
    }

    /// Recombines two parents into two children.
    ///
    /// The children share `parent1`'s configuration. See
    /// [`nearest_neighbor_crossover`] for the algorithm.
    pub fn crossover<D, R>(
        parent1: &Chromosome,
        parent2: &Chromosome,
        direction: Direction,
        provider: &D,
        rng: &mut R,
    ) -> Result<(Chromosome, Chromosome), MtspError>
    where
        D: DistanceProvider + ?Sized,
        R: Rng,
    {
        let (encoded1, encoded2) = nearest_neighbor_crossover(
            &parent1.encode(),
            &parent2.encode(),
            direction,
            provider,
            rng,
        )?;

        let child1 = parent1.decode(&encoded1)?;
        let child2 = parent1.decode(&encoded2)?;
        debug_assert!(child1.check_partition().is_ok());
        debug_assert!(child2.check_partition().is_ok());

        Ok((child1, child2))
    }

    /// Verifies the partition invariant.
    ///
    /// Every route starts at the depot, and every non-depot stop in
    /// `0..stop_count` appears exactly once across all routes.
    pub fn check_partition(&self) -> Result<(), MtspError> {
        let mut seen = vec![false; self.stop_count];

        for (r, route) in self.routes.iter().enumerate() {
            if route.is_empty() || route.depot() != self.depot {
                return Err(MtspError::structural(format!(
                    "route {r} does not start at depot {}",
                    self.depot
                )));
            }
            for &stop in &route.stops()[1..] {
                if stop == self.depot || stop >= self.stop_count {
                    return Err(MtspError::structural(format!(
                        "route {r} contains invalid stop {stop}"
                    )));
                }
                if std::mem::replace(&mut seen[stop], true) {
                    return Err(MtspError::structural(format!("stop {stop} visited twice")));
                }
            }
        }

        match (0..self.stop_count).find(|&s| s != self.depot && !seen[s]) {
            Some(missing) => Err(MtspError::structural(format!(
                "stop {missing} is not visited"
            ))),
            None => Ok(()),
        }
    }
}

fn check_configuration(n_buses: usize, depot: StopId, stop_count: usize) -> Result<(), MtspError> {
    if n_buses == 0 {
        return Err(MtspError::invalid("n_buses must be at least 1"));
    }
    if depot >= stop_count {
        return Err(MtspError::invalid(format!(
            "depot {depot} is outside the {stop_count} available stops"
        )));
    }
    Ok(())
}

/// Splits a flat encoding at depot occurrences.
fn decode_routes(
    encoded: &[StopId],
    n_buses: usize,
    depot: StopId,
) -> Result<Vec<Route>, MtspError> {
    if encoded.first() != Some(&depot) {
        return Err(MtspError::structural(format!(
            "encoding must start with depot {depot}"
        )));
    }
    let depots = encoded.iter().filter(|&&s| s == depot).count();
    if depots != n_buses {
        return Err(MtspError::structural(format!(
            "encoding holds {depots} depot occurrences, expected {n_buses}"
        )));
    }

    let mut routes: Vec<Route> = Vec::with_capacity(n_buses);
    let mut current: Vec<StopId> = Vec::new();
    for &stop in encoded {
        if stop == depot && !current.is_empty() {
            routes.push(Route::from_stops(std::mem::take(&mut current)));
        }
        current.push(stop);
    }
    routes.push(Route::from_stops(current));

    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn line_matrix(n: usize) -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                dm.set(i, j, (i as f64 - j as f64).abs());
            }
        }
        dm
    }

    fn from_routes(routes: &[&[StopId]], stop_count: usize) -> Chromosome {
        let flat: Vec<StopId> = routes.iter().flat_map(|r| r.iter().copied()).collect();
        Chromosome::from_encoded(&flat, routes.len(), routes[0][0], stop_count).unwrap()
    }

    fn stops_of(c: &Chromosome) -> Vec<Vec<StopId>> {
        c.routes().iter().map(|r| r.stops().to_vec()).collect()
    }

    #[test]
    fn test_fitness_scenario() {
        // Route costs are 2 and 3.
        let dm = line_matrix(4);
        let mut c = from_routes(&[&[0, 1, 2], &[0, 3]], 4);
        let f = c.evaluate(&dm).unwrap();
        assert_eq!(f.max_route_cost, 3.0);
        assert_eq!(f.total_cost, 5.0);
    }

    #[test]
    fn test_fitness_ignores_return_leg() {
        let dm = line_matrix(5);
        let mut c = from_routes(&[&[0, 4, 3], &[0, 1, 2]], 5);
        let f = c.evaluate(&dm).unwrap();
        assert_eq!(f.max_route_cost, 5.0);
        assert_eq!(f.total_cost, 7.0);
    }

    #[test]
    fn test_evaluate_is_cached_until_invalidated() {
        let mut dm = line_matrix(4);
        let mut c = from_routes(&[&[0, 1, 2], &[0, 3]], 4);
        let first = c.evaluate(&dm).unwrap();

        dm.set(0, 3, 100.0);
        assert_eq!(c.evaluate(&dm).unwrap(), first);

        c.invalidate();
        assert!(c.fitness().is_none());
        assert_eq!(c.evaluate(&dm).unwrap().total_cost, 102.0);
    }

    #[test]
    fn test_mutation_resets_fitness() {
        let dm = line_matrix(6);
        let mut rng = create_rng(42);
        let mut c = Chromosome::random(2, 0, &dm, &mut rng).unwrap();
        c.evaluate(&dm).unwrap();
        c.mutate(&mut rng);
        assert!(c.fitness().is_none());
        assert!(c.check_partition().is_ok());
    }

    #[test]
    fn test_random_invalid_arguments() {
        let dm = line_matrix(4);
        let mut rng = create_rng(42);
        assert!(matches!(
            Chromosome::random(0, 0, &dm, &mut rng),
            Err(MtspError::InvalidArgument(_))
        ));
        assert!(matches!(
            Chromosome::random(2, 4, &dm, &mut rng),
            Err(MtspError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_random_with_non_zero_depot() {
        let dm = line_matrix(5);
        let mut rng = create_rng(9);
        let c = Chromosome::random(3, 2, &dm, &mut rng).unwrap();
        assert!(c.routes().iter().all(|r| r.depot() == 2));
        assert!(c.check_partition().is_ok());
    }

    #[test]
    fn test_more_buses_than_stops() {
        let dm = line_matrix(3);
        let mut rng = create_rng(5);
        let mut c = Chromosome::random(5, 0, &dm, &mut rng).unwrap();
        assert_eq!(c.n_buses(), 5);
        assert!(c.routes().iter().filter(|r| r.is_idle()).count() >= 3);
        assert!(c.check_partition().is_ok());
        assert!(c.evaluate(&dm).is_ok());
    }

    #[test]
    fn test_encode_scenario() {
        let c = from_routes(&[&[0, 2, 3], &[0, 4, 1]], 5);
        assert_eq!(c.encode(), vec![0, 2, 3, 0, 4, 1]);
    }

    #[test]
    fn test_decode_consecutive_depots() {
        let c = from_routes(&[&[0], &[0, 1, 2]], 3);
        let decoded = c.decode(&[0, 0, 2, 1]).unwrap();
        assert_eq!(stops_of(&decoded), vec![vec![0], vec![0, 2, 1]]);
    }

    #[test]
    fn test_decode_rejects_wrong_depot_count() {
        let c = from_routes(&[&[0, 1], &[0, 2]], 3);
        assert!(matches!(
            c.decode(&[0, 1, 2]),
            Err(MtspError::StructuralViolation(_))
        ));
        assert!(matches!(
            c.decode(&[1, 0, 0, 2]),
            Err(MtspError::StructuralViolation(_))
        ));
    }

    #[test]
    fn test_from_encoded_rejects_duplicates_and_gaps() {
        assert!(matches!(
            Chromosome::from_encoded(&[0, 1, 0, 1], 2, 0, 3),
            Err(MtspError::StructuralViolation(_))
        ));
        assert!(matches!(
            Chromosome::from_encoded(&[0, 1, 0], 2, 0, 3),
            Err(MtspError::StructuralViolation(_))
        ));
        assert!(matches!(
            Chromosome::from_encoded(&[0, 1, 0, 7], 2, 0, 3),
            Err(MtspError::StructuralViolation(_))
        ));
    }

    #[test]
    fn test_crossover_scenario() {
        let dm = line_matrix(4);
        let a = from_routes(&[&[0, 1, 2], &[0, 3]], 4);
        let b = from_routes(&[&[0, 2, 1], &[0, 3]], 4);
        let mut rng = create_rng(42);

        for _ in 0..20 {
            let (c1, c2) = Chromosome::crossover(&a, &b, Direction::Successor, &dm, &mut rng)
                .unwrap();
            for child in [&c1, &c2] {
                assert_eq!(child.n_buses(), 2);
                assert!(child.check_partition().is_ok());
                assert!(child.fitness().is_none());
            }
        }
    }

    #[test]
    fn test_crossover_predecessor_children() {
        let dm = line_matrix(4);
        let a = from_routes(&[&[0, 1, 2], &[0, 3]], 4);
        let b = from_routes(&[&[0, 2, 1], &[0, 3]], 4);
        let mut rng = create_rng(42);

        // Expected first child for each anchor, walking backwards with wrap.
        let expected = |anchor: StopId| -> Vec<StopId> {
            match anchor {
                0 => vec![0, 0, 1, 2, 3],
                1 => vec![0, 1, 2, 3, 0],
                2 => vec![0, 2, 3, 0, 1],
                3 => vec![0, 3, 0, 1, 2],
                _ => unreachable!(),
            }
        };

        let mut anchors = std::collections::HashSet::new();
        for _ in 0..40 {
            let (c1, c2) = Chromosome::crossover(&a, &b, Direction::Predecessor, &dm, &mut rng)
                .unwrap();
            let encoded = c1.encode();
            anchors.insert(encoded[1]);
            assert_eq!(encoded, expected(encoded[1]));
            assert!(c2.check_partition().is_ok());
        }
        assert!(anchors.len() > 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_random_partition_and_round_trip(
            stop_count in 1usize..30,
            n_buses in 1usize..8,
            seed in any::<u64>(),
        ) {
            let dm = line_matrix(stop_count);
            let mut rng = create_rng(seed);
            let c = Chromosome::random(n_buses, 0, &dm, &mut rng).unwrap();
            prop_assert!(c.check_partition().is_ok());

            let encoded = c.encode();
            prop_assert_eq!(encoded.len(), n_buses + stop_count - 1);
            let decoded = c.decode(&encoded).unwrap();
            prop_assert_eq!(stops_of(&decoded), stops_of(&c));
        }

        #[test]
        fn prop_mutation_keeps_partition(
            stop_count in 1usize..30,
            n_buses in 1usize..8,
            seed in any::<u64>(),
        ) {
            let dm = line_matrix(stop_count);
            let mut rng = create_rng(seed);
            let mut c = Chromosome::random(n_buses, 0, &dm, &mut rng).unwrap();
            for _ in 0..10 {
                c.mutate(&mut rng);
                prop_assert!(c.check_partition().is_ok());
            }
        }

        #[test]
        fn prop_crossover_keeps_partition(
            stop_count in 1usize..25,
            n_buses in 1usize..6,
            seed in any::<u64>(),
            predecessor in any::<bool>(),
        ) {
            let dm = line_matrix(stop_count);
            let mut rng = create_rng(seed);
            let a = Chromosome::random(n_buses, 0, &dm, &mut rng).unwrap();
            let b = Chromosome::random(n_buses, 0, &dm, &mut rng).unwrap();
            let direction = if predecessor { Direction::Predecessor } else { Direction::Successor };

            let (c1, c2) = Chromosome::crossover(&a, &b, direction, &dm, &mut rng).unwrap();
            prop_assert!(c1.check_partition().is_ok());
            prop_assert!(c2.check_partition().is_ok());
            prop_assert_eq!(c1.n_buses(), n_buses);
            prop_assert_eq!(c2.n_buses(), n_buses);
        }

        #[test]
        fn prop_total_cost_bounds_max_route(
            stop_count in 1usize..30,
            n_buses in 1usize..8,
            seed in any::<u64>(),
        ) {
            let dm = line_matrix(stop_count);
            let mut rng = create_rng(seed);
            let mut c = Chromosome::random(n_buses, 0, &dm, &mut rng).unwrap();
            let f = c.evaluate(&dm).unwrap();
            prop_assert!(f.total_cost >= f.max_route_cost);
        }
    }
}
