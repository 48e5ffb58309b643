//! Ant colony system: ants build tours stepwise from a shared pheromone
//! matrix, choosing greedily with probability `greed` and by roulette wheel
//! otherwise. Edge costs are Euclidean distances rounded with `f64::round`.

use rand::{Rng, seq::SliceRandom};

use crate::{geometry, node::Point};

const HISTORY_WEIGHT: f64 = 1.0;
// A rounded distance of zero is scored as half a unit.
const MIN_HEURISTIC_EDGE: f64 = 0.5;
const MIN_TOUR_COST: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AntColonyParams {
    pub max_iterations: usize,
    pub num_ants: usize,
    /// Global pheromone decay applied along the best tour.
    pub decay: f64,
    /// Exponent on `1 / distance`.
    pub heuristic_weight: f64,
    /// Local pheromone decay applied along every constructed tour.
    pub local_pheromone: f64,
    /// Probability of picking the most desirable city instead of sampling.
    pub greed: f64,
}

impl Default for AntColonyParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            num_ants: 10,
            decay: 0.1,
            heuristic_weight: 2.5,
            local_pheromone: 0.1,
            greed: 0.9,
        }
    }
}

/// Symmetric edge pheromone, owned by one search run.
#[derive(Clone, Debug)]
pub(crate) struct PheromoneMatrix {
    n: usize,
    values: Vec<f64>,
}

impl PheromoneMatrix {
    pub(crate) fn new(n: usize, initial: f64) -> Self {
        Self {
            n,
            values: vec![initial; n * n],
        }
    }

    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.n + j] = value;
        self.values[j * self.n + i] = value;
    }

    /// `(1 - rate) · old + rate · initial` on every edge of `order`.
    pub(crate) fn local_update(&mut self, order: &[usize], rate: f64, initial: f64) {
        let len = order.len();
        for i in 0..len {
            let (a, b) = (order[i], order[(i + 1) % len]);
            let value = (1.0 - rate) * self.get(a, b) + rate * initial;
            self.set_symmetric(a, b, value);
        }
    }

    /// `(1 - decay) · old + decay / cost` on every edge of the best tour.
    pub(crate) fn global_update(&mut self, order: &[usize], decay: f64, cost: f64) {
        let deposit = 1.0 / cost.max(MIN_TOUR_COST);
        let len = order.len();
        for i in 0..len {
            let (a, b) = (order[i], order[(i + 1) % len]);
            let value = (1.0 - decay) * self.get(a, b) + decay * deposit;
            self.set_symmetric(a, b, value);
        }
    }
}

struct Ant {
    order: Vec<usize>,
    cost: f64,
}

pub(crate) fn solve<R: Rng + ?Sized>(
    points: &[Point],
    params: &AntColonyParams,
    rng: &mut R,
) -> Vec<usize> {
    let n = points.len();
    let dist = geometry::distance_matrix(points, |a, b| a.rounded_dist(b));

    let mut initial: Vec<usize> = (0..n).collect();
    initial.shuffle(rng);
    let initial_cost = cost(&dist, n, &initial);
    let mut best = Ant {
        order: initial,
        cost: initial_cost,
    };

    let init_pheromone = 1.0 / (n as f64 * best.cost.max(MIN_TOUR_COST));
    let mut pheromone = PheromoneMatrix::new(n, init_pheromone);

    for iteration in 0..params.max_iterations {
        for _ in 0..params.num_ants {
            let order = construct(&dist, n, &pheromone, params, rng);
            let ant_cost = cost(&dist, n, &order);
            pheromone.local_update(&order, params.local_pheromone, init_pheromone);
            if ant_cost < best.cost {
                best = Ant {
                    order,
                    cost: ant_cost,
                };
            }
        }
        pheromone.global_update(&best.order, params.decay, best.cost);
        log::trace!("tsp.ant_colony: iteration={iteration} best={}", best.cost);
    }

    best.order
}

fn cost(dist: &[f64], n: usize, order: &[usize]) -> f64 {
    let len = order.len();
    (0..len)
        .map(|i| dist[order[i] * n + order[(i + 1) % len]])
        .sum()
}

fn construct<R: Rng + ?Sized>(
    dist: &[f64],
    n: usize,
    pheromone: &PheromoneMatrix,
    params: &AntColonyParams,
    rng: &mut R,
) -> Vec<usize> {
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut choices: Vec<(usize, f64)> = Vec::with_capacity(n);

    let start = rng.random_range(0..n);
    visited[start] = true;
    order.push(start);

    while order.len() < n {
        let last = order[order.len() - 1];
        choices.clear();
        for city in (0..n).filter(|&c| !visited[c]) {
            let history = pheromone.get(last, city).powf(HISTORY_WEIGHT);
            let heuristic =
                (1.0 / dist[last * n + city].max(MIN_HEURISTIC_EDGE)).powf(params.heuristic_weight);
            choices.push((city, history * heuristic));
        }

        let next = if rng.random::<f64>() <= params.greed {
            greedy_select(&choices)
        } else {
            roulette_select(&choices, rng)
        };
        visited[next] = true;
        order.push(next);
    }

    order
}

/// Most desirable city; the first one wins ties.
fn greedy_select(choices: &[(usize, f64)]) -> usize {
    let mut best = choices[0];
    for &choice in &choices[1..] {
        if choice.1 > best.1 {
            best = choice;
        }
    }
    best.0
}

/// Walks normalized desirabilities down from a uniform draw in `[0, 1)`.
/// Falls back to a uniform pick when every desirability is zero.
fn roulette_select<R: Rng + ?Sized>(choices: &[(usize, f64)], rng: &mut R) -> usize {
    let total: f64 = choices.iter().map(|c| c.1).sum();
    if total == 0.0 {
        return choices[rng.random_range(0..choices.len())].0;
    }

    let mut v = rng.random::<f64>();
    for &(city, desirability) in choices {
        v -= desirability / total;
        if v <= 0.0 {
            return city;
        }
    }
    choices[choices.len() - 1].0
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{AntColonyParams, PheromoneMatrix, greedy_select, roulette_select, solve};
    use crate::{geometry, node::Point};

    fn ring(n: usize, radius: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / n as f64;
                Point::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect()
    }

    #[test]
    fn visits_every_city_once() {
        let points = ring(12, 10.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut order = solve(&points, &AntColonyParams::default(), &mut rng);
        order.sort_unstable();
        assert_eq!(order, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn finds_the_ring_on_convex_points() {
        let points = ring(10, 20.0);
        let mut rng = StdRng::seed_from_u64(42);
        let order = solve(&points, &AntColonyParams::default(), &mut rng);
        let perimeter = geometry::tour_length(&points, &(0..10).collect::<Vec<_>>());
        assert!(geometry::tour_length(&points, &order) <= perimeter + 1e-9);
    }

    #[test]
    fn same_seed_gives_same_tour() {
        let points = ring(9, 5.0);
        let params = AntColonyParams {
            max_iterations: 20,
            ..AntColonyParams::default()
        };
        let a = solve(&points, &params, &mut StdRng::seed_from_u64(3));
        let b = solve(&points, &params, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn local_update_pulls_towards_initial_symmetrically() {
        let mut pheromone = PheromoneMatrix::new(3, 1.0);
        pheromone.local_update(&[0, 1, 2], 0.5, 0.0);
        assert!((pheromone.get(0, 1) - 0.5).abs() < 1e-12);
        assert!((pheromone.get(1, 0) - 0.5).abs() < 1e-12);
        assert!((pheromone.get(2, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn global_update_deposits_inverse_cost_on_best_edges_only() {
        let mut pheromone = PheromoneMatrix::new(4, 0.0);
        pheromone.global_update(&[0, 1, 2], 0.1, 4.0);
        assert!((pheromone.get(0, 1) - 0.025).abs() < 1e-12);
        assert!((pheromone.get(2, 1) - 0.025).abs() < 1e-12);
        assert_eq!(pheromone.get(0, 3), 0.0);
    }

    #[test]
    fn greedy_select_prefers_first_of_equal_maxima() {
        assert_eq!(greedy_select(&[(4, 0.2), (7, 0.9), (9, 0.9)]), 7);
    }

    #[test]
    fn roulette_select_uniform_when_all_zero() {
        let choices = [(1, 0.0), (2, 0.0), (3, 0.0)];
        let mut rng = StdRng::seed_from_u64(1);
        let picked = roulette_select(&choices, &mut rng);
        assert!([1, 2, 3].contains(&picked));
    }

    #[test]
    fn roulette_select_never_picks_zero_weight_city() {
        let choices = [(1, 0.0), (2, 1.0), (3, 0.0)];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(roulette_select(&choices, &mut rng), 2);
        }
    }
}
