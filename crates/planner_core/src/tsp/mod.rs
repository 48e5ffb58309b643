//! Closed-tour construction over small planar point sets.

pub(crate) mod ant_colony;
pub(crate) mod exact;
pub(crate) mod genetic;

use planner_derive::CliValue;
use rand::Rng;

pub use ant_colony::AntColonyParams;
pub use exact::MAX_POINTS as EXACT_MAX_POINTS;
pub use genetic::GeneticParams;

use crate::{Error, Result, Tour, geometry, node::Point};

// Every visiting order of three or fewer points has the same length.
const TRIVIAL_CYCLE_POINTS: usize = 3;

const ERR_EMPTY: &str = "cannot build a tour over zero points";
const ERR_INVALID_POINT: &str = "tour input contains non-finite coordinates";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "tsp-solver")]
pub enum TspStrategy {
    #[default]
    #[cli(alias = "optimal")]
    Exact,
    #[cli(alias = "aco")]
    AntColony,
    #[cli(alias = "ga")]
    Genetic,
}

/// A strategy plus the tuning for the stochastic ones.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TspSolver {
    pub strategy: TspStrategy,
    pub ant_colony: AntColonyParams,
    pub genetic: GeneticParams,
}

impl TspSolver {
    pub fn new(strategy: TspStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_ant_colony(mut self, params: AntColonyParams) -> Self {
        self.ant_colony = params;
        self
    }

    pub fn with_genetic(mut self, params: GeneticParams) -> Self {
        self.genetic = params;
        self
    }

    /// Largest input the strategy accepts, if it has one.
    pub fn max_points(&self) -> Option<usize> {
        match self.strategy {
            TspStrategy::Exact => Some(EXACT_MAX_POINTS),
            TspStrategy::AntColony | TspStrategy::Genetic => None,
        }
    }

    /// Builds a closed tour visiting every point once. The exact strategy
    /// starts at `points[0]`; the heuristics start wherever they ended up,
    /// so callers needing a fixed start rotate the result.
    pub fn solve<R: Rng + ?Sized>(&self, points: &[Point], rng: &mut R) -> Result<Tour> {
        if points.is_empty() {
            return Err(Error::invalid_input(ERR_EMPTY));
        }
        if points.iter().any(|p| !p.is_valid()) {
            return Err(Error::invalid_input(ERR_INVALID_POINT));
        }

        let order = if points.len() <= TRIVIAL_CYCLE_POINTS {
            (0..points.len()).collect()
        } else {
            match self.strategy {
                TspStrategy::Exact => exact::solve(points)?,
                TspStrategy::AntColony => ant_colony::solve(points, &self.ant_colony, rng),
                TspStrategy::Genetic => genetic::solve(points, &self.genetic, rng),
            }
        };

        log::trace!(
            "tsp.solve: strategy={} n={} length={:.3}",
            self.strategy,
            points.len(),
            geometry::tour_length(points, &order)
        );

        Ok(Tour::new(order.into_iter().map(|idx| points[idx]).collect()))
    }
}

/// Solves with default tuning for `strategy`.
pub fn solve<R: Rng + ?Sized>(points: &[Point], strategy: TspStrategy, rng: &mut R) -> Result<Tour> {
    TspSolver::new(strategy).solve(points, rng)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{AntColonyParams, GeneticParams, TspSolver, TspStrategy, solve};
    use crate::{Error, node::Point};

    const STRATEGIES: [TspStrategy; 3] = [
        TspStrategy::Exact,
        TspStrategy::AntColony,
        TspStrategy::Genetic,
    ];

    fn fast(strategy: TspStrategy) -> TspSolver {
        TspSolver::new(strategy)
            .with_ant_colony(AntColonyParams {
                max_iterations: 20,
                ..AntColonyParams::default()
            })
            .with_genetic(GeneticParams {
                generations: 50,
                ..GeneticParams::default()
            })
    }

    fn scattered() -> Vec<Point> {
        vec![
            Point::new(2.0, 2.0),
            Point::new(0.5, 0.5),
            Point::new(3.5, 0.5),
            Point::new(0.5, 3.5),
            Point::new(3.5, 3.5),
            Point::new(1.5, 2.5),
            Point::new(2.5, 1.5),
            Point::new(0.5, 2.0),
        ]
    }

    #[test]
    fn every_strategy_visits_each_point_exactly_once() {
        let points = scattered();
        for strategy in STRATEGIES {
            let mut rng = StdRng::seed_from_u64(17);
            let tour = fast(strategy).solve(&points, &mut rng).expect("solve");
            let closed = tour.closed();

            assert_eq!(closed.len(), points.len() + 1, "strategy={strategy}");
            assert_eq!(closed.first(), closed.last());
            for p in &points {
                let hits = tour.points.iter().filter(|q| *q == p).count();
                assert_eq!(hits, 1, "strategy={strategy} point={p}");
            }
        }
    }

    #[test]
    fn heuristics_never_beat_exact() {
        let points = scattered();
        let mut rng = StdRng::seed_from_u64(5);
        let optimal = solve(&points, TspStrategy::Exact, &mut rng)
            .expect("exact")
            .length();
        for strategy in [TspStrategy::AntColony, TspStrategy::Genetic] {
            let length = fast(strategy).solve(&points, &mut rng).expect("solve").length();
            assert!(length + 1e-9 >= optimal, "strategy={strategy}");
        }
    }

    #[test]
    fn exact_tour_starts_at_first_point() {
        let points = scattered();
        let mut rng = StdRng::seed_from_u64(0);
        let tour = solve(&points, TspStrategy::Exact, &mut rng).expect("solve");
        assert_eq!(tour.first(), Some(points[0]));
    }

    #[test]
    fn tiny_inputs_are_returned_in_order() {
        let mut rng = StdRng::seed_from_u64(0);
        let single = [Point::new(1.0, 1.0)];
        for strategy in STRATEGIES {
            let tour = solve(&single, strategy, &mut rng).expect("solve");
            assert_eq!(tour.points, single.to_vec());
            assert_eq!(tour.closed().len(), 2);
        }
    }

    #[test]
    fn empty_and_non_finite_inputs_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = solve(&[], TspStrategy::Exact, &mut rng).expect_err("empty");
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = solve(&[Point::new(f64::NAN, 0.0)], TspStrategy::Genetic, &mut rng)
            .expect_err("nan");
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn strategy_parses_names_and_aliases() {
        assert_eq!(TspStrategy::parse("exact").expect("parse"), TspStrategy::Exact);
        assert_eq!(TspStrategy::parse("ACO").expect("parse"), TspStrategy::AntColony);
        assert_eq!(TspStrategy::parse("ant-colony").expect("parse"), TspStrategy::AntColony);
        assert_eq!(TspStrategy::parse("ga").expect("parse"), TspStrategy::Genetic);
        assert_eq!(
            "Ant_Colony".parse::<TspStrategy>().expect("from_str"),
            TspStrategy::AntColony
        );
        assert_eq!(TspStrategy::AntColony.to_string(), "ant-colony");
        assert_eq!(TspStrategy::VARIANTS, &["exact", "ant-colony", "genetic"]);

        let err = TspStrategy::parse("lkh").expect_err("unknown");
        assert!(err.to_string().contains("expected exact|ant-colony|genetic"));
    }

    #[test]
    fn only_exact_has_a_size_cap() {
        assert!(TspSolver::new(TspStrategy::Exact).max_points().is_some());
        assert!(TspSolver::new(TspStrategy::Genetic).max_points().is_none());
    }
}
