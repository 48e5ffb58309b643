use std::thread;

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    Error, Result, Tour, TspSolver, TspStrategy,
    plan::{
        environment::Environment,
        feasibility,
        hardware::HardwareSpec,
        sector::SectorTours,
        tiling::{self, Cell},
    },
};

const DEFAULT_BASE_SEED: u64 = 12_345;
const DEFAULT_MAX_CELL_AREA: usize = 16;
const THREAD_FALLBACK_PARALLELISM: usize = 1;

/// Knobs for [`PartitionSearch`] that are not vehicle properties.
#[derive(Clone, Copy, Debug)]
pub struct SearchSettings {
    /// Solver for the UAV sector tours inside a cell.
    pub uav_solver: TspSolver,
    /// Solver for the UGV tour over cell midpoints.
    pub ugv_solver: TspSolver,
    pub seed: u64,
    /// Largest cell area tried; `None` tries every size.
    pub max_cell_area: Option<usize>,
    /// Worker threads; 0 picks from the available parallelism.
    pub threads: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            uav_solver: TspSolver::new(TspStrategy::Exact),
            ugv_solver: TspSolver::new(TspStrategy::AntColony),
            seed: DEFAULT_BASE_SEED,
            max_cell_area: Some(DEFAULT_MAX_CELL_AREA),
            threads: 0,
        }
    }
}

/// A feasible cell size with its tiling and routes.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub cell_width: usize,
    pub cell_height: usize,
    pub worst_tour_length: f64,
    /// Sector tours of one cell anchored at the origin, indexed by UAV.
    pub uav_tours: SectorTours,
    pub cells: Vec<Cell>,
    pub ugv_tour: Tour,
    pub ugv_time: f64,
    pub uav_time: f64,
    pub total_time: f64,
}

impl Candidate {
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// UAV tours moved onto every cell of the tiling, in tiling order.
    pub fn cell_tours(&self) -> Vec<SectorTours> {
        self.cells
            .iter()
            .map(|cell| {
                self.uav_tours
                    .iter()
                    .map(|tour| tour.as_ref().map(|t| t.translate(cell.x_min, cell.y_min)))
                    .collect()
            })
            .collect()
    }
}

/// Outcome of a search. Finding no feasible size is a normal result.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Planned(Box<Candidate>),
    Infeasible,
}

impl SearchOutcome {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Planned(candidate) => Some(candidate.as_ref()),
            Self::Infeasible => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Planned(_))
    }
}

pub(crate) fn generate_seeds(base_seed: u64, count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(base_seed);
    (0..count).map(|_| rng.random::<u64>()).collect()
}

fn threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(THREAD_FALLBACK_PARALLELISM)
}

/// Tries every cell size over an environment and keeps the fastest plan.
#[derive(Clone, Debug)]
pub struct PartitionSearch {
    env: Environment,
    spec: HardwareSpec,
    settings: SearchSettings,
}

impl PartitionSearch {
    pub fn new(env: Environment, spec: HardwareSpec, settings: SearchSettings) -> Result<Self> {
        Environment::new(env.width, env.height)?;
        spec.validate()?;

        // A single UAV flies every point of the cell plus the center.
        if let Some(max) = settings.uav_solver.max_points() {
            match settings.max_cell_area {
                Some(area) if area < max => {}
                _ => {
                    return Err(Error::invalid_config(format!(
                        "{} UAV solver needs max_cell_area <= {} (got {})",
                        settings.uav_solver.strategy,
                        max - 1,
                        settings
                            .max_cell_area
                            .map_or_else(|| "uncapped".to_string(), |a| a.to_string())
                    )));
                }
            }
        }
        if settings.max_cell_area == Some(0) {
            return Err(Error::invalid_config("max_cell_area must be > 0"));
        }

        Ok(Self {
            env,
            spec,
            settings,
        })
    }

    /// Every `(a1, a2)` within the extents, skipping `1×1` and sizes over the
    /// area cap. Ordered by width, then height.
    pub fn candidate_sizes(&self) -> Vec<(usize, usize)> {
        let cap = self.settings.max_cell_area.unwrap_or(usize::MAX);
        (1..=self.env.width)
            .flat_map(|a1| (1..=self.env.height).map(move |a2| (a1, a2)))
            .filter(|&(a1, a2)| (a1, a2) != (1, 1) && a1 * a2 <= cap)
            .collect()
    }

    /// Evaluates one size with its own random stream. `None` when the UAVs
    /// cannot cover a cell of this size, or when the tiling has more cells
    /// than the UGV solver accepts.
    pub fn evaluate_size(&self, cell_width: usize, cell_height: usize, seed: u64) -> Result<Option<Candidate>> {
        let cells = tiling::tile(cell_width, cell_height, &self.env)?;
        if let Some(max) = self.settings.ugv_solver.max_points()
            && cells.len() > max
        {
            log::debug!(
                "search.candidate: a1={cell_width} a2={cell_height} skipped cells={} exceeds {} UGV solver limit {max}",
                cells.len(),
                self.settings.ugv_solver.strategy
            );
            return Ok(None);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let feasibility = feasibility::evaluate(
            cell_width,
            cell_height,
            &self.spec,
            &self.settings.uav_solver,
            &mut rng,
        )?;

        if !feasibility.feasible {
            log::debug!(
                "search.candidate: a1={cell_width} a2={cell_height} infeasible worst={:.3}",
                feasibility.worst_tour_length
            );
            return Ok(None);
        }

        let midpoints: Vec<_> = cells.iter().map(Cell::midpoint).collect();
        let ugv_tour = self.settings.ugv_solver.solve(&midpoints, &mut rng)?;

        let metrics = ugv_tour.tour_metrics();
        log::debug!(
            "search.ugv: a1={cell_width} a2={cell_height} cells={} longest_leg={:.3} avg_leg={:.3}",
            cells.len(),
            metrics.longest,
            metrics.average
        );

        let ugv_time = self.spec.ugv_drive_time(ugv_tour.length());
        let uav_time = self.spec.uav_flight_time(feasibility.worst_tour_length) * cells.len() as f64;
        let total_time = ugv_time + uav_time;

        log::info!(
            "search.candidate: a1={cell_width} a2={cell_height} ugv_time={ugv_time:.3} uav_time={uav_time:.3} total_time={total_time:.3}"
        );

        Ok(Some(Candidate {
            cell_width,
            cell_height,
            worst_tour_length: feasibility.worst_tour_length,
            uav_tours: feasibility.tours,
            cells,
            ugv_tour,
            ugv_time,
            uav_time,
            total_time,
        }))
    }

    #[planner_derive::timer("search")]
    pub fn run(&self) -> Result<SearchOutcome> {
        let sizes = self.candidate_sizes();
        let seeds = generate_seeds(self.settings.seed, sizes.len());
        let parallelism = match self.settings.threads {
            0 => threads(),
            n => n,
        };

        log::info!(
            "search: start area={}x{} candidates={} uav_solver={} ugv_solver={} threads={parallelism}",
            self.env.width,
            self.env.height,
            sizes.len(),
            self.settings.uav_solver.strategy,
            self.settings.ugv_solver.strategy
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .build()
            .map_err(|e| Error::other(format!("rayon pool: {e}")))?;

        let results: Vec<Option<Candidate>> = pool.install(|| {
            sizes
                .par_iter()
                .zip(seeds.par_iter())
                .map(|(&(a1, a2), &seed)| self.evaluate_size(a1, a2, seed))
                .collect::<Result<Vec<_>>>()
        })?;

        let feasible = results.iter().flatten().count();
        let mut best: Option<Candidate> = None;
        for candidate in results.into_iter().flatten() {
            if best
                .as_ref()
                .is_none_or(|b| candidate.total_time < b.total_time)
            {
                best = Some(candidate);
            }
        }

        match best {
            Some(winner) => {
                log::info!(
                    "search: winner a1={} a2={} cells={} ugv_time={:.3} uav_time={:.3} total_time={:.3} feasible={feasible}/{}",
                    winner.cell_width,
                    winner.cell_height,
                    winner.cell_count(),
                    winner.ugv_time,
                    winner.uav_time,
                    winner.total_time,
                    sizes.len()
                );
                Ok(SearchOutcome::Planned(Box::new(winner)))
            }
            None => {
                log::warn!("search: no feasible cell size among {} candidates", sizes.len());
                Ok(SearchOutcome::Infeasible)
            }
        }
    }
}

/// Runs a [`PartitionSearch`] over `env`.
pub fn search(env: Environment, spec: HardwareSpec, settings: SearchSettings) -> Result<SearchOutcome> {
    PartitionSearch::new(env, spec, settings)?.run()
}
