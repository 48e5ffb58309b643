//! Coverage planning for a UAV team supported by one ground vehicle.
//! Splits an area into equal cells, routes the UAVs through each cell from
//! its center and routes the UGV between cells, picking the cell size with
//! the shortest mission time that the UAV batteries allow.

mod error;
mod geo;
mod io;
pub mod logging;
mod node;
mod plan;
mod tour;
mod tsp;

pub(crate) use geo::{angle, geometry};

pub use error::{Error, Result};
pub use geo::angle::{Quadrant, angle_from_center, sector_rays};
pub use io::options::{LogFormat, LogLevel, PlannerOptions};
pub use io::output::{write_report, write_report_to};
pub use node::Point;
pub use plan::environment::Environment;
pub use plan::feasibility::{Feasibility, evaluate, worst_tour_length};
pub use plan::hardware::HardwareSpec;
pub use plan::search::{Candidate, PartitionSearch, SearchOutcome, SearchSettings, search};
pub use plan::sector::{SectorTours, assign_sectors, partition};
pub use plan::tiling::{Cell, tile};
pub use tour::{Tour, TourMetrics};
pub use tsp::{AntColonyParams, EXACT_MAX_POINTS, GeneticParams, TspSolver, TspStrategy, solve};
