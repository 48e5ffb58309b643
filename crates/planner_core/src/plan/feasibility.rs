use rand::Rng;

use crate::{
    Result, Tour, TspSolver,
    plan::{
        environment::Environment,
        hardware::HardwareSpec,
        sector::{self, SectorTours},
    },
};

/// Result of flying one cell of a candidate size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feasibility {
    pub feasible: bool,
    /// Longest sector tour; reported for infeasible cells too.
    pub worst_tour_length: f64,
    /// Per-UAV tours of the cell anchored at the origin. Empty when infeasible.
    pub tours: SectorTours,
}

/// Partitions a `cell_width × cell_height` cell among `spec.uav_count` UAVs and
/// checks that the longest sector tour leaves energy to spare:
/// `e - worst · B- / uA_max > 0`.
pub fn evaluate<R: Rng + ?Sized>(
    cell_width: usize,
    cell_height: usize,
    spec: &HardwareSpec,
    solver: &TspSolver,
    rng: &mut R,
) -> Result<Feasibility> {
    let cell = Environment::new(cell_width, cell_height)?;
    let tours = sector::partition(&cell.cities(), cell.center(), spec.uav_count, solver, rng)?;
    let worst_tour_length = worst_tour_length(&tours);
    let feasible = spec.uav_can_cover(worst_tour_length);

    log::debug!(
        "feasibility: a1={cell_width} a2={cell_height} worst={worst_tour_length:.3} energy={:.3}/{:.3} feasible={feasible}",
        spec.uav_energy_used(worst_tour_length),
        spec.uav_max_energy
    );

    Ok(Feasibility {
        feasible,
        worst_tour_length,
        tours: if feasible { tours } else { Vec::new() },
    })
}

/// Longest tour length; empty sectors count as zero.
pub fn worst_tour_length(tours: &[Option<Tour>]) -> f64 {
    tours.iter().flatten().map(Tour::length).fold(0.0, f64::max)
}
