//! Angular split of a cell's points among `k` UAVs sharing one launch point.

use rand::Rng;

use crate::{
    Error, Result, Tour, TspSolver,
    angle::{angle_from_center, boundary_angle},
    node::Point,
};

/// Tours indexed by UAV; `None` where the sector received no points.
pub type SectorTours = Vec<Option<Tour>>;

/// Buckets every point except those coinciding with `center` into one of `k`
/// angular sectors.
///
/// Sector `i` spans `[i·360/k, (i+1)·360/k)` degrees counter-clockwise from
/// the positive x axis, so a point on a boundary lands in the sector that
/// starts there. Points are walked in ascending angle; once a sector holds
/// `round(points / k)` of them (at least one) further points overflow
/// forward, and the last sector takes whatever remains.
pub fn assign_sectors(points: &[Point], center: Point, k: usize) -> Result<Vec<Vec<Point>>> {
    if k == 0 {
        return Err(Error::invalid_config("sector count must be > 0"));
    }

    let mut angled: Vec<(f64, Point)> = points
        .iter()
        .filter_map(|&p| angle_from_center(center, p).map(|a| (a, p)))
        .collect();
    angled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let target = ((angled.len() as f64 / k as f64).round() as usize).max(1);
    let boundaries: Vec<f64> = (0..=k).map(|i| boundary_angle(i, k)).collect();

    let mut sectors: Vec<Vec<Point>> = vec![Vec::new(); k];
    for (angle, point) in angled {
        let mut idx = natural_sector(angle, &boundaries);
        while idx + 1 < k && sectors[idx].len() >= target {
            idx += 1;
        }
        sectors[idx].push(point);
    }

    log::trace!(
        "sector.assign: k={k} target={target} sizes={:?}",
        sectors.iter().map(Vec::len).collect::<Vec<_>>()
    );
    Ok(sectors)
}

/// First sector whose upper boundary lies strictly above `angle`.
fn natural_sector(angle: f64, boundaries: &[f64]) -> usize {
    let k = boundaries.len() - 1;
    (1..=k)
        .find(|&b| angle < boundaries[b])
        .map_or(k - 1, |b| b - 1)
}

/// Splits `points` into `k` sectors around `center` and builds one closed
/// tour per non-empty sector, starting and ending at `center`.
pub fn partition<R: Rng + ?Sized>(
    points: &[Point],
    center: Point,
    k: usize,
    solver: &TspSolver,
    rng: &mut R,
) -> Result<SectorTours> {
    assign_sectors(points, center, k)?
        .into_iter()
        .enumerate()
        .map(|(idx, sector)| {
            if sector.is_empty() {
                log::trace!("sector.partition: sector={idx} empty");
                return Ok(None);
            }

            let mut stops = Vec::with_capacity(sector.len() + 1);
            stops.push(center);
            stops.extend(sector);

            let mut tour = solver.solve(&stops, rng)?;
            tour.rotate_to(center);
            Ok(Some(tour))
        })
        .collect()
}
