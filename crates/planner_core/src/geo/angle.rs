use std::{
    cmp::Ordering::{Equal, Greater, Less},
    f64::consts::TAU,
};

use crate::node::Point;

/// Position of a point relative to a center, with the four axis directions
/// kept apart from the open quadrants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Quadrant {
    Center,
    PositiveX,
    First,
    PositiveY,
    Second,
    NegativeX,
    Third,
    NegativeY,
    Fourth,
}

impl Quadrant {
    pub fn of(center: Point, point: Point) -> Self {
        let dx = point.x - center.x;
        let dy = point.y - center.y;

        match (dx.partial_cmp(&0.0), dy.partial_cmp(&0.0)) {
            (Some(Equal), Some(Equal)) => Self::Center,
            (Some(Greater), Some(Equal)) => Self::PositiveX,
            (Some(Greater), Some(Greater)) => Self::First,
            (Some(Equal), Some(Greater)) => Self::PositiveY,
            (Some(Less), Some(Greater)) => Self::Second,
            (Some(Less), Some(Equal)) => Self::NegativeX,
            (Some(Less), Some(Less)) => Self::Third,
            (Some(Equal), Some(Less)) => Self::NegativeY,
            _ => Self::Fourth,
        }
    }
}

/// Counter-clockwise angle in `[0, 2π)` of `point` around `center`, measured
/// from the positive x axis. `None` for the center itself.
///
/// Points lying exactly on an axis get the exact axis angle rather than the
/// `atan2` result, so they compare equal to sector boundaries built with
/// [`boundary_angle`].
pub fn angle_from_center(center: Point, point: Point) -> Option<f64> {
    let angle = match Quadrant::of(center, point) {
        Quadrant::Center => return None,
        Quadrant::PositiveX => 0.0,
        Quadrant::PositiveY => degrees(90.0),
        Quadrant::NegativeX => degrees(180.0),
        Quadrant::NegativeY => degrees(270.0),
        Quadrant::First | Quadrant::Second | Quadrant::Third | Quadrant::Fourth => {
            let raw = (point.y - center.y).atan2(point.x - center.x);
            if raw < 0.0 { raw + TAU } else { raw }
        }
    };
    Some(angle)
}

/// Angle in radians of the `i`-th of `k` equally spaced sector boundaries.
/// `boundary_angle(k, k)` closes the circle.
pub(crate) fn boundary_angle(i: usize, k: usize) -> f64 {
    degrees(i as f64 * 360.0 / k as f64)
}

/// End points of the `k` rays splitting the plane around `center` into
/// sectors, each `radius` long. Used to draw the split, not to assign points.
pub fn sector_rays(center: Point, k: usize, radius: f64) -> Vec<Point> {
    (0..k)
        .map(|i| {
            let theta = boundary_angle(i, k);
            Point::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
            )
        })
        .collect()
}

fn degrees(value: f64) -> f64 {
    value.to_radians()
}
