use crate::{geometry, node::Point};

/// A closed cycle through a point set. `points` holds every stop once; the
/// return to `points[0]` is implicit and made explicit by [`Tour::closed`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    pub points: Vec<Point>,
}

impl Tour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    /// Closed length, including the edge from the last stop back to the first.
    pub fn length(&self) -> f64 {
        geometry::path_length(&self.closed())
    }

    /// Stops with the first one repeated at the end.
    pub fn closed(&self) -> Vec<Point> {
        let mut out = self.points.clone();
        if let Some(first) = self.first() {
            out.push(first);
        }
        out
    }

    /// Rotates the cycle so it starts at `start`; unchanged if `start` is not a stop.
    pub fn rotate_to(&mut self, start: Point) {
        if let Some(pos) = self.points.iter().position(|p| *p == start) {
            self.points.rotate_left(pos);
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.points.iter().map(|p| p.offset(dx, dy)).collect())
    }

    pub fn tour_metrics(&self) -> TourMetrics {
        let n = self.len();

        if n < 2 {
            log::trace!("tour.metrics: n={n} nothing to report");
            return TourMetrics::default();
        }

        let distances: Vec<f64> = (0..n)
            .map(|i| self.points[i].dist(&self.points[(i + 1) % n]))
            .collect();
        let total: f64 = distances.iter().sum();
        let longest = distances.iter().copied().fold(0.0_f64, f64::max);
        let average = total / n as f64;

        log::trace!("tour.metrics: n={n} total={total:.3} longest={longest:.3} avg={average:.3}");

        TourMetrics {
            total,
            longest,
            average,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub total: f64,
    pub longest: f64,
    pub average: f64,
}
