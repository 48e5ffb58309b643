use std::fmt;

/// A planar point in grid units. Compared by coordinate equality only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn dist(self, rhs: &Self) -> f64 {
        (self.x - rhs.x).hypot(self.y - rhs.y)
    }

    /// Euclidean distance rounded half away from zero (`f64::round`), the
    /// integer metric used by the ant colony heuristic.
    pub fn rounded_dist(self, rhs: &Self) -> f64 {
        self.dist(rhs).round()
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub(crate) fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bx = ryu::Buffer::new();
        let mut by = ryu::Buffer::new();
        write!(f, "{},{}", bx.format(self.x), by.format(self.y))
    }
}
