use crate::{Error, Result, node::Point};

/// A `width × height` rectangle of unit squares, each holding one target
/// point at its middle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Environment {
    pub width: usize,
    pub height: usize,
}

impl Environment {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_config(format!(
                "environment extents must be > 0 (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn center(&self) -> Point {
        Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Unit-square midpoints, outer loop over x.
    pub fn cities(&self) -> Vec<Point> {
        (0..self.width)
            .flat_map(|w| (0..self.height).map(move |h| Point::new(w as f64 + 0.5, h as f64 + 0.5)))
            .collect()
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Distance from the center to a corner, long enough for sector rays to
    /// leave the rectangle.
    pub fn half_diagonal(&self) -> f64 {
        (self.width as f64 / 2.0).hypot(self.height as f64 / 2.0)
    }
}
