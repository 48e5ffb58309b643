use crate::{Error, Result, node::Point, plan::environment::Environment};

// (draw order, opacity) per band, for the renderer only.
const INTERIOR_STYLE: (u8, f64) = (9, 0.8);
const FAR_X_STYLE: (u8, f64) = (6, 1.0);
const FAR_Y_STYLE: (u8, f64) = (3, 0.8);
const CORNER_STYLE: (u8, f64) = (0, 1.0);

/// An axis-aligned cell of a tiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub draw_order: u8,
    pub opacity: f64,
}

impl Cell {
    fn new(x: (f64, f64), y: (f64, f64), style: (u8, f64)) -> Self {
        Self {
            x_min: x.0,
            x_max: x.1,
            y_min: y.0,
            y_max: y.1,
            draw_order: style.0,
            opacity: style.1,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn midpoint(&self) -> Point {
        Point::new(
            self.x_min + self.width() / 2.0,
            self.y_min + self.height() / 2.0,
        )
    }

    /// Closed-interval containment.
    pub fn contains(&self, p: Point) -> bool {
        (self.x_min..=self.x_max).contains(&p.x) && (self.y_min..=self.y_max).contains(&p.y)
    }
}

/// Covers `area` with `cell_width × cell_height` cells.
///
/// Full cells fill `⌈width/a1⌉ - 1` columns by `⌈height/a2⌉ - 1` rows from
/// the origin. The last column and row are placed flush with the far edges,
/// at `width - a1` and `height - a2`, so they overlap their neighbours when
/// the extents are not multiples of the cell size.
pub fn tile(cell_width: usize, cell_height: usize, area: &Environment) -> Result<Vec<Cell>> {
    if cell_width == 0 || cell_width > area.width || cell_height == 0 || cell_height > area.height {
        return Err(Error::invalid_config(format!(
            "cell {cell_width}x{cell_height} does not fit area {}x{}",
            area.width, area.height
        )));
    }

    let (a1, a2) = (cell_width as f64, cell_height as f64);
    let (x, y) = (area.width as f64, area.height as f64);
    let columns = area.width.div_ceil(cell_width);
    let rows = area.height.div_ceil(cell_height);
    let span = |k: usize, size: f64| ((k - 1) as f64 * size, k as f64 * size);

    let mut cells = Vec::with_capacity(columns * rows);
    for k1 in 1..columns {
        for k2 in 1..rows {
            cells.push(Cell::new(span(k1, a1), span(k2, a2), INTERIOR_STYLE));
        }
    }
    for k in 1..rows {
        cells.push(Cell::new((x - a1, x), span(k, a2), FAR_X_STYLE));
    }
    for k in 1..columns {
        cells.push(Cell::new(span(k, a1), (y - a2, y), FAR_Y_STYLE));
    }
    cells.push(Cell::new((x - a1, x), (y - a2, y), CORNER_STYLE));

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::tile;
    use crate::{Environment, Error, node::Point};

    #[test]
    fn eleven_by_nine_with_three_by_three_covers_every_square() {
        let area = Environment::new(11, 9).expect("area");
        let cells = tile(3, 3, &area).expect("tile");
        assert_eq!(cells.len(), 12);

        for w in 0..11 {
            for h in 0..9 {
                let p = Point::new(w as f64 + 0.5, h as f64 + 0.5);
                assert!(cells.iter().any(|c| c.contains(p)), "gap at {p}");
            }
        }
        for cell in &cells {
            assert_eq!(cell.width(), 3.0);
            assert_eq!(cell.height(), 3.0);
            assert!(cell.x_min >= 0.0 && cell.x_max <= 11.0);
            assert!(cell.y_min >= 0.0 && cell.y_max <= 9.0);
        }
    }

    #[test]
    fn far_column_overlaps_when_size_does_not_divide() {
        let area = Environment::new(11, 9).expect("area");
        let cells = tile(3, 3, &area).expect("tile");
        let corner = cells.last().expect("corner");
        assert_eq!((corner.x_min, corner.y_min), (8.0, 6.0));
        assert_eq!(corner.draw_order, 0);
        assert!(cells.iter().any(|c| c.x_min == 6.0 && c.x_max == 9.0));
    }

    #[test]
    fn dividing_sizes_tile_without_overlap() {
        let area = Environment::new(6, 4).expect("area");
        let cells = tile(2, 2, &area).expect("tile");
        assert_eq!(cells.len(), 6);
        let covered: f64 = cells.iter().map(|c| c.width() * c.height()).sum();
        assert_eq!(covered, 24.0);
        assert_eq!(cells[0].midpoint(), Point::new(1.0, 1.0));
        assert_eq!(cells[0].opacity, 0.8);
    }

    #[test]
    fn whole_area_cell_is_single_corner_cell() {
        let area = Environment::new(5, 3).expect("area");
        let cells = tile(5, 3, &area).expect("tile");
        assert_eq!(cells.len(), 1);
        assert_eq!((cells[0].x_min, cells[0].y_min), (0.0, 0.0));
    }

    #[test]
    fn oversized_cell_is_rejected() {
        let area = Environment::new(4, 4).expect("area");
        assert!(matches!(tile(5, 1, &area), Err(Error::InvalidConfig(_))));
        assert!(matches!(tile(1, 0, &area), Err(Error::InvalidConfig(_))));
    }
}
