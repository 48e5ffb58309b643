use crate::node::Point;

/// Closed length of the cycle visiting `points` in `order`, wrapping back to the start.
pub(crate) fn tour_length(points: &[Point], order: &[usize]) -> f64 {
    let n = order.len();
    (0..n)
        .map(|i| points[order[i]].dist(&points[order[(i + 1) % n]]))
        .sum()
}

/// Length of `points` walked in sequence without returning to the start.
pub(crate) fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].dist(&w[1])).sum()
}

/// Dense symmetric distance matrix, row-major.
pub(crate) fn distance_matrix(points: &[Point], metric: impl Fn(&Point, &Point) -> f64) -> Vec<f64> {
    let n = points.len();
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = metric(&points[i], &points[j]);
            out[i * n + j] = d;
            out[j * n + i] = d;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{distance_matrix, path_length, tour_length};
    use crate::node::Point;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ]
    }

    #[test]
    fn tour_length_closes_cycle() {
        let length = tour_length(&unit_square(), &[0, 1, 2, 3]);
        assert!((length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn path_length_does_not_close() {
        assert!((path_length(&unit_square()) - 3.0).abs() < 1e-12);
        assert_eq!(path_length(&[Point::new(2.0, 2.0)]), 0.0);
    }

    #[test]
    fn distance_matrix_is_symmetric_with_zero_diagonal() {
        let points = unit_square();
        let m = distance_matrix(&points, |a, b| a.dist(b));
        assert_eq!(m.len(), 16);
        for i in 0..4 {
            assert_eq!(m[i * 4 + i], 0.0);
            for j in 0..4 {
                assert_eq!(m[i * 4 + j], m[j * 4 + i]);
            }
        }
        assert!((m[2] - 2f64.sqrt()).abs() < 1e-12);
    }
}
