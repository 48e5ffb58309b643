//! Held-Karp dynamic programming over subsets. Node 0 is the fixed start;
//! time and memory grow as `2^n · n`, so inputs are capped at [`MAX_POINTS`].

use crate::{Error, Result, geometry, node::Point};

pub const MAX_POINTS: usize = 18;

const NO_PARENT: u8 = u8::MAX;

pub(crate) fn solve(points: &[Point]) -> Result<Vec<usize>> {
    let n = points.len();
    if n > MAX_POINTS {
        return Err(Error::SolverLimit {
            solver: "exact",
            points: n,
            max: MAX_POINTS,
        });
    }
    if n <= 3 {
        return Ok((0..n).collect());
    }

    let dist = geometry::distance_matrix(points, |a, b| a.dist(b));
    let d = |i: usize, j: usize| dist[i * n + j];

    // Subsets range over nodes 1..n, stored as bit (node - 1).
    let m = n - 1;
    let full = 1usize << m;
    let mut cost = vec![f64::INFINITY; full * m];
    let mut parent = vec![NO_PARENT; full * m];

    for j in 0..m {
        cost[(1 << j) * m + j] = d(0, j + 1);
    }

    for mask in 1..full {
        for j in 0..m {
            if mask & (1 << j) == 0 {
                continue;
            }
            let current = cost[mask * m + j];
            if !current.is_finite() {
                continue;
            }
            for k in 0..m {
                if mask & (1 << k) != 0 {
                    continue;
                }
                let next = mask | (1 << k);
                let candidate = current + d(j + 1, k + 1);
                if candidate < cost[next * m + k] {
                    cost[next * m + k] = candidate;
                    parent[next * m + k] = j as u8;
                }
            }
        }
    }

    let all = full - 1;
    let mut last = 0;
    let mut best = f64::INFINITY;
    for j in 0..m {
        let closed = cost[all * m + j] + d(j + 1, 0);
        if closed < best {
            best = closed;
            last = j;
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut mask = all;
    let mut j = last;
    loop {
        order.push(j + 1);
        let p = parent[mask * m + j];
        mask ^= 1 << j;
        if p == NO_PARENT {
            break;
        }
        j = p as usize;
    }
    order.push(0);
    order.reverse();

    log::trace!("tsp.exact: n={n} length={best:.3}");
    Ok(order)
}
