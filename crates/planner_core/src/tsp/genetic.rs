//! Generational genetic search over city permutations: rank by tour length,
//! carry the elite over unchanged, fill the rest with ordered-crossover
//! children of fitness-proportionate parents, then apply swap mutation.

use rand::{Rng, seq::SliceRandom};

use crate::{geometry, node::Point};

const MIN_POPULATION: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneticParams {
    pub population_size: usize,
    pub elite_size: usize,
    /// Per-gene probability of swapping with a random position.
    pub mutation_rate: f64,
    pub generations: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_size: 20,
            mutation_rate: 0.01,
            generations: 500,
        }
    }
}

pub(crate) fn solve<R: Rng + ?Sized>(
    points: &[Point],
    params: &GeneticParams,
    rng: &mut R,
) -> Vec<usize> {
    let n = points.len();
    let dist = geometry::distance_matrix(points, |a, b| a.dist(b));
    let pop_size = params.population_size.max(MIN_POPULATION);
    let elite = params.elite_size.min(pop_size);

    let mut population: Vec<Vec<usize>> = (0..pop_size)
        .map(|_| {
            let mut perm: Vec<usize> = (0..n).collect();
            perm.shuffle(rng);
            perm
        })
        .collect();

    let mut best: Option<(Vec<usize>, f64)> = None;

    for generation in 0..params.generations {
        let ranked = rank(&population, &dist, n);
        keep_best(&mut best, &population, &ranked);

        let pool = select(&ranked, elite, rng);
        let mut next = breed(&population, &pool, elite, rng);
        for individual in next.iter_mut().skip(elite) {
            mutate(individual, params.mutation_rate, rng);
        }
        population = next;

        if let Some((_, cost)) = &best {
            log::trace!("tsp.genetic: generation={generation} best={cost:.3}");
        }
    }

    let ranked = rank(&population, &dist, n);
    keep_best(&mut best, &population, &ranked);

    best.map(|(order, _)| order).unwrap_or_else(|| (0..n).collect())
}

/// `(index, cost)` pairs sorted by ascending cost; the sort is stable.
fn rank(population: &[Vec<usize>], dist: &[f64], n: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = population
        .iter()
        .enumerate()
        .map(|(idx, order)| {
            let len = order.len();
            let cost = (0..len)
                .map(|i| dist[order[i] * n + order[(i + 1) % len]])
                .sum();
            (idx, cost)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

fn keep_best(best: &mut Option<(Vec<usize>, f64)>, population: &[Vec<usize>], ranked: &[(usize, f64)]) {
    let Some(&(idx, cost)) = ranked.first() else {
        return;
    };
    if best.as_ref().is_none_or(|(_, b)| cost < *b) {
        *best = Some((population[idx].clone(), cost));
    }
}

/// Mating pool as population indices: the elite first, then roulette picks
/// weighted by `1 / cost`.
fn select<R: Rng + ?Sized>(ranked: &[(usize, f64)], elite: usize, rng: &mut R) -> Vec<usize> {
    let fitness: Vec<f64> = ranked
        .iter()
        .map(|(_, cost)| 1.0 / cost.max(f64::EPSILON))
        .collect();
    let total: f64 = fitness.iter().sum();

    let mut pool: Vec<usize> = ranked.iter().take(elite).map(|(idx, _)| *idx).collect();
    for _ in 0..(ranked.len() - elite) {
        let pick = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        let mut chosen = ranked[ranked.len() - 1].0;
        for (&(idx, _), f) in ranked.iter().zip(&fitness) {
            cumulative += f;
            if pick <= cumulative {
                chosen = idx;
                break;
            }
        }
        pool.push(chosen);
    }
    pool
}

fn breed<R: Rng + ?Sized>(
    population: &[Vec<usize>],
    pool: &[usize],
    elite: usize,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    let mut children: Vec<Vec<usize>> = pool[..elite]
        .iter()
        .map(|&idx| population[idx].clone())
        .collect();

    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    let len = shuffled.len();
    for i in 0..(len - elite) {
        let a = &population[shuffled[i]];
        let b = &population[shuffled[len - 1 - i]];
        children.push(ordered_crossover(a, b, rng));
    }
    children
}

/// Copies a random slice of `first` and appends the remaining genes in the
/// order they appear in `second`.
pub(crate) fn ordered_crossover<R: Rng + ?Sized>(
    first: &[usize],
    second: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let n = first.len();
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    let (start, end) = (a.min(b), a.max(b));

    let mut taken = vec![false; n];
    let mut child = Vec::with_capacity(n);
    for &gene in &first[start..end] {
        taken[gene] = true;
        child.push(gene);
    }
    child.extend(second.iter().copied().filter(|&gene| !taken[gene]));
    child
}

fn mutate<R: Rng + ?Sized>(individual: &mut [usize], rate: f64, rng: &mut R) {
    let n = individual.len();
    for swapped in 0..n {
        if rng.random::<f64>() < rate {
            let swap_with = rng.random_range(0..n);
            individual.swap(swapped, swap_with);
        }
    }
}
