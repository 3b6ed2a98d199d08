//! Visiting-order optimization.
//!
//! An ant colony builds candidate orders over the distance matrix, the best
//! one is polished with 2-opt, and the result is rotated so the start comes
//! first. Tours are cyclic: the leg from the last entry back to the first is
//! implied and always counted.

use crate::config::AcoConfig;
use crate::error::{PlanError, Result};
use crate::matrix::DistanceMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Cyclic visiting order over waypoint indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    pub fn new(order: Vec<usize>) -> Self {
        Self { order }
    }

    /// Indices `0..n` in ascending order.
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).collect())
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn first(&self) -> Option<usize> {
        self.order.first().copied()
    }

    /// Cyclic cost, closing leg included.
    pub fn cost(&self, matrix: &DistanceMatrix) -> u64 {
        matrix.cycle_cost(&self.order)
    }

    /// Same cycle, starting at `start`. Unchanged if `start` is absent.
    pub fn rotated_to(mut self, start: usize) -> Self {
        if let Some(position) = self.order.iter().position(|&index| index == start) {
            self.order.rotate_left(position);
        }
        self
    }
}

/// Result of one solver run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourSolution {
    /// Final order, starting at the requested start index
    pub tour: Tour,
    /// Cost of the best constructed tour before local search
    pub constructed_cost: u64,
    /// Cost after local search
    pub refined_cost: u64,
}

/// Produces a closed visiting order over a distance matrix.
pub trait TourSolver {
    fn solve(&mut self, matrix: &DistanceMatrix, start: usize) -> Result<TourSolution>;
}

/// Reverse slices `[i, j)` while that strictly lowers the cyclic cost,
/// until a full pass finds nothing to improve.
pub fn two_opt(tour: Tour, matrix: &DistanceMatrix) -> Tour {
    let mut order = tour.order;
    let n = order.len();
    let mut best = matrix.cycle_cost(&order);
    loop {
        let mut improved = false;
        for i in 0..n {
            for j in i + 2..=n {
                order[i..j].reverse();
                let cost = matrix.cycle_cost(&order);
                if cost < best {
                    best = cost;
                    improved = true;
                } else {
                    order[i..j].reverse();
                }
            }
        }
        if !improved {
            break;
        }
    }
    Tour::new(order)
}

/// Ant System construction followed by 2-opt.
///
/// Every random draw comes from one seeded generator in a fixed order, so a
/// seed reproduces a run exactly.
#[derive(Debug, Clone)]
pub struct AntColonySolver {
    config: AcoConfig,
    rng: StdRng,
}

impl AntColonySolver {
    pub fn new(config: AcoConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Best tour found by the colony alone, with its cost.
    ///
    /// The identity order is the incumbent until an ant beats it.
    pub fn construct(&mut self, matrix: &DistanceMatrix) -> (Tour, u64) {
        let n = matrix.len();
        let mut best = Tour::identity(n);
        let mut best_cost = best.cost(matrix);
        if n < 2 {
            return (best, best_cost);
        }

        let ants = self.config.ants.unwrap_or(n);
        let mut pheromone = vec![vec![1.0_f64; n]; n];

        for _ in 0..self.config.iterations {
            let mut round = Vec::with_capacity(ants);
            for _ in 0..ants {
                let order = self.walk(matrix, &pheromone);
                let cost = matrix.cycle_cost(&order);
                if cost < best_cost {
                    best_cost = cost;
                    best = Tour::new(order.clone());
                }
                round.push((order, cost));
            }

            let keep = 1.0 - self.config.evaporation;
            for row in pheromone.iter_mut() {
                for level in row.iter_mut() {
                    *level *= keep;
                }
            }
            for (order, cost) in &round {
                let amount = self.config.deposit / (*cost).max(1) as f64;
                for edge in order.windows(2) {
                    pheromone[edge[0]][edge[1]] += amount;
                }
            }
        }

        (best, best_cost)
    }

    /// One ant: a random first stop, then weighted draws over the rest.
    fn walk(&mut self, matrix: &DistanceMatrix, pheromone: &[Vec<f64>]) -> Vec<usize> {
        let n = matrix.len();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);

        let first = self.rng.random_range(0..n);
        visited[first] = true;
        order.push(first);

        while order.len() < n {
            let current = order[order.len() - 1];
            let candidates: Vec<usize> = (0..n).filter(|&index| !visited[index]).collect();
            let weights: Vec<f64> = candidates
                .iter()
                .map(|&next| {
                    let closeness = 1.0 / f64::from(matrix.cost(current, next).max(1));
                    pheromone[current][next].powf(self.config.alpha)
                        * closeness.powf(self.config.beta)
                })
                .collect();
            let total: f64 = weights.iter().sum();

            let draw: f64 = self.rng.random();
            let mut next = candidates[0];
            if total > 0.0 && total.is_finite() {
                let mut cumulative = 0.0;
                for (&candidate, weight) in candidates.iter().zip(&weights) {
                    cumulative += weight / total;
                    if draw < cumulative {
                        next = candidate;
                        break;
                    }
                }
            }

            visited[next] = true;
            order.push(next);
        }
        order
    }
}

impl TourSolver for AntColonySolver {
    fn solve(&mut self, matrix: &DistanceMatrix, start: usize) -> Result<TourSolution> {
        if matrix.is_empty() {
            return Err(PlanError::NoWaypoints);
        }
        if start >= matrix.len() {
            return Err(PlanError::IndexOutOfRange {
                index: start,
                len: matrix.len(),
            });
        }

        let (constructed, constructed_cost) = self.construct(matrix);
        tracing::info!(cost = constructed_cost, "ant colony best tour");

        let refined = two_opt(constructed, matrix);
        let refined_cost = refined.cost(matrix);
        tracing::info!(cost = refined_cost, "2-opt refined tour");

        Ok(TourSolution {
            tour: refined.rotated_to(start),
            constructed_cost,
            refined_cost,
        })
    }
}
