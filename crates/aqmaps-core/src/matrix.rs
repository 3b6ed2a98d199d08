//! Pairwise step costs between waypoints.

use crate::error::{PlanError, Result};
use crate::models::{Location, Pathable};
use crate::pathfinder::Pathfinder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Square, possibly asymmetric matrix of path lengths.
///
/// `cost(i, j)` is the number of locations on the path from waypoint `i`
/// to waypoint `j`, counting the starting one; the diagonal is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    costs: Vec<Vec<u32>>,
}

impl DistanceMatrix {
    /// Run the pathfinder for every ordered pair of distinct points.
    ///
    /// Rows are built in parallel; each search only reads shared state.
    pub fn build<P, T>(pather: &P, points: &[T], tolerance: f64) -> Result<Self>
    where
        P: Pathfinder + Sync,
        T: Pathable + Sync,
    {
        let locations: Vec<Location> = points.iter().map(|point| point.location()).collect();
        let costs = locations
            .par_iter()
            .enumerate()
            .map(|(i, &from)| {
                locations
                    .iter()
                    .enumerate()
                    .map(|(j, &to)| {
                        if i == j {
                            Ok(0)
                        } else {
                            let path = pather.find_path(from, to, tolerance)?;
                            Ok(u32::try_from(path.len()).unwrap_or(u32::MAX))
                        }
                    })
                    .collect::<Result<Vec<u32>>>()
            })
            .collect::<Result<Vec<Vec<u32>>>>()?;

        let matrix = Self { costs };
        tracing::debug!(
            waypoints = matrix.len(),
            asymmetric_pairs = matrix.asymmetric_pairs(),
            "built distance matrix"
        );
        Ok(matrix)
    }

    /// Wrap precomputed rows. Rows must form a square with a zero diagonal.
    pub fn from_rows(costs: Vec<Vec<u32>>) -> Result<Self> {
        let n = costs.len();
        for (i, row) in costs.iter().enumerate() {
            if row.len() != n {
                return Err(PlanError::Config(format!(
                    "distance matrix row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            if row[i] != 0 {
                return Err(PlanError::Config(format!(
                    "distance matrix diagonal entry {i} is {}",
                    row[i]
                )));
            }
        }
        Ok(Self { costs })
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Panics if either index is out of range.
    pub fn cost(&self, from: usize, to: usize) -> u32 {
        self.costs[from][to]
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.costs
    }

    /// Number of unordered pairs whose two directions differ.
    pub fn asymmetric_pairs(&self) -> usize {
        let n = self.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.costs[i][j] != self.costs[j][i])
            .count()
    }

    /// Cost of visiting `order` and closing back to its first entry.
    pub fn cycle_cost(&self, order: &[usize]) -> u64 {
        if order.len() < 2 {
            return 0;
        }
        let open: u64 = order
            .windows(2)
            .map(|leg| u64::from(self.costs[leg[0]][leg[1]]))
            .sum();
        open + u64::from(self.costs[order[order.len() - 1]][order[0]])
    }
}
