//! Point-to-point search over the step graph.
//!
//! The search is best-first over partial paths. Each branch is ranked by
//! `steps + remaining * scale`, where `remaining` is the straight-line
//! distance to the goal in step lengths. Headings are quantized, so the raw
//! estimate undercounts; two branches are compared with the smaller of
//! their `ceil(remaining) / remaining` ratios applied to both.

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::geometry::distance;
use crate::models::{Heading, Location, Path, PathStep};
use crate::reachable::StepExpander;
use crate::zones::ZoneIndex;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Finds a legal step sequence between two locations.
pub trait Pathfinder {
    /// Path from `start` whose last location lies strictly within
    /// `tolerance` of `end`. The path always contains at least one move.
    fn find_path(&self, start: Location, end: Location, tolerance: f64) -> Result<Path>;
}

#[derive(Debug, Clone, Copy)]
struct SearchNode {
    location: Location,
    heading: Option<Heading>,
    parent: Option<usize>,
}

/// Frontier entry. `seq` doubles as the arena index of its last node.
#[derive(Debug, Clone, Copy)]
struct Branch {
    seq: usize,
    steps: usize,
    remaining: f64,
}

fn ceiling_ratio(remaining: f64) -> f64 {
    if remaining > 0.0 {
        remaining.ceil() / remaining
    } else {
        1.0
    }
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Branch {}

impl PartialOrd for Branch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Branch {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = ceiling_ratio(self.remaining).min(ceiling_ratio(other.remaining));
        let own = self.steps as f64 + self.remaining * scale;
        let theirs = other.steps as f64 + other.remaining * scale;
        own.total_cmp(&theirs).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A* over the implicit graph of 5-degree moves.
#[derive(Debug, Clone)]
pub struct AStarPather {
    config: PlannerConfig,
    zones: ZoneIndex,
}

impl AStarPather {
    pub fn new(config: &PlannerConfig, zones: ZoneIndex) -> Self {
        Self {
            config: config.clone(),
            zones,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn zones(&self) -> &ZoneIndex {
        &self.zones
    }

    fn expander(&self) -> StepExpander<'_> {
        StepExpander::new(&self.config, &self.zones)
    }

    /// Start already sits within tolerance: take the neighbour nearest the
    /// goal, and step straight back if that neighbour misses it.
    fn leave_and_return(
        &self,
        expander: &StepExpander<'_>,
        start: Location,
        end: Location,
        tolerance: f64,
    ) -> Result<Path> {
        let neighbours = expander.reachable(start, &expander.visited_index());
        let closest = neighbours
            .iter()
            .min_by(|a, b| distance(a.location, end).total_cmp(&distance(b.location, end)))
            .ok_or(PlanError::NoPathFound {
                from: start,
                to: end,
                expanded: 0,
            })?;

        let mut path = Path::origin(start);
        path.push(PathStep {
            location: closest.location,
            heading: Some(closest.heading),
        });
        if distance(closest.location, end) >= tolerance {
            let back = closest.heading.reversed();
            path.push(PathStep {
                location: closest.location.step(back, expander.step_size()),
                heading: Some(back),
            });
        }
        Ok(path)
    }
}

fn trace_path(nodes: &[SearchNode], last: usize) -> Path {
    let mut steps = Vec::new();
    let mut cursor = Some(last);
    while let Some(index) = cursor {
        let node = nodes[index];
        steps.push(PathStep {
            location: node.location,
            heading: node.heading,
        });
        cursor = node.parent;
    }
    steps.reverse();
    Path::from_steps(steps)
}

impl Pathfinder for AStarPather {
    fn find_path(&self, start: Location, end: Location, tolerance: f64) -> Result<Path> {
        let expander = self.expander();
        if distance(start, end) < tolerance {
            return self.leave_and_return(&expander, start, end, tolerance);
        }

        let step_size = expander.step_size();
        let remaining_from = |location: Location| distance(location, end) / step_size;

        let mut nodes = vec![SearchNode {
            location: start,
            heading: None,
            parent: None,
        }];
        let mut frontier: BinaryHeap<Reverse<Branch>> = BinaryHeap::new();
        frontier.push(Reverse(Branch {
            seq: 0,
            steps: 0,
            remaining: remaining_from(start),
        }));
        let mut visited = expander.visited_index();
        let mut expanded = 0usize;

        while let Some(Reverse(branch)) = frontier.pop() {
            let current = nodes[branch.seq];
            if distance(current.location, end) < tolerance {
                tracing::trace!(%start, %end, expanded, steps = branch.steps, "path found");
                return Ok(trace_path(&nodes, branch.seq));
            }

            if let Some(limit) = self.config.max_expansions {
                if expanded >= limit {
                    return Err(PlanError::SearchLimit {
                        from: start,
                        to: end,
                        limit,
                    });
                }
            }
            expanded += 1;

            for neighbour in expander.reachable(current.location, &visited) {
                let seq = nodes.len();
                nodes.push(SearchNode {
                    location: neighbour.location,
                    heading: Some(neighbour.heading),
                    parent: Some(branch.seq),
                });
                frontier.push(Reverse(Branch {
                    seq,
                    steps: branch.steps + 1,
                    remaining: remaining_from(neighbour.location),
                }));
            }
            visited.insert(current.location);
        }

        tracing::debug!(%start, %end, expanded, "frontier exhausted");
        Err(PlanError::NoPathFound {
            from: start,
            to: end,
            expanded,
        })
    }
}
