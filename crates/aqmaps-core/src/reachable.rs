//! One-step neighbourhood expansion.

use crate::config::{FlightArea, PlannerConfig};
use crate::geometry::distance;
use crate::models::{Heading, Location};
use crate::zones::ZoneIndex;
use std::collections::HashMap;

/// A location one step away together with the heading that reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub location: Location,
    pub heading: Heading,
}

/// Locations the search has already expanded, bucketed on a step-sized grid.
///
/// A proximity query only has to look at the 3x3 block of cells around the
/// probe instead of every visited location.
#[derive(Debug, Clone)]
pub struct VisitedIndex {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<Location>>,
    len: usize,
}

impl VisitedIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        }
    }

    fn cell_of(&self, location: Location) -> (i64, i64) {
        (
            (location.lon / self.cell_size).floor() as i64,
            (location.lat / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, location: Location) {
        let cell = self.cell_of(location);
        self.cells.entry(cell).or_default().push(location);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any visited location lies strictly closer than `radius`.
    ///
    /// `radius` must not exceed the cell size.
    pub fn any_within(&self, location: Location, radius: f64) -> bool {
        debug_assert!(radius <= self.cell_size);
        let (cx, cy) = self.cell_of(location);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    if bucket.iter().any(|&p| distance(p, location) < radius) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Enumerates the legal moves from a location.
#[derive(Debug, Clone)]
pub struct StepExpander<'a> {
    area: FlightArea,
    step_size: f64,
    zones: &'a ZoneIndex,
}

impl<'a> StepExpander<'a> {
    pub fn new(config: &PlannerConfig, zones: &'a ZoneIndex) -> Self {
        Self {
            area: config.area,
            step_size: config.step_size,
            zones,
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Empty visited index sized for this expander.
    pub fn visited_index(&self) -> VisitedIndex {
        VisitedIndex::new(self.step_size)
    }

    /// Whether a single move from `from` to `to` is legal, ignoring visits.
    pub fn is_legal_move(&self, from: Location, to: Location) -> bool {
        self.area.contains(to) && !self.zones.is_obstructed(from, to)
    }

    /// Every location one step from `current` that stays in the area, keeps
    /// a full step clear of `visited`, and does not cross a zone boundary.
    ///
    /// Results come out in ascending heading order.
    pub fn reachable(&self, current: Location, visited: &VisitedIndex) -> Vec<Neighbour> {
        Heading::all()
            .filter_map(|heading| {
                let candidate = current.step(heading, self.step_size);
                if !self.area.contains(candidate) {
                    return None;
                }
                if visited.any_within(candidate, self.step_size) {
                    return None;
                }
                if self.zones.is_obstructed(current, candidate) {
                    return None;
                }
                Some(Neighbour {
                    location: candidate,
                    heading,
                })
            })
            .collect()
    }
}
