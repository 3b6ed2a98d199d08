//! Simulated flight of a tour under a step budget.

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::geometry::distance;
use crate::models::{Heading, Location, Waypoint};
use crate::pathfinder::Pathfinder;
use crate::tour::Tour;
use serde::Serialize;

/// One location of the flown path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    pub location: Location,
    /// Heading of the move that arrived here; `None` for the take-off point
    pub heading: Option<Heading>,
    /// Identifier of the waypoint this move reached, if any
    pub waypoint: Option<String>,
}

/// Outcome of a simulated flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightReport {
    /// Take-off point followed by one record per move
    pub records: Vec<FlightRecord>,
    /// Waypoint indices reached, in visiting order
    pub reached: Vec<usize>,
    /// Waypoint indices on the tour that were not reached, in tour order
    pub unreached: Vec<usize>,
    /// Moves flown
    pub steps: usize,
    pub budget_exhausted: bool,
}

impl FlightReport {
    pub fn flown_path(&self) -> impl Iterator<Item = Location> + '_ {
        self.records.iter().map(|record| record.location)
    }
}

/// Walks a tour leg by leg through a pathfinder.
#[derive(Debug, Clone)]
pub struct FlightSimulator<'a, P> {
    pather: &'a P,
    arrival_tolerance: f64,
    return_tolerance: f64,
    step_budget: usize,
}

impl<'a, P: Pathfinder> FlightSimulator<'a, P> {
    pub fn new(config: &PlannerConfig, pather: &'a P) -> Self {
        Self {
            pather,
            arrival_tolerance: config.arrival_tolerance,
            return_tolerance: config.return_tolerance,
            step_budget: config.step_budget,
        }
    }

    /// Fly `tour` over `waypoints`, taking off from the first tour entry and
    /// returning to it.
    ///
    /// Each leg starts where the previous one actually ended. The flight
    /// stops at the exact move that spends the budget.
    pub fn fly(&self, waypoints: &[Waypoint], tour: &Tour) -> Result<FlightReport> {
        let order = tour.order();
        if let Some(&index) = order.iter().find(|&&index| index >= waypoints.len()) {
            return Err(PlanError::IndexOutOfRange {
                index,
                len: waypoints.len(),
            });
        }
        let Some(&home) = order.first() else {
            return Err(PlanError::NoWaypoints);
        };

        let mut current = waypoints[home].location;
        let mut records = vec![FlightRecord {
            location: current,
            heading: None,
            waypoint: None,
        }];
        let mut reached = Vec::new();
        let mut steps = 0usize;
        let mut budget_exhausted = false;

        // Sensor legs, then the return leg home.
        let targets = order[1..]
            .iter()
            .map(|&index| (index, false))
            .chain((order.len() > 1).then_some((home, true)));

        for (target_index, is_return) in targets {
            if steps >= self.step_budget {
                budget_exhausted = true;
                break;
            }
            let target = &waypoints[target_index];
            let tolerance = if is_return {
                self.return_tolerance
            } else {
                self.arrival_tolerance
            };

            let mut leg = self.pather.find_path(current, target.location, tolerance)?;
            let remaining = self.step_budget - steps;
            if leg.move_count() > remaining {
                leg.truncate_moves(remaining);
                budget_exhausted = true;
            }

            for step in leg.moves() {
                records.push(FlightRecord {
                    location: step.location,
                    heading: step.heading,
                    waypoint: None,
                });
            }
            steps += leg.move_count();
            current = leg.end();

            let arrived = distance(current, target.location) < self.arrival_tolerance;
            if !is_return && arrived && leg.move_count() > 0 {
                if let Some(last) = records.last_mut() {
                    last.waypoint = Some(target.id.clone());
                }
                reached.push(target_index);
            }
            tracing::debug!(
                target = %target.location,
                moves = leg.move_count(),
                arrived,
                steps,
                "flew leg"
            );

            if budget_exhausted {
                tracing::info!(steps, budget = self.step_budget, "step budget exhausted");
                break;
            }
        }

        let unreached = order[1..]
            .iter()
            .copied()
            .filter(|index| !reached.contains(index))
            .collect();

        Ok(FlightReport {
            records,
            reached,
            unreached,
            steps,
            budget_exhausted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlightArea;
    use crate::models::Reading;
    use crate::pathfinder::AStarPather;
    use crate::zones::ZoneIndex;

    fn config(budget: usize) -> PlannerConfig {
        PlannerConfig {
            step_budget: budget,
            ..PlannerConfig::with_area(FlightArea {
                north: 0.005,
                south: -0.005,
                west: -0.005,
                east: 0.005,
            })
        }
    }

    fn waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint::start(Location::new(0.0, 0.0)),
            Waypoint::new("one.two.three", Location::new(0.0009, 0.0), 90.0, Reading::Value(40.0)),
        ]
    }

    #[test]
    fn out_and_back_reaches_the_sensor() {
        let config = config(150);
        let pather = AStarPather::new(&config, ZoneIndex::default());
        let report = FlightSimulator::new(&config, &pather)
            .fly(&waypoints(), &Tour::new(vec![0, 1]))
            .unwrap();

        assert_eq!(report.reached, vec![1]);
        assert!(report.unreached.is_empty());
        assert!(!report.budget_exhausted);
        assert_eq!(report.steps, report.records.len() - 1);
        assert_eq!(report.records[3].waypoint.as_deref(), Some("one.two.three"));
        let home = report.records.last().unwrap().location;
        assert!(distance(home, Location::new(0.0, 0.0)) < 0.0003);
    }

    #[test]
    fn budget_cuts_the_flight_mid_leg() {
        let config = config(2);
        let pather = AStarPather::new(&config, ZoneIndex::default());
        let report = FlightSimulator::new(&config, &pather)
            .fly(&waypoints(), &Tour::new(vec![0, 1]))
            .unwrap();

        assert_eq!(report.steps, 2);
        assert_eq!(report.records.len(), 3);
        assert!(report.budget_exhausted);
        assert!(report.reached.is_empty());
        assert_eq!(report.unreached, vec![1]);
        assert!(report.records.iter().all(|record| record.waypoint.is_none()));
    }

    #[test]
    fn lone_start_does_not_fly() {
        let config = config(150);
        let pather = AStarPather::new(&config, ZoneIndex::default());
        let report = FlightSimulator::new(&config, &pather)
            .fly(&waypoints(), &Tour::new(vec![0]))
            .unwrap();
        assert_eq!(report.steps, 0);
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn tour_index_must_name_a_waypoint() {
        let config = config(150);
        let pather = AStarPather::new(&config, ZoneIndex::default());
        let err = FlightSimulator::new(&config, &pather)
            .fly(&waypoints(), &Tour::new(vec![0, 5]))
            .unwrap_err();
        assert_eq!(err, PlanError::IndexOutOfRange { index: 5, len: 2 });
    }
}
