//! End-to-end planning run: matrix, tour, flight.

use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::flight::{FlightReport, FlightSimulator};
use crate::matrix::DistanceMatrix;
use crate::models::Waypoint;
use crate::pathfinder::AStarPather;
use crate::tour::{AntColonySolver, Tour, TourSolver};
use crate::zones::ZoneIndex;
use serde::Serialize;

/// Everything a planning run produced.
#[derive(Debug, Clone, Serialize)]
pub struct MissionReport {
    pub matrix: DistanceMatrix,
    pub tour: Tour,
    /// Best tour cost found by construction alone
    pub constructed_cost: u64,
    /// Tour cost after local search
    pub refined_cost: u64,
    pub flight: FlightReport,
}

/// Validated inputs for one day's flight.
#[derive(Debug, Clone)]
pub struct Mission {
    config: PlannerConfig,
    waypoints: Vec<Waypoint>,
    start: usize,
    pather: AStarPather,
}

impl Mission {
    /// Fails fast on invalid configuration, an empty waypoint list, or a
    /// missing or out-of-area start waypoint.
    pub fn new(config: PlannerConfig, zones: ZoneIndex, waypoints: Vec<Waypoint>) -> Result<Self> {
        config.validate()?;
        if waypoints.is_empty() {
            return Err(PlanError::NoWaypoints);
        }
        let start = waypoints
            .iter()
            .position(Waypoint::is_start)
            .ok_or(PlanError::MissingStart)?;
        let home = waypoints[start].location;
        if !config.area.contains(home) {
            return Err(PlanError::Config(format!(
                "start location {home} lies outside the flight area"
            )));
        }
        let pather = AStarPather::new(&config, zones);
        Ok(Self {
            config,
            waypoints,
            start,
            pather,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Index of the start waypoint.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn pather(&self) -> &AStarPather {
        &self.pather
    }

    /// Plan with the ant colony solver seeded by `seed`.
    pub fn run(&self, seed: u64) -> Result<MissionReport> {
        let mut solver = AntColonySolver::new(self.config.aco.clone(), seed);
        self.run_with(&mut solver)
    }

    pub fn run_with<S: TourSolver>(&self, solver: &mut S) -> Result<MissionReport> {
        tracing::info!(
            waypoints = self.waypoints.len(),
            zones = self.pather.zones().len(),
            "planning mission"
        );
        let matrix =
            DistanceMatrix::build(&self.pather, &self.waypoints, self.config.matrix_tolerance)?;
        let solution = solver.solve(&matrix, self.start)?;
        let flight = FlightSimulator::new(&self.config, &self.pather)
            .fly(&self.waypoints, &solution.tour)?;
        tracing::info!(
            steps = flight.steps,
            reached = flight.reached.len(),
            unreached = flight.unreached.len(),
            "mission flown"
        );

        Ok(MissionReport {
            matrix,
            tour: solution.tour,
            constructed_cost: solution.constructed_cost,
            refined_cost: solution.refined_cost,
            flight,
        })
    }
}
