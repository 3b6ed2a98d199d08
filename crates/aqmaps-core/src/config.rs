//! Planner configuration.
//!
//! Every component takes a `&PlannerConfig` at construction; nothing in the
//! crate reads global state.

use crate::error::{PlanError, Result};
use crate::models::Location;
use serde::{Deserialize, Serialize};

/// Rectangular confinement area in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightArea {
    /// Upper latitude bound
    pub north: f64,
    /// Lower latitude bound
    pub south: f64,
    /// Lower longitude bound
    pub west: f64,
    /// Upper longitude bound
    pub east: f64,
}

impl Default for FlightArea {
    fn default() -> Self {
        // George Square confinement area.
        Self {
            north: 55.946233,
            south: 55.942617,
            west: -3.192473,
            east: -3.184319,
        }
    }
}

impl FlightArea {
    /// Bounds are inclusive: a point lying exactly on an edge is inside.
    pub fn contains(&self, location: Location) -> bool {
        location.lon >= self.west
            && location.lon <= self.east
            && location.lat >= self.south
            && location.lat <= self.north
    }

    fn validate(&self) -> Result<()> {
        let values = [self.north, self.south, self.west, self.east];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(PlanError::Config("flight area bounds must be finite".into()));
        }
        if self.north <= self.south {
            return Err(PlanError::Config(format!(
                "north bound ({}) must be above south bound ({})",
                self.north, self.south
            )));
        }
        if self.east <= self.west {
            return Err(PlanError::Config(format!(
                "east bound ({}) must be right of west bound ({})",
                self.east, self.west
            )));
        }
        Ok(())
    }
}

/// Ant colony parameters for the tour optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcoConfig {
    /// Construction rounds
    pub iterations: usize,
    /// Pheromone exponent (α)
    pub alpha: f64,
    /// Inverse-cost exponent (β)
    pub beta: f64,
    /// Fraction of pheromone removed after each round
    pub evaporation: f64,
    /// Pheromone deposit numerator (Q)
    pub deposit: f64,
    /// Ants per round; `None` means one ant per waypoint
    #[serde(default)]
    pub ants: Option<usize>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            alpha: 1.0,
            beta: 4.0,
            evaporation: 0.1,
            deposit: 1.0,
            ants: None,
        }
    }
}

impl AcoConfig {
    fn validate(&self) -> Result<()> {
        if !(self.evaporation > 0.0 && self.evaporation <= 1.0) {
            return Err(PlanError::Config(format!(
                "evaporation ({}) must be in (0, 1]",
                self.evaporation
            )));
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return Err(PlanError::Config("ACO exponents must be finite".into()));
        }
        if !(self.deposit.is_finite() && self.deposit > 0.0) {
            return Err(PlanError::Config(format!(
                "deposit ({}) must be positive",
                self.deposit
            )));
        }
        if self.ants == Some(0) {
            return Err(PlanError::Config("ant count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Immutable configuration for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub area: FlightArea,
    /// Length of one move in degrees
    pub step_size: f64,
    /// Arrival tolerance used when costing the distance matrix
    pub matrix_tolerance: f64,
    /// Arrival tolerance for each leg of the simulated flight
    pub arrival_tolerance: f64,
    /// Arrival tolerance for the final leg back to the start
    pub return_tolerance: f64,
    /// Total number of steps the drone may fly
    pub step_budget: usize,
    /// Optional cap on pathfinder expansions per search
    #[serde(default)]
    pub max_expansions: Option<usize>,
    #[serde(default)]
    pub aco: AcoConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            area: FlightArea::default(),
            step_size: 0.0003,
            matrix_tolerance: 0.0002,
            arrival_tolerance: 0.0002,
            return_tolerance: 0.0003,
            step_budget: 150,
            max_expansions: None,
            aco: AcoConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Default configuration confined to a different area.
    pub fn with_area(area: FlightArea) -> Self {
        Self {
            area,
            ..Self::default()
        }
    }

    /// Check the configuration shape before any component is built.
    pub fn validate(&self) -> Result<()> {
        self.area.validate()?;
        let positive = [
            ("step_size", self.step_size),
            ("matrix_tolerance", self.matrix_tolerance),
            ("arrival_tolerance", self.arrival_tolerance),
            ("return_tolerance", self.return_tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlanError::Config(format!("{name} ({value}) must be positive")));
            }
        }
        if self.max_expansions == Some(0) {
            return Err(PlanError::Config("max_expansions must be at least 1".into()));
        }
        self.aco.validate()
    }
}
