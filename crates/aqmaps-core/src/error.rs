//! Error type shared by every planning component.

use crate::models::Location;
use thiserror::Error;

/// Failures the planner reports instead of degrading silently.
///
/// Running out of step budget is not listed here: the flight simulator
/// reports it on its [`FlightReport`](crate::flight::FlightReport).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No waypoints to plan around")]
    NoWaypoints,

    #[error("Waypoint list has no start location (a waypoint with an empty identifier)")]
    MissingStart,

    #[error("No-fly zone {index} is degenerate: {reason}")]
    DegenerateZone { index: usize, reason: String },

    #[error("No path from {from} to {to}: frontier exhausted after {expanded} expansions")]
    NoPathFound {
        from: Location,
        to: Location,
        expanded: usize,
    },

    #[error("Search from {from} to {to} exceeded the limit of {limit} expansions")]
    SearchLimit {
        from: Location,
        to: Location,
        limit: usize,
    },

    #[error("Waypoint index {index} out of range for {len} waypoints")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, PlanError>;
