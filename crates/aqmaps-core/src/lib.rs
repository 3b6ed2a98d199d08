pub mod config;
pub mod error;
pub mod flight;
pub mod geometry;
pub mod matrix;
pub mod mission;
pub mod models;
pub mod pathfinder;
pub mod reachable;
pub mod tour;
pub mod zones;

pub use config::{AcoConfig, FlightArea, PlannerConfig};
pub use error::{PlanError, Result};
pub use flight::{FlightRecord, FlightReport, FlightSimulator};
pub use geometry::{distance, segments_intersect, BoundingBox};
pub use matrix::DistanceMatrix;
pub use mission::{Mission, MissionReport};
pub use models::{Heading, Location, Path, PathStep, Pathable, Reading, Waypoint};
pub use pathfinder::{AStarPather, Pathfinder};
pub use reachable::{Neighbour, StepExpander, VisitedIndex};
pub use tour::{two_opt, AntColonySolver, Tour, TourSolution, TourSolver};
pub use zones::{NoFlyZone, ZoneIndex};
