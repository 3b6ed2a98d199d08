//! aqmaps CLI - plans and records one day's sensor collection flight.
//!
//! The `aqmaps` binary fetches the day's map data, runs the planner and
//! writes the step log and the readings map.

pub mod config;
pub mod output;

pub use config::Config;
pub use output::{render_flight_log, render_readings, write_outputs, OutputPaths};
