//! Core data models for the flight planner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates closer than this (in degrees, per axis) name the same place.
pub const LOCATION_EPSILON: f64 = 1e-12;

/// A point in degree space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Euclidean distance in degree space.
    pub fn distance_to(&self, other: Location) -> f64 {
        crate::geometry::distance(*self, other)
    }

    /// Move one step of `step_size` degrees along `heading`.
    ///
    /// Heading 0 points east and angles grow anticlockwise, so heading 90
    /// points north.
    pub fn step(&self, heading: Heading, step_size: f64) -> Location {
        let radians = f64::from(heading.degrees()).to_radians();
        Location {
            lon: self.lon + step_size * radians.cos(),
            lat: self.lat + step_size * radians.sin(),
        }
    }

    /// Approximate coordinate equality.
    pub fn coincides(&self, other: Location) -> bool {
        (self.lon - other.lon).abs() <= LOCATION_EPSILON
            && (self.lat - other.lat).abs() <= LOCATION_EPSILON
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lon, self.lat)
    }
}

/// Direction of a move, a multiple of 5 degrees in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Heading(u16);

impl Heading {
    pub const INCREMENT: u16 = 5;

    /// Every legal heading, in ascending order.
    pub fn all() -> impl Iterator<Item = Heading> {
        (0..360).step_by(Self::INCREMENT as usize).map(Heading)
    }

    /// Returns `None` unless `degrees` is a multiple of 5 below 360.
    pub fn new(degrees: u16) -> Option<Self> {
        (degrees < 360 && degrees % Self::INCREMENT == 0).then_some(Heading(degrees))
    }

    /// Legal heading nearest to an arbitrary angle.
    pub fn nearest(degrees: f64) -> Self {
        let rounded = (degrees / f64::from(Self::INCREMENT)).round() * f64::from(Self::INCREMENT);
        Heading(rounded.rem_euclid(360.0) as u16 % 360)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn reversed(self) -> Self {
        Heading((self.0 + 180) % 360)
    }
}

impl TryFrom<u16> for Heading {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Heading::new(value).ok_or_else(|| format!("{value} is not a multiple of 5 below 360"))
    }
}

impl From<Heading> for u16 {
    fn from(heading: Heading) -> Self {
        heading.0
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A location paired with the heading used to arrive there.
///
/// The first step of a path has no heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub location: Location,
    pub heading: Option<Heading>,
}

impl PathStep {
    pub fn origin(location: Location) -> Self {
        Self {
            location,
            heading: None,
        }
    }
}

/// Non-empty sequence of steps produced by a pathfinder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Returns `None` for an empty step list.
    pub fn new(steps: Vec<PathStep>) -> Option<Self> {
        (!steps.is_empty()).then_some(Self { steps })
    }

    /// Single-step path sitting at `location`.
    pub fn origin(location: Location) -> Self {
        Self {
            steps: vec![PathStep::origin(location)],
        }
    }

    /// Callers guarantee `steps` is non-empty.
    pub(crate) fn from_steps(steps: Vec<PathStep>) -> Self {
        debug_assert!(!steps.is_empty());
        Self { steps }
    }

    pub(crate) fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    /// Keep the origin and the first `moves` moves.
    pub fn truncate_moves(&mut self, moves: usize) {
        self.steps.truncate(moves + 1);
    }

    pub fn start(&self) -> Location {
        self.steps[0].location
    }

    pub fn end(&self) -> Location {
        self.steps[self.steps.len() - 1].location
    }

    /// Number of locations, including the starting one.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of moves, one fewer than the number of locations.
    pub fn move_count(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Steps after the origin.
    pub fn moves(&self) -> &[PathStep] {
        &self.steps[1..]
    }

    pub fn into_steps(self) -> Vec<PathStep> {
        self.steps
    }
}

/// Value reported by a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reading {
    Value(f64),
    /// Reported as the string "NaN"
    NotANumber,
    /// Reported as the string "null"
    Null,
}

impl Reading {
    /// Parse the wire form: a number, `"NaN"` or `"null"`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "NaN" => Some(Reading::NotANumber),
            "null" => Some(Reading::Null),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Reading::Value),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(value) => Some(*value),
            Reading::NotANumber | Reading::Null => None,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(value) => write!(f, "{value}"),
            Reading::NotANumber => f.write_str("NaN"),
            Reading::Null => f.write_str("null"),
        }
    }
}

/// A sensor location the drone must approach, or the start/return point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Opaque identifier (a what3words address); empty for the start.
    pub id: String,
    pub location: Location,
    pub battery: f64,
    pub reading: Reading,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, location: Location, battery: f64, reading: Reading) -> Self {
        Self {
            id: id.into(),
            location,
            battery,
            reading,
        }
    }

    /// The distinguished start/return waypoint.
    pub fn start(location: Location) -> Self {
        Self {
            id: String::new(),
            location,
            battery: 0.0,
            reading: Reading::Null,
        }
    }

    pub fn is_start(&self) -> bool {
        self.id.is_empty()
    }
}

/// Anything the planner can route to.
pub trait Pathable {
    fn location(&self) -> Location;
}

impl Pathable for Location {
    fn location(&self) -> Location {
        *self
    }
}

impl Pathable for Waypoint {
    fn location(&self) -> Location {
        self.location
    }
}

impl<T: Pathable + ?Sized> Pathable for &T {
    fn location(&self) -> Location {
        (**self).location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_rejects_off_grid_values() {
        assert!(Heading::new(5).is_some());
        assert!(Heading::new(7).is_none());
        assert!(Heading::new(360).is_none());
        assert_eq!(Heading::all().count(), 72);
    }

    #[test]
    fn heading_nearest_wraps() {
        assert_eq!(Heading::nearest(358.0).degrees(), 0);
        assert_eq!(Heading::nearest(-2.6).degrees(), 355);
        assert_eq!(Heading::nearest(47.4).degrees(), 45);
        assert_eq!(Heading::nearest(90.0).reversed().degrees(), 270);
    }

    #[test]
    fn step_moves_east_and_north() {
        let origin = Location::new(0.0, 0.0);
        let east = origin.step(Heading::new(0).unwrap(), 0.0003);
        let north = origin.step(Heading::new(90).unwrap(), 0.0003);
        assert!((east.lon - 0.0003).abs() < 1e-15 && east.lat.abs() < 1e-15);
        assert!(north.lon.abs() < 1e-15 && (north.lat - 0.0003).abs() < 1e-15);
    }

    #[test]
    fn reading_parses_sentinels() {
        assert_eq!(Reading::parse("NaN"), Some(Reading::NotANumber));
        assert_eq!(Reading::parse("null"), Some(Reading::Null));
        assert_eq!(Reading::parse("123.45"), Some(Reading::Value(123.45)));
        assert_eq!(Reading::parse("abc"), None);
    }

    #[test]
    fn start_waypoint_has_empty_id() {
        let start = Waypoint::start(Location::new(-3.1878, 55.9444));
        assert!(start.is_start());
        assert!(!Waypoint::new("a.b.c", start.location, 50.0, Reading::Null).is_start());
    }

    #[test]
    fn path_rejects_empty_steps() {
        assert!(Path::new(Vec::new()).is_none());
        let path = Path::new(vec![PathStep::origin(Location::new(0.0, 0.0))]).unwrap();
        assert_eq!(path.move_count(), 0);
        assert!(path.moves().is_empty());
    }
}
