//! Flat-plane geometry in degree space.
//!
//! The confinement area is a few hundred metres across, so longitude and
//! latitude are treated as Cartesian coordinates with no projection.

use crate::models::Location;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Euclidean distance between two locations in degrees.
pub fn distance(a: Location, b: Location) -> f64 {
    (a.lon - b.lon).hypot(a.lat - b.lat)
}

/// Turn direction of an ordered triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Collinear,
    Anticlockwise,
}

/// Orientation of `(p, q, r)` from the sign of the cross product.
pub fn orientation(p: Location, q: Location, r: Location) -> Orientation {
    let cross = (q.lat - p.lat) * (r.lon - q.lon) - (r.lat - q.lat) * (q.lon - p.lon);
    match cross.partial_cmp(&0.0) {
        Some(Ordering::Greater) => Orientation::Clockwise,
        Some(Ordering::Less) => Orientation::Anticlockwise,
        _ => Orientation::Collinear,
    }
}

/// Whether `q` lies within the axis-aligned extent of segment `p`-`r`.
///
/// Only meaningful when the three points are collinear.
fn on_segment(p: Location, q: Location, r: Location) -> bool {
    q.lon <= p.lon.max(r.lon)
        && q.lon >= p.lon.min(r.lon)
        && q.lat <= p.lat.max(r.lat)
        && q.lat >= p.lat.min(r.lat)
}

/// Whether segment `a`-`b` intersects segment `c`-`d`.
///
/// Proper crossings, touching endpoints and collinear overlaps all count.
pub fn segments_intersect(a: Location, b: Location, c: Location, d: Location) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(a, c, b))
        || (o2 == Orientation::Collinear && on_segment(a, d, b))
        || (o3 == Orientation::Collinear && on_segment(c, a, d))
        || (o4 == Orientation::Collinear && on_segment(c, b, d))
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub north: f64,
    pub east: f64,
    pub south: f64,
}

impl BoundingBox {
    /// Smallest box covering every point; `None` for an empty slice.
    pub fn from_points(points: &[Location]) -> Option<Self> {
        let first = points.first()?;
        let initial = BoundingBox {
            west: first.lon,
            north: first.lat,
            east: first.lon,
            south: first.lat,
        };
        Some(points.iter().fold(initial, |bbox, p| BoundingBox {
            west: bbox.west.min(p.lon),
            north: bbox.north.max(p.lat),
            east: bbox.east.max(p.lon),
            south: bbox.south.min(p.lat),
        }))
    }

    /// Strict interior test; points on an edge are outside.
    pub fn strictly_contains(&self, point: Location) -> bool {
        point.lon > self.west && point.lon < self.east && point.lat < self.north && point.lat > self.south
    }

    /// The four edges, clockwise from the north-west corner.
    pub fn edges(&self) -> [(Location, Location); 4] {
        let nw = Location::new(self.west, self.north);
        let ne = Location::new(self.east, self.north);
        let se = Location::new(self.east, self.south);
        let sw = Location::new(self.west, self.south);
        [(nw, ne), (ne, se), (se, sw), (sw, nw)]
    }

    /// Broad-phase test: segment ends inside the box or crosses an edge.
    pub fn may_touch_segment(&self, from: Location, to: Location) -> bool {
        self.strictly_contains(to)
            || self
                .edges()
                .iter()
                .any(|&(c, d)| segments_intersect(from, to, c, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lon: f64, lat: f64) -> Location {
        Location::new(lon, lat)
    }

    #[test]
    fn distance_is_euclidean_in_degrees() {
        assert!((distance(loc(0.0, 0.0), loc(3.0, 4.0)) - 5.0).abs() < 1e-12);
        assert_eq!(distance(loc(1.0, 1.0), loc(1.0, 1.0)), 0.0);
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect(
            loc(0.0, 0.0),
            loc(1.0, 1.0),
            loc(0.0, 1.0),
            loc(1.0, 0.0)
        ));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(!segments_intersect(
            loc(0.0, 0.0),
            loc(1.0, 0.0),
            loc(0.0, 1.0),
            loc(1.0, 1.0)
        ));
    }

    #[test]
    fn endpoint_on_other_segment_counts() {
        // T-junction: (0.5, 0) lies on the first segment.
        assert!(segments_intersect(
            loc(0.0, 0.0),
            loc(1.0, 0.0),
            loc(0.5, 0.0),
            loc(0.5, 1.0)
        ));
    }

    #[test]
    fn collinear_disjoint_segments_do_not_intersect() {
        assert!(!segments_intersect(
            loc(0.0, 0.0),
            loc(1.0, 0.0),
            loc(2.0, 0.0),
            loc(3.0, 0.0)
        ));
    }

    #[test]
    fn collinear_overlap_intersects() {
        assert!(segments_intersect(
            loc(0.0, 0.0),
            loc(2.0, 0.0),
            loc(1.0, 0.0),
            loc(3.0, 0.0)
        ));
    }

    #[test]
    fn bounding_box_covers_points() {
        let bbox =
            BoundingBox::from_points(&[loc(1.0, 2.0), loc(-1.0, 5.0), loc(3.0, -2.0)]).unwrap();
        assert_eq!(bbox.west, -1.0);
        assert_eq!(bbox.east, 3.0);
        assert_eq!(bbox.north, 5.0);
        assert_eq!(bbox.south, -2.0);
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn broad_phase_fires_for_segment_entering_box() {
        let bbox = BoundingBox {
            west: 0.0,
            north: 1.0,
            east: 1.0,
            south: 0.0,
        };
        assert!(bbox.may_touch_segment(loc(-1.0, 0.5), loc(0.5, 0.5)));
        assert!(bbox.may_touch_segment(loc(-1.0, 0.5), loc(2.0, 0.5)));
        assert!(!bbox.may_touch_segment(loc(-1.0, 2.0), loc(2.0, 2.0)));
    }
}
