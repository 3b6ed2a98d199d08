//! No-fly zones and the obstruction index built over them.

use crate::error::{PlanError, Result};
use crate::geometry::{segments_intersect, BoundingBox};
use crate::models::Location;
use serde::Serialize;

/// A polygonal region the flight path must never cross.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoFlyZone {
    /// Closed ring of boundary vertices (first == last)
    ring: Vec<Location>,
    bbox: BoundingBox,
}

impl NoFlyZone {
    /// Build a zone from a closed vertex ring.
    ///
    /// `index` is only used to label the error.
    pub fn new(index: usize, ring: Vec<Location>) -> Result<Self> {
        if ring.len() < 4 {
            return Err(PlanError::DegenerateZone {
                index,
                reason: format!("ring has {} vertices, need at least 4", ring.len()),
            });
        }
        if ring.iter().any(|v| !v.lon.is_finite() || !v.lat.is_finite()) {
            return Err(PlanError::DegenerateZone {
                index,
                reason: "ring has a non-finite coordinate".into(),
            });
        }
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        if !first.coincides(last) {
            return Err(PlanError::DegenerateZone {
                index,
                reason: format!("ring is not closed ({first} != {last})"),
            });
        }
        let bbox = BoundingBox::from_points(&ring).ok_or_else(|| PlanError::DegenerateZone {
            index,
            reason: "ring is empty".into(),
        })?;
        Ok(Self { ring, bbox })
    }

    pub fn ring(&self) -> &[Location] {
        &self.ring
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Exact test against every boundary edge.
    pub fn boundary_crossed_by(&self, from: Location, to: Location) -> bool {
        self.ring
            .windows(2)
            .any(|edge| segments_intersect(from, to, edge[0], edge[1]))
    }

    /// Broad phase on the bounding box, then the exact boundary test.
    pub fn obstructs(&self, from: Location, to: Location) -> bool {
        self.bbox.may_touch_segment(from, to) && self.boundary_crossed_by(from, to)
    }
}

/// Zones built once per run, addressed by their position in the load order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneIndex {
    zones: Vec<NoFlyZone>,
}

impl ZoneIndex {
    pub fn new(zones: Vec<NoFlyZone>) -> Self {
        tracing::debug!(zones = zones.len(), "built no-fly zone index");
        Self { zones }
    }

    /// Validate and index raw vertex rings.
    pub fn from_rings<I>(rings: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<Location>>,
    {
        let zones = rings
            .into_iter()
            .enumerate()
            .map(|(index, ring)| NoFlyZone::new(index, ring))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(zones))
    }

    pub fn zones(&self) -> &[NoFlyZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Index of the first zone whose boundary the segment crosses.
    pub fn obstructing_zone(&self, from: Location, to: Location) -> Option<usize> {
        self.zones.iter().position(|zone| zone.obstructs(from, to))
    }

    pub fn is_obstructed(&self, from: Location, to: Location) -> bool {
        self.obstructing_zone(from, to).is_some()
    }
}
