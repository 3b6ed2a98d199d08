//! Wire formats served by the map web server.

use anyhow::{anyhow, Result};
use aqmaps_core::{Location, Reading};
use serde::Deserialize;

/// One entry of `air-quality-data.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorRecord {
    /// what3words address, `word.word.word`
    pub location: String,
    pub battery: f64,
    pub reading: RawReading,
}

/// Readings arrive as strings (`"51.2"`, `"NaN"`, `"null"`) but plain numbers
/// are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawReading {
    Number(f64),
    Text(String),
}

impl RawReading {
    pub fn parse(&self) -> Result<Reading> {
        match self {
            RawReading::Number(value) => Ok(Reading::Value(*value)),
            RawReading::Text(text) => {
                Reading::parse(text).ok_or_else(|| anyhow!("unparseable sensor reading {text:?}"))
            }
        }
    }
}

/// `details.json` for a what3words square. Only the centre is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordsDetails {
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl From<Coordinates> for Location {
    fn from(coordinates: Coordinates) -> Self {
        Location::new(coordinates.lng, coordinates.lat)
    }
}

/// The parts of a GeoJSON FeatureCollection the planner reads.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Rings of `[lng, lat]` positions; the first ring is the outer boundary
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    #[serde(other)]
    Other,
}

impl FeatureCollection {
    /// Outer ring of every polygon feature, in feature order.
    pub fn outer_rings(&self) -> Vec<Vec<Location>> {
        self.features
            .iter()
            .filter_map(|feature| match &feature.geometry {
                Geometry::Polygon { coordinates } => coordinates.first(),
                Geometry::Other => None,
            })
            .map(|ring| {
                ring.iter()
                    .map(|&[lng, lat]| Location::new(lng, lat))
                    .collect()
            })
            .collect()
    }
}

/// Split `word.word.word` into its three words.
pub fn split_words(words: &str) -> Result<[&str; 3]> {
    let mut parts = words.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), Some(c)) if !a.is_empty() && !b.is_empty() && !c.is_empty() => {
            Ok([a, b, c])
        }
        _ => Err(anyhow!("{words:?} is not a word.word.word address")),
    }
}
