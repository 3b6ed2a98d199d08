//! Where the planner's inputs come from.

use crate::models::{split_words, FeatureCollection, SensorRecord, WordsDetails};
use anyhow::{Context, Result};
use aqmaps_core::{Location, Waypoint};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

pub const NO_FLY_ZONES_PATH: &str = "buildings/no-fly-zones.geojson";

/// Relative path of a day's sensor list.
pub fn sensors_path(date: NaiveDate) -> String {
    date.format("maps/%Y/%m/%d/air-quality-data.json").to_string()
}

/// Relative path of the details file for a `word.word.word` address.
pub fn words_path(words: &str) -> Result<String> {
    let [a, b, c] = split_words(words)?;
    Ok(format!("words/{a}/{b}/{c}/details.json"))
}

/// A tree of map files addressed by relative path.
///
/// Implementors only fetch raw text; decoding is shared.
pub trait MapDataSource {
    fn fetch_text(&self, path: &str) -> Result<String>;

    fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T>
    where
        Self: Sized,
    {
        let body = self.fetch_text(path)?;
        serde_json::from_str(&body).with_context(|| format!("Failed to parse {path}"))
    }

    /// Outer rings of every no-fly polygon.
    fn no_fly_zones(&self) -> Result<Vec<Vec<Location>>>
    where
        Self: Sized,
    {
        let collection: FeatureCollection = self.fetch_json(NO_FLY_ZONES_PATH)?;
        let rings = collection.outer_rings();
        tracing::debug!(zones = rings.len(), "loaded no-fly zones");
        Ok(rings)
    }

    fn sensors(&self, date: NaiveDate) -> Result<Vec<SensorRecord>>
    where
        Self: Sized,
    {
        self.fetch_json(&sensors_path(date))
    }

    fn resolve_words(&self, words: &str) -> Result<Location>
    where
        Self: Sized,
    {
        let details: WordsDetails = self.fetch_json(&words_path(words)?)?;
        Ok(details.coordinates.into())
    }

    /// The day's sensors as waypoints, each placed at its address.
    ///
    /// The start waypoint is not included.
    fn waypoints(&self, date: NaiveDate) -> Result<Vec<Waypoint>>
    where
        Self: Sized,
    {
        let records = self.sensors(date)?;
        let waypoints = records
            .into_iter()
            .map(|record| {
                let location = self
                    .resolve_words(&record.location)
                    .with_context(|| format!("Failed to resolve {}", record.location))?;
                let reading = record
                    .reading
                    .parse()
                    .with_context(|| format!("Bad reading for {}", record.location))?;
                Ok(Waypoint::new(record.location, location, record.battery, reading))
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(sensors = waypoints.len(), %date, "loaded sensors");
        Ok(waypoints)
    }
}

/// HTTP client for the map web server.
pub struct WebServerClient {
    client: Client,
    base_url: String,
}

impl WebServerClient {
    /// Client for `http://<host>:<port>/`.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: format!("http://{host}:{port}"),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl MapDataSource for WebServerClient {
    fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.url_for(path);
        tracing::debug!(%url, "fetching");
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reach {url}"))?
            .error_for_status()
            .with_context(|| format!("Server rejected {url}"))?;
        response
            .text()
            .with_context(|| format!("Failed to read body of {url}"))
    }
}

/// The web server's file layout on local disk.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MapDataSource for DirectorySource {
    fn fetch_text(&self, path: &str) -> Result<String> {
        let file = self.root.join(path);
        std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))
    }
}
