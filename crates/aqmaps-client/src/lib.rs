//! Map data for the planner: no-fly zones, sensor lists and word addresses,
//! fetched from the map web server or from a copy of its files on disk.

pub mod models;
pub mod source;

pub use models::{FeatureCollection, RawReading, SensorRecord, WordsDetails};
pub use source::{DirectorySource, MapDataSource, WebServerClient};
