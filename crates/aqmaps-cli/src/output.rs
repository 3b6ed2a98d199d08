//! Step log and readings map writers.

use anyhow::{Context, Result};
use aqmaps_core::{FlightReport, Reading, Waypoint};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Readings below this battery level are not trusted.
pub const LOW_BATTERY: f64 = 10.0;

const BAND_WIDTH: f64 = 32.0;
const BAND_COLOURS: [&str; 8] = [
    "#00ff00", "#40ff00", "#80ff00", "#c0ff00", "#ffc000", "#ff8000", "#ff4000", "#ff0000",
];
const UNTRUSTED_COLOUR: &str = "#000000";
const UNVISITED_COLOUR: &str = "#aaaaaa";

/// Marker for a visited sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub colour: &'static str,
    pub symbol: &'static str,
}

pub fn marker_style(battery: f64, reading: Reading) -> MarkerStyle {
    match reading.value() {
        Some(value) if battery >= LOW_BATTERY => {
            let band = (value / BAND_WIDTH).floor().clamp(0.0, 7.0) as usize;
            MarkerStyle {
                colour: BAND_COLOURS[band],
                symbol: if band < 4 { "lighthouse" } else { "danger" },
            }
        }
        _ => MarkerStyle {
            colour: UNTRUSTED_COLOUR,
            symbol: "cross",
        },
    }
}

/// One line per move: `n,fromLon,fromLat,heading,toLon,toLat,label`.
///
/// `label` is the identifier of the sensor the move reached, or `null`.
/// There is no newline after the last line.
pub fn render_flight_log(report: &FlightReport) -> String {
    report
        .records
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (from, to) = (&pair[0], &pair[1]);
            format!(
                "{},{},{},{},{},{},{}",
                i + 1,
                from.location.lon,
                from.location.lat,
                to.heading.map(u16::from).unwrap_or_default(),
                to.location.lon,
                to.location.lat,
                to.waypoint.as_deref().unwrap_or("null")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn point(waypoint: &Waypoint, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [waypoint.location.lon, waypoint.location.lat]
        },
        "properties": properties
    })
}

/// GeoJSON FeatureCollection of sensor markers and the flown path.
pub fn render_readings(waypoints: &[Waypoint], report: &FlightReport) -> Value {
    let mut features = Vec::new();

    for waypoint in report.reached.iter().filter_map(|&index| waypoints.get(index)) {
        let style = marker_style(waypoint.battery, waypoint.reading);
        features.push(point(
            waypoint,
            json!({
                "location": waypoint.id,
                "rgb-string": style.colour,
                "marker-color": style.colour,
                "marker-symbol": style.symbol
            }),
        ));
    }

    for waypoint in report.unreached.iter().filter_map(|&index| waypoints.get(index)) {
        features.push(point(
            waypoint,
            json!({
                "location": waypoint.id,
                "rgb-string": UNVISITED_COLOUR,
                "marker-color": UNVISITED_COLOUR
            }),
        ));
    }

    let line: Vec<[f64; 2]> = report
        .flown_path()
        .map(|location| [location.lon, location.lat])
        .collect();
    features.push(json!({
        "type": "Feature",
        "geometry": {"type": "LineString", "coordinates": line},
        "properties": {}
    }));

    json!({"type": "FeatureCollection", "features": features})
}

/// Files written for one day.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub flight_log: PathBuf,
    pub readings: PathBuf,
}

pub fn write_outputs(
    dir: &Path,
    date: NaiveDate,
    waypoints: &[Waypoint],
    report: &FlightReport,
) -> Result<OutputPaths> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let flight_log = dir.join(date.format("flightpath-%d-%m-%Y.txt").to_string());
    fs::write(&flight_log, render_flight_log(report))
        .with_context(|| format!("Failed to write {}", flight_log.display()))?;

    let readings = dir.join(date.format("readings-%d-%m-%Y.geojson").to_string());
    let body = serde_json::to_string(&render_readings(waypoints, report))
        .context("Failed to encode readings map")?;
    fs::write(&readings, body).with_context(|| format!("Failed to write {}", readings.display()))?;

    tracing::info!(
        flight_log = %flight_log.display(),
        readings = %readings.display(),
        "wrote outputs"
    );
    Ok(OutputPaths {
        flight_log,
        readings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqmaps_core::{FlightRecord, Heading, Location};

    fn report() -> FlightReport {
        FlightReport {
            records: vec![
                FlightRecord {
                    location: Location::new(-3.1878, 55.9444),
                    heading: None,
                    waypoint: None,
                },
                FlightRecord {
                    location: Location::new(-3.1875, 55.9444),
                    heading: Heading::new(0),
                    waypoint: None,
                },
                FlightRecord {
                    location: Location::new(-3.1875, 55.9447),
                    heading: Heading::new(90),
                    waypoint: Some("a.b.c".into()),
                },
            ],
            reached: vec![1],
            unreached: vec![2],
            steps: 2,
            budget_exhausted: false,
        }
    }

    fn waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint::start(Location::new(-3.1878, 55.9444)),
            Waypoint::new("a.b.c", Location::new(-3.1875, 55.9447), 80.0, Reading::Value(140.0)),
            Waypoint::new("d.e.f", Location::new(-3.1890, 55.9430), 80.0, Reading::Value(3.0)),
        ]
    }

    #[test]
    fn marker_bands_follow_reading() {
        assert_eq!(marker_style(50.0, Reading::Value(0.0)).colour, "#00ff00");
        assert_eq!(marker_style(50.0, Reading::Value(31.9)).colour, "#00ff00");
        assert_eq!(marker_style(50.0, Reading::Value(32.0)).colour, "#40ff00");
        assert_eq!(marker_style(50.0, Reading::Value(127.9)).symbol, "lighthouse");
        assert_eq!(
            marker_style(50.0, Reading::Value(128.0)),
            MarkerStyle {
                colour: "#ffc000",
                symbol: "danger"
            }
        );
        assert_eq!(marker_style(50.0, Reading::Value(255.0)).colour, "#ff0000");
        assert_eq!(marker_style(50.0, Reading::Value(900.0)).colour, "#ff0000");
    }

    #[test]
    fn untrusted_readings_get_a_cross() {
        let cross = MarkerStyle {
            colour: "#000000",
            symbol: "cross",
        };
        assert_eq!(marker_style(9.9, Reading::Value(40.0)), cross);
        assert_eq!(marker_style(90.0, Reading::NotANumber), cross);
        assert_eq!(marker_style(90.0, Reading::Null), cross);
    }

    #[test]
    fn flight_log_has_one_line_per_move() {
        let log = render_flight_log(&report());
        let lines: Vec<&str> = log.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1,-3.1878,55.9444,0,-3.1875,55.9444,null");
        assert_eq!(lines[1], "2,-3.1875,55.9444,90,-3.1875,55.9447,a.b.c");
        assert!(!log.ends_with('\n'));
    }

    #[test]
    fn readings_map_marks_visited_and_missed_sensors() {
        let map = render_readings(&waypoints(), &report());
        let features = map["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0]["properties"]["location"], "a.b.c");
        assert_eq!(features[0]["properties"]["marker-symbol"], "danger");
        assert_eq!(features[1]["properties"]["marker-color"], "#aaaaaa");
        assert!(features[1]["properties"].get("marker-symbol").is_none());
        assert_eq!(features[2]["geometry"]["type"], "LineString");
        assert_eq!(features[2]["geometry"]["coordinates"].as_array().unwrap().len(), 3);
    }
}
