//! Plan a day's air quality collection flight.
//!
//! Usage: aqmaps DAY MONTH YEAR LATITUDE LONGITUDE SEED PORT

use anyhow::{Context, Result};
use aqmaps_cli::{write_outputs, Config};
use aqmaps_client::{DirectorySource, MapDataSource, WebServerClient};
use aqmaps_core::{Location, Mission, PlannerConfig, Waypoint, ZoneIndex};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    day: u32,
    month: u32,
    year: i32,

    /// Start latitude
    #[arg(allow_negative_numbers = true)]
    latitude: f64,

    /// Start longitude
    #[arg(allow_negative_numbers = true)]
    longitude: f64,

    /// Seed for the tour optimizer
    seed: u64,

    /// Port of the map web server
    port: u16,

    /// Read map files from this directory instead of the web server
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output directory (overrides AQMAPS_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of moves
    #[arg(long)]
    step_budget: Option<usize>,

    /// Give up on a single leg after this many search expansions
    #[arg(long)]
    max_expansions: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aqmaps_core=info".parse()?)
                .add_directive("aqmaps_cli=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    match &args.data_dir {
        Some(dir) => run(&args, &config, &DirectorySource::new(dir)),
        None => {
            let client = WebServerClient::new(&config.server_host, args.port)?;
            tracing::info!(server = client.base_url(), "using map web server");
            run(&args, &config, &client)
        }
    }
}

fn run<S: MapDataSource>(args: &Args, config: &Config, source: &S) -> Result<()> {
    let date = NaiveDate::from_ymd_opt(args.year, args.month, args.day).with_context(|| {
        format!(
            "{:02}/{:02}/{} is not a calendar date",
            args.day, args.month, args.year
        )
    })?;

    let zones = ZoneIndex::from_rings(source.no_fly_zones()?).context("Invalid no-fly zones")?;
    let mut waypoints = vec![Waypoint::start(Location::new(args.longitude, args.latitude))];
    waypoints.extend(source.waypoints(date)?);

    let mut planner = PlannerConfig::default();
    if let Some(budget) = args.step_budget {
        planner.step_budget = budget;
    }
    planner.max_expansions = args.max_expansions;

    let mission = Mission::new(planner, zones, waypoints)?;
    let report = mission.run(args.seed)?;
    tracing::info!(
        steps = report.flight.steps,
        reached = report.flight.reached.len(),
        unreached = report.flight.unreached.len(),
        budget_exhausted = report.flight.budget_exhausted,
        "flight planned"
    );

    let output_dir = args.output_dir.as_ref().unwrap_or(&config.output_dir);
    write_outputs(output_dir, date, mission.waypoints(), &report.flight)?;
    Ok(())
}
