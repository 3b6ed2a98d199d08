//! Deployment settings from the environment.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Host of the map web server
    pub server_host: String,
    /// Directory the step log and readings map are written to
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_host: env::var("AQMAPS_SERVER_HOST").unwrap_or_else(|_| "localhost".to_string()),
            output_dir: env::var("AQMAPS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
