//! Command-line interface definitions for the overdash simulator.

use std::path::PathBuf;

use clap::Parser;
use logging::LogArgs;

/// Command-line interface for the `overdash` binary.
#[derive(Parser, Debug)]
#[command(
    name = "overdash",
    about = "Drive the Overdash overlay controller from a stdin REPL",
    version
)]
pub struct Cli {
    /// Logging controls shared across overdash binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Optional path to an engine configuration file (RON).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Simulated screen width in pixels.
    #[arg(long, default_value_t = 1080, value_name = "PX")]
    pub screen_width: i32,

    /// Simulated screen height in pixels.
    #[arg(long, default_value_t = 1920, value_name = "PX")]
    pub screen_height: i32,

    /// Simulate a missing draw-over-apps permission.
    #[arg(long)]
    pub deny_permission: bool,
}
