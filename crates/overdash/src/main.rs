#![warn(missing_docs)]

//! Entry point for the `overdash` simulator binary.
//!
//! Spawns the overlay controller over logging host collaborators and drives
//! it from a stdin REPL. Completed-session records print to stdout as JSON;
//! everything else goes through tracing.

mod cli;
mod error;
mod host;
mod repl;

use std::{fs, process, sync::Arc};

use clap::Parser;
use overdash_engine::{Deps, OverlayConfig, OverlayController, SystemClock};
use overdash_protocol::{MsgToHost, ipc};
use overdash_surface::Size;
use permissions::{Denied, Granted, PermissionOracle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::Cli,
    error::Result,
    host::{LoggingCompositor, LoggingCue, LoggingForeground},
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and run the REPL to completion.
#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_spec = logging::compute_spec(
        cli.log.trace,
        cli.log.debug,
        cli.log.log_level.as_deref(),
        cli.log.log_filter.as_deref(),
    );
    registry()
        .with(logging::env_filter_from_spec(&log_spec))
        .with(fmt::layer().without_time())
        .try_init()
        .ok();

    let config = load_config(&cli)?;
    let oracle: Arc<dyn PermissionOracle> = if cli.deny_permission {
        Arc::new(Denied)
    } else {
        Arc::new(Granted)
    };
    let deps = Deps {
        compositor: Arc::new(LoggingCompositor::new(Size::new(
            cli.screen_width,
            cli.screen_height,
        ))),
        foreground: Arc::new(LoggingForeground),
        cues: Arc::new(LoggingCue),
        permissions: oracle,
        clock: Arc::new(SystemClock),
    };

    let (host_tx, mut host_rx) = ipc::host_channel();
    let handle = OverlayController::spawn(deps, config, host_tx);

    // Print host events as they arrive; records go to stdout as JSON.
    tokio::spawn(async move {
        while let Some(msg) = host_rx.recv().await {
            match msg {
                MsgToHost::SessionCompleted(record) => match serde_json::to_string(&record) {
                    Ok(json) => println!("{json}"),
                    Err(e) => warn!("failed to encode session record: {e}"),
                },
                MsgToHost::Elapsed { display: elapsed } => info!(display = %elapsed, "elapsed"),
                MsgToHost::Notify { kind, title, text } => {
                    info!(?kind, %title, %text, "notify");
                }
            }
        }
    });

    info!("overdash simulator ready; type commands, `quit` to exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match repl::parse(&line) {
            Ok(Some(cmd)) => {
                if !repl::apply(&handle, cmd).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(usage) => eprintln!("{usage}"),
        }
    }
    handle.stop().await?;
    Ok(())
}

/// Load the engine configuration, falling back to defaults without a file.
fn load_config(cli: &Cli) -> Result<OverlayConfig> {
    let Some(path) = &cli.config else {
        return Ok(OverlayConfig::default());
    };
    let text = fs::read_to_string(path)?;
    Ok(ron::from_str(&text)?)
}
