//! Hive turn log replayer.
//!
//! Reads a JSON turn log, replays it through the rules engine, and prints the
//! final status, board, and event stream as JSON.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod replay;

use replay::ReplayLog;

#[derive(Parser, Debug)]
#[command(name = "hive-replay")]
#[command(about = "Replay a recorded Hive game and report the result")]
struct Args {
    /// Path to the JSON turn log
    path: PathBuf,

    /// Override the turn limit stored in the log
    #[arg(long)]
    turn_limit: Option<u32>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut log = ReplayLog::load(&args.path)?;
    if let Some(turn_limit) = args.turn_limit {
        log.config.turn_limit = turn_limit;
    }

    info!(path = %args.path.display(), turns = log.turns.len(), "replaying");

    let report = replay::run(&log)?;
    let json = if args.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .context("failed to serialize report")?;

    println!("{}", json);
    Ok(())
}
