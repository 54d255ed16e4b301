use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

mod cli;
mod commands;

const LOG_FILE: &str = "parasect.log";

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.debug)?;
    commands::run_command(cli)
}

/// `--debug` sends everything to a fresh log file; otherwise INFO and above
/// go to stderr.
fn init_logging(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = File::create(LOG_FILE).with_context(|| format!("cannot create {LOG_FILE}"))?;
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}
