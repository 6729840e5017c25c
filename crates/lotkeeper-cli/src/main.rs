//! Lotkeeper - parking lot occupancy and billing
//!
//! Tracks which slots are taken, bills vehicles by the hour on exit and keeps
//! the lot's state between runs.

mod cli;
mod commands;
mod menu;
mod output;

use clap::Parser;
use cli::Cli;
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
