//! Debugger test harness CLI
//!
//! Inspects per-directory test configuration, discovers tests, and builds
//! test binaries for a platform.

use clap::Parser;
use harness::commands::Commands;
use harness::{cli, common::logging};

#[derive(Parser)]
#[command(name = "dbg-harness", about = "Debugger test harness utilities")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
