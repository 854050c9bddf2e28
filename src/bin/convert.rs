use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use univ3_indexer::config::Config;
use univ3_indexer::convert::convert;

/// Convert the accumulated CSV event log into a single JSON array of
/// normalized numeric records.
#[derive(Parser)]
#[command(name = "convert")]
struct Args {
    /// Input CSV event log (defaults to the configured pool's log)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output JSON file (defaults to the configured pool's JSON path)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let input = args.input.unwrap_or_else(|| config.events_csv_path());
    let output = args.output.unwrap_or_else(|| config.events_json_path());

    let count = convert(&input, &output)?;
    info!("Wrote {} events to {}", count, output.display());
    Ok(())
}
