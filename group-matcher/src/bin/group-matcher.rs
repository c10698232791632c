use std::path::PathBuf;

use clap::Parser;
use miette::*;
use tracing_subscriber::EnvFilter;

use group_matcher::matcher;
use group_matcher::report::{done_in, SEPARATOR};

/// Splits records into groups of lines that share a value in any column.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// File with one record per line, e.g. "1";"";"3"
    input: PathBuf,
    /// Where the grouping report is written
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let summary = matcher::run(&cli.input, &cli.output)?;

    println!("{SEPARATOR}");
    println!("Number of groups: {}", summary.groups);
    println!("{}", done_in(summary.elapsed));
    Ok(())
}
