use std::fs::File;

use anyhow::{Context, Result};
use teller_ledger::{
    bin_utils::{Service, summary_line},
    processor::ProcessingResult,
};
use tracing::level_filters::LevelFilter;

fn main() -> Result<()> {
    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let log_level = match std::env::args().nth(2) {
        Some(level) => parse_log_level(&level)?,
        None => LevelFilter::WARN,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .init();

    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        summary_printer: Box::new(|result: &ProcessingResult| {
            eprintln!("{}", summary_line(result))
        }),
    };
    service.run()
}

fn parse_log_level(level: &str) -> Result<LevelFilter> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        other => anyhow::bail!("Unknown log level `{other}`, expected error|warn|info|debug|trace"),
    }
}
