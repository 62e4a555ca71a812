use std::path::PathBuf;
use std::str::FromStr;

use anyhow::anyhow;
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use natural_file_sort::settings::{Settings, DEFAULT_SETTINGS_PATH};

/// Sort a text file in natural order: digit leading lines first by their leading integer, then
/// all other lines, ties broken by the full line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Input file, overrides input_file_path
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file, overrides output_file_path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Staging store location, overrides store_path
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Lines per load batch, overrides batch_size
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Lines per extraction page, overrides page_size
    #[arg(short, long)]
    page_size: Option<usize>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let mut figment = Settings::figment(&cli.config);
    if let Some(input) = cli.input {
        figment = figment.merge(("input_file_path", input));
    }
    if let Some(output) = cli.output {
        figment = figment.merge(("output_file_path", output));
    }
    if let Some(store) = cli.store {
        figment = figment.merge(("store_path", store));
    }
    if let Some(batch_size) = cli.batch_size {
        figment = figment.merge(("batch_size", batch_size));
    }
    if let Some(page_size) = cli.page_size {
        figment = figment.merge(("page_size", page_size));
    }
    if let Some(log_level) = cli.log_level {
        figment = figment.merge(("log_level", log_level));
    }
    let settings = Settings::extract(figment)?;

    let level = LevelFilter::from_str(&settings.log_level)
        .map_err(|_| anyhow!("Invalid log level: {}", settings.log_level))?;
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    settings.natural_sort().sort()?;
    log::info!("Done. Result file created at: {}", settings.output_file_path.to_string_lossy());
    Ok(())
}
