mod args;
mod caption;
mod color;
mod config;
mod error;
mod grid;
mod pdf;
mod pipeline;
mod qr;
mod source;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use config::{Config, Mode};
use log::{debug, info};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::try_from(args)?;
    debug!("{config:?}");

    let labels = source::read_labels(&config.source)?;
    info!("Read {} labels from {}", labels.len(), config.source.display());

    let report = pipeline::run(&config, &labels).context("Failed to generate labels")?;

    match &config.mode {
        Mode::Png { destination } => println!(
            "Saved {} of {} images to: {}",
            report.written.len(),
            report.written.len() + report.failures.len(),
            destination.display()
        ),
        Mode::Pdf { path } => println!("Saved to: {}", path.display()),
    }

    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.label, failure.error);
        }
        return Err(anyhow::anyhow!("{} labels failed", report.failures.len()));
    }

    Ok(())
}
