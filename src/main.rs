//! Binary entrypoint for flash-advisor.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use flash_advisor::config::Configuration;
use flash_advisor::{reference, solver};

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "flash-advisor", about = "Guide-number flash exposure advisor")]
struct Cli {
    /// Path to YAML config file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Target subject distance in meters
    #[arg(short, long, value_name = "METERS")]
    distance: f64,

    /// ISO to shoot at (digital mode only; analog always uses fixed-iso)
    #[arg(long, value_name = "ISO")]
    iso: Option<u32>,

    /// Also print the power reference table
    #[arg(long)]
    reference: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("flash_advisor={}", level).parse().unwrap());
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // Use the library crate only.
    let cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    let cfg = cfg.validated().context("validating configuration")?;

    let iso = cfg.effective_iso(cli.iso);
    let solutions = solver::find_viable_solutions(cli.distance, &cfg, iso)?;
    info!(count = solutions.len(), iso, "solved flash exposure");

    println!(
        "Target {:.2} m at ISO {} (guide number {}):",
        cli.distance, iso, cfg.guide_number
    );
    if solutions.is_empty() {
        println!("  no viable solution");
    }
    for (rank, s) in solutions.iter().enumerate() {
        println!(
            "  {}. power {:>5} at f/{:<4} reaches {:.2} m (off by {:.2} m, wanted f/{:.1})",
            rank + 1,
            s.power,
            s.aperture,
            s.actual_distance,
            s.distance_error,
            s.required_aperture,
        );
    }

    if cli.reference {
        print_reference(&cfg, iso)?;
    }
    Ok(())
}

fn print_reference(cfg: &Configuration, iso: u32) -> Result<()> {
    let grid = reference::build_grid(cfg, iso)?;
    println!("\nPower reference at ISO {}:", iso);
    if grid.iter().all(|row| row.cells.is_empty()) {
        println!("  no reference distances within the configured window");
        return Ok(());
    }
    for row in &grid {
        print!("  f/{:<4}", row.aperture);
        for cell in &row.cells {
            let powers = if cell.powers.is_empty() {
                "-".to_string()
            } else {
                cell.powers
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            print!("  {:>4}m: {:<6}", cell.distance, powers);
        }
        println!();
    }
    Ok(())
}
