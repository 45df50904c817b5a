//! Batch boundary sweeps over complaint exports.
//!
//! Scans a CSV export of the complaints table for rows outside the city
//! boundary, repairs their coordinates, or drops them.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};

use jurisdiction::boundary::{BoundaryChecker, BoundarySource, CoordinateRepairer};
use jurisdiction::cleanup;
use jurisdiction::{telemetry, Config};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Check complaint exports against the city boundary")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Boundary GeoJSON (overrides the config file)
    #[arg(long)]
    boundary: Option<PathBuf>,

    /// Directory for reports and rewritten exports
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report complaints outside the boundary or with invalid coordinates
    Scan {
        /// Complaint export CSV
        input: PathBuf,
    },
    /// Move outside complaints to a valid point inside the boundary
    Fix {
        input: PathBuf,

        /// Only write the change report
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove complaints outside the boundary
    Prune {
        input: PathBuf,

        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<ExitCode> {
    telemetry::init(Level::INFO)?;

    let args = Args::parse();
    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(path) = args.boundary {
        config.boundary.path = path;
    }

    let source = Arc::new(BoundarySource::from_path(&config.boundary.path));
    let checker = BoundaryChecker::new(Arc::clone(&source), config.boundary.fallback());

    match source.bounding_box() {
        Some(bbox) => info!(
            "Boundary bounds: lat {:.6} to {:.6}, lng {:.6} to {:.6}",
            bbox.min_lat, bbox.max_lat, bbox.min_lng, bbox.max_lng
        ),
        None => warn!("No boundary bounds available"),
    }

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let pb = progress_bar()?;
    let status = match args.command {
        Command::Scan { input } => cleanup::run_scan(&checker, &input, &args.output_dir, &pb)?,
        Command::Fix { input, dry_run } => {
            if source.bounding_box().is_none() {
                anyhow::bail!(
                    "Failed to load boundary from {}",
                    config.boundary.path.display()
                );
            }
            let repairer = CoordinateRepairer::new(checker);
            cleanup::run_fix(&repairer, &input, &args.output_dir, dry_run, &pb)?
        }
        Command::Prune { input, dry_run } => {
            cleanup::run_prune(&checker, &input, &args.output_dir, dry_run, &pb)?
        }
    };

    Ok(status.into())
}

fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
