//! The `sweep` subcommands: read an export, judge it, write reports.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use indicatif::ProgressBar;
use tracing::{info, warn};

use super::scan::RecordStatus;
use super::{read_records, report, write_records};
use crate::boundary::{BoundaryChecker, CoordinateRepairer};

pub const OUTSIDE_REPORT: &str = "complaints-outside-boundary.csv";
pub const FIX_REPORT: &str = "complaints-fixed-coordinates.csv";
pub const FIXED_EXPORT: &str = "complaints-fixed.csv";
pub const KEPT_EXPORT: &str = "complaints-within-boundary.csv";
pub const REMOVED_EXPORT: &str = "complaints-removed.csv";

/// Outcome of a sweep, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    Clean,
    /// Rows remain outside the boundary or have invalid coordinates
    Dirty,
}

impl From<SweepStatus> for ExitCode {
    fn from(status: SweepStatus) -> Self {
        match status {
            SweepStatus::Clean => ExitCode::SUCCESS,
            SweepStatus::Dirty => ExitCode::FAILURE,
        }
    }
}

/// Log invalid and outside rows, write the outside report.
///
/// Dirty when any row is outside or invalid.
pub fn run_scan(
    checker: &BoundaryChecker,
    input: &Path,
    output_dir: &Path,
    pb: &ProgressBar,
) -> Result<SweepStatus> {
    let records = read_records(input)?;
    info!("Loaded {} complaints from {}", records.len(), input.display());

    pb.set_length(records.len() as u64);
    let outcome = super::scan(checker, &records, pb);
    pb.finish_and_clear();

    for &i in &outcome.invalid {
        let record = &records[i];
        warn!(
            "Invalid coordinates for {} ({}): ({}, {})",
            record.id,
            record.display_title(),
            record.latitude.as_deref().unwrap_or(""),
            record.longitude.as_deref().unwrap_or("")
        );
    }

    let outside: Vec<_> = outcome
        .outside
        .iter()
        .filter_map(|&i| match outcome.statuses[i] {
            RecordStatus::Outside(coord) => Some((&records[i], coord)),
            _ => None,
        })
        .collect();

    for (record, coord) in &outside {
        info!(
            "Outside: {} ({}) at {} - {}",
            record.id,
            record.display_title(),
            coord,
            report::google_maps_link(*coord)
        );
    }

    if !outside.is_empty() {
        let path = output_dir.join(OUTSIDE_REPORT);
        report::write_outside_report(&path, &outside)?;
        info!("Report saved to {}", path.display());
    } else {
        info!("All complaints are within the boundary");
    }

    Ok(if outcome.summary.is_clean() {
        SweepStatus::Clean
    } else {
        SweepStatus::Dirty
    })
}

/// Repair outside rows. The change report is always written; the corrected
/// export only when `dry_run` is false.
///
/// Dirty when a repaired row still fails the boundary check.
pub fn run_fix(
    repairer: &CoordinateRepairer,
    input: &Path,
    output_dir: &Path,
    dry_run: bool,
    pb: &ProgressBar,
) -> Result<SweepStatus> {
    let records = read_records(input)?;
    info!("Loaded {} complaints from {}", records.len(), input.display());

    pb.set_length(records.len() as u64);
    let outcome = super::fix(repairer, &records, pb);
    pb.finish_and_clear();

    if outcome.fixed.is_empty() {
        info!("All complaints are within the boundary");
        return Ok(SweepStatus::Clean);
    }

    for f in outcome.fixed.iter().take(10) {
        info!("{} ({}): {} -> {} [{}]", f.id, f.title, f.old, f.new, f.strategy);
    }
    if outcome.fixed.len() > 10 {
        info!("... and {} more", outcome.fixed.len() - 10);
    }

    let report_path = output_dir.join(FIX_REPORT);
    report::write_fix_report(&report_path, &outcome.fixed)?;
    info!("Report saved to {}", report_path.display());

    if dry_run {
        info!("Dry run, export not rewritten");
    } else {
        let path = output_dir.join(FIXED_EXPORT);
        write_records(&path, &outcome.records)?;
        info!("Corrected export written to {}", path.display());
    }

    Ok(if outcome.still_outside == 0 {
        SweepStatus::Clean
    } else {
        SweepStatus::Dirty
    })
}

/// Write kept and removed rows to separate exports; nothing on `dry_run`
pub fn run_prune(
    checker: &BoundaryChecker,
    input: &Path,
    output_dir: &Path,
    dry_run: bool,
    pb: &ProgressBar,
) -> Result<SweepStatus> {
    let records = read_records(input)?;
    info!("Loaded {} complaints from {}", records.len(), input.display());

    pb.set_length(records.len() as u64);
    let outcome = super::prune(checker, &records, pb);
    pb.finish_and_clear();

    for record in &outcome.removed {
        info!("Removing {} ({})", record.id, record.display_title());
    }

    if dry_run {
        info!("Dry run, {} complaints would be removed", outcome.removed.len());
        return Ok(SweepStatus::Clean);
    }

    let kept_path = output_dir.join(KEPT_EXPORT);
    write_records(&kept_path, &outcome.kept)?;
    let removed_path = output_dir.join(REMOVED_EXPORT);
    write_records(&removed_path, &outcome.removed)?;
    info!(
        "Kept {} complaints in {}, removed {} to {}",
        outcome.kept.len(),
        kept_path.display(),
        outcome.removed.len(),
        removed_path.display()
    );

    Ok(SweepStatus::Clean)
}
