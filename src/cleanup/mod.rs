//! Batch cleanup of complaint exports against the boundary.
//!
//! Each command reads a CSV export of the complaints table, judges every row
//! with [`BoundaryChecker`](crate::boundary::BoundaryChecker) and writes CSV
//! output. Persisting changes back to the database is left to the operator.

pub mod commands;
pub mod fix;
pub mod prune;
pub mod report;
pub mod scan;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::ComplaintRecord;

pub use commands::{run_fix, run_prune, run_scan, SweepStatus};
pub use fix::{fix, FixOutcome, FixedRecord};
pub use prune::{prune, PruneOutcome};
pub use scan::{classify_record, scan, RecordStatus, ScanOutcome, ScanSummary};

/// Read every row of a complaint export
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<ComplaintRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open complaint export: {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        let record: ComplaintRecord =
            row.with_context(|| format!("Failed to parse row {} of {}", i + 1, path.display()))?;
        records.push(record);
    }
    Ok(records)
}

/// Write rows back out in export format
pub fn write_records<P: AsRef<Path>>(path: P, records: &[ComplaintRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
