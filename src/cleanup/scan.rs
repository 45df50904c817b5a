//! Find complaints filed outside the boundary.

use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use tracing::info;

use crate::boundary::BoundaryChecker;
use crate::models::{ComplaintRecord, Coordinate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordStatus {
    /// Latitude or longitude cell is empty
    MissingCoordinates,
    Invalid(Coordinate),
    Outside(Coordinate),
    Inside(Coordinate),
}

pub fn classify_record(checker: &BoundaryChecker, record: &ComplaintRecord) -> RecordStatus {
    match record.coordinate() {
        None => RecordStatus::MissingCoordinates,
        Some(coord) if !coord.is_valid() => RecordStatus::Invalid(coord),
        Some(coord) if checker.contains(coord) => RecordStatus::Inside(coord),
        Some(coord) => RecordStatus::Outside(coord),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Rows with both coordinate cells filled
    pub total: usize,
    pub inside: usize,
    pub outside: usize,
    pub invalid: usize,
    pub missing: usize,
}

impl ScanSummary {
    pub fn is_clean(&self) -> bool {
        self.outside == 0 && self.invalid == 0
    }
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub summary: ScanSummary,
    /// Indices into the scanned slice
    pub outside: Vec<usize>,
    pub invalid: Vec<usize>,
    pub statuses: Vec<RecordStatus>,
}

/// Classify every record in parallel, preserving input order
pub fn scan(checker: &BoundaryChecker, records: &[ComplaintRecord], pb: &ProgressBar) -> ScanOutcome {
    let statuses: Vec<RecordStatus> = records
        .par_iter()
        .progress_with(pb.clone())
        .map(|r| classify_record(checker, r))
        .collect();

    let mut summary = ScanSummary::default();
    let mut outside = Vec::new();
    let mut invalid = Vec::new();

    for (i, status) in statuses.iter().enumerate() {
        match status {
            RecordStatus::MissingCoordinates => {
                summary.missing += 1;
                continue;
            }
            RecordStatus::Invalid(_) => {
                summary.invalid += 1;
                invalid.push(i);
            }
            RecordStatus::Outside(_) => {
                summary.outside += 1;
                outside.push(i);
            }
            RecordStatus::Inside(_) => summary.inside += 1,
        }
        summary.total += 1;
    }

    info!(
        "Scanned {} complaints: {} inside, {} outside, {} invalid ({} without coordinates)",
        summary.total, summary.inside, summary.outside, summary.invalid, summary.missing
    );

    ScanOutcome {
        summary,
        outside,
        invalid,
        statuses,
    }
}
