//! Drop complaints filed outside the boundary.

use indicatif::ProgressBar;
use tracing::info;

use super::scan::{scan, ScanSummary};
use crate::boundary::BoundaryChecker;
use crate::models::ComplaintRecord;

#[derive(Debug, Clone)]
pub struct PruneOutcome {
    pub kept: Vec<ComplaintRecord>,
    pub removed: Vec<ComplaintRecord>,
    pub summary: ScanSummary,
}

/// Split rows into kept and removed. Invalid and coordinate-less rows are
/// kept; only rows positively outside are removed.
pub fn prune(
    checker: &BoundaryChecker,
    records: &[ComplaintRecord],
    pb: &ProgressBar,
) -> PruneOutcome {
    let outcome = scan(checker, records, pb);

    let mut kept = Vec::with_capacity(records.len() - outcome.outside.len());
    let mut removed = Vec::with_capacity(outcome.outside.len());
    let mut outside = outcome.outside.iter().peekable();

    for (i, record) in records.iter().enumerate() {
        if outside.next_if(|&&o| o == i).is_some() {
            removed.push(record.clone());
        } else {
            kept.push(record.clone());
        }
    }

    info!("Removing {} of {} complaints", removed.len(), records.len());

    PruneOutcome {
        kept,
        removed,
        summary: outcome.summary,
    }
}
