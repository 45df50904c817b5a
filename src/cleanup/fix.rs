//! Move outside complaints back into the boundary.

use indicatif::ProgressBar;
use tracing::{info, warn};

use super::scan::{scan, RecordStatus};
use crate::boundary::{CoordinateRepairer, RepairStrategy};
use crate::models::{ComplaintRecord, Coordinate};

#[derive(Debug, Clone, PartialEq)]
pub struct FixedRecord {
    pub id: String,
    pub title: String,
    pub old: Coordinate,
    pub new: Coordinate,
    pub strategy: RepairStrategy,
    pub location_text: String,
}

#[derive(Debug, Clone)]
pub struct FixOutcome {
    /// Input rows with repaired coordinates substituted
    pub records: Vec<ComplaintRecord>,
    pub fixed: Vec<FixedRecord>,
    /// Repaired rows that still fail the boundary check
    pub still_outside: usize,
}

/// Repair every valid row that lies outside. Invalid rows are left alone.
pub fn fix(
    repairer: &CoordinateRepairer,
    records: &[ComplaintRecord],
    pb: &ProgressBar,
) -> FixOutcome {
    let checker = repairer.checker();
    let outcome = scan(checker, records, pb);

    let mut corrected = records.to_vec();
    let mut fixed = Vec::with_capacity(outcome.outside.len());

    for &i in &outcome.outside {
        let RecordStatus::Outside(old) = outcome.statuses[i] else {
            continue;
        };
        let repair = repairer.repair_with_strategy(old.latitude, old.longitude);
        let record = &mut corrected[i];
        record.set_coordinate(repair.coordinate);

        fixed.push(FixedRecord {
            id: record.id.clone(),
            title: record.display_title().to_string(),
            old,
            new: repair.coordinate,
            strategy: repair.strategy,
            location_text: record.display_location().to_string(),
        });
    }

    let mut still_outside = 0;
    for f in &fixed {
        if !checker.contains(f.new) {
            warn!("Complaint {} still outside boundary after fix", f.id);
            still_outside += 1;
        }
    }

    info!(
        "Repaired {} complaints ({} still outside)",
        fixed.len(),
        still_outside
    );

    FixOutcome {
        records: corrected,
        fixed,
        still_outside,
    }
}
