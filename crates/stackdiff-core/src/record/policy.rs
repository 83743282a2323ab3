//! Record policies applied by the comparison batch and the queries.

use crate::diff::StructuralDiff;
use crate::record::model::DiffRecord;

/// Whether a computed diff is worth a record.
///
/// Only fully identical files are skipped. A diff of two empty files has no
/// matching path either, so it is persisted.
pub fn should_persist(diff: &StructuralDiff) -> bool {
    !diff.is_identical()
}

/// Records of the most recent run: every record sharing the maximum
/// `created_at`, in their original order.
pub fn latest_run(records: Vec<DiffRecord>) -> Vec<DiffRecord> {
    let Some(latest) = records.iter().map(|r| r.created_at).max() else {
        return Vec::new();
    };
    records
        .into_iter()
        .filter(|r| r.created_at == latest)
        .collect()
}

/// Most recent record. Ties go to the earliest in `records`.
pub fn latest_for_file(records: Vec<DiffRecord>) -> Option<DiffRecord> {
    let mut best: Option<DiffRecord> = None;
    for record in records {
        match &best {
            Some(current) if record.created_at <= current.created_at => {}
            _ => best = Some(record),
        }
    }
    best
}
