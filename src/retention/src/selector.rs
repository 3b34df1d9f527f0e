//! Retention selection: newest-first, hard byte ceiling.
//!
//! Records are ordered by modification time, most recent first, with ties
//! kept in input order. Walking that order, each record's size is added to a
//! running total before it is judged; a record is erased once the total
//! strictly exceeds the limit. The record that first crosses the limit is
//! erased with everything after it, so kept bytes never exceed the limit.

use crate::inventory::FileRecord;
use crate::limit::RetentionLimit;
use tracing::{debug, info};

/// The outcome for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionDecision {
    record: FileRecord,
    cumulative_bytes: u64,
    erase: bool,
}

impl RetentionDecision {
    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    /// Running total, this record included, at the point it was considered.
    pub fn cumulative_bytes(&self) -> u64 {
        self.cumulative_bytes
    }

    pub fn is_erase(&self) -> bool {
        self.erase
    }
}

/// Every decision of one run, in recency order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPlan {
    limit: RetentionLimit,
    decisions: Vec<RetentionDecision>,
}

impl RetentionPlan {
    pub fn limit(&self) -> RetentionLimit {
        self.limit
    }

    /// All decisions, most recently modified first.
    pub fn decisions(&self) -> &[RetentionDecision] {
        &self.decisions
    }

    /// Records that stay on disk.
    pub fn keep(&self) -> impl Iterator<Item = &RetentionDecision> {
        self.decisions.iter().filter(|d| !d.erase)
    }

    /// Records to delete.
    pub fn erase(&self) -> impl Iterator<Item = &RetentionDecision> {
        self.decisions.iter().filter(|d| d.erase)
    }

    pub fn keep_count(&self) -> usize {
        self.keep().count()
    }

    pub fn erase_count(&self) -> usize {
        self.erase().count()
    }

    pub fn kept_bytes(&self) -> u64 {
        self.keep().map(|d| d.record.size_bytes()).sum()
    }

    pub fn erase_bytes(&self) -> u64 {
        self.erase()
            .fold(0u64, |acc, d| acc.saturating_add(d.record.size_bytes()))
    }

    pub fn total_bytes(&self) -> u64 {
        self.decisions
            .iter()
            .fold(0u64, |acc, d| acc.saturating_add(d.record.size_bytes()))
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Partition `records` into keep and erase sets under `limit`.
pub fn select(mut records: Vec<FileRecord>, limit: RetentionLimit) -> RetentionPlan {
    // `sort_by` is stable: equal mtimes keep their input order.
    records.sort_by(|a, b| b.modified_at().cmp(&a.modified_at()));

    let mut running_total = 0u64;
    let mut overflowed = false;
    let decisions: Vec<RetentionDecision> = records
        .into_iter()
        .map(|record| {
            running_total = match running_total.checked_add(record.size_bytes()) {
                Some(total) => total,
                None => {
                    overflowed = true;
                    u64::MAX
                }
            };
            let erase = overflowed || running_total > limit.bytes();

            debug!(
                path = %record.path().display(),
                size_bytes = record.size_bytes(),
                cumulative_bytes = running_total,
                erase,
                "Retention decision"
            );

            RetentionDecision {
                record,
                cumulative_bytes: running_total,
                erase,
            }
        })
        .collect();

    let plan = RetentionPlan { limit, decisions };

    info!(
        files = plan.decisions.len(),
        kept = plan.keep_count(),
        erased = plan.erase_count(),
        limit_bytes = limit.bytes(),
        total_bytes = plan.total_bytes(),
        bytes_to_reclaim = plan.erase_bytes(),
        "Retention plan computed"
    );

    plan
}
