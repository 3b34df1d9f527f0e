//! Retention Enforcement
//!
//! Executes the erase half of a [`RetentionPlan`]. This is the only place
//! that mutates the filesystem, and it only runs after the plan is complete.
//!
//! ## Safety Guarantees
//!
//! - Dry-run mode logs every planned removal without touching the filesystem
//! - A failed removal is recorded and the remaining removals still run
//! - Bytes are only counted as reclaimed after a successful removal

use crate::metrics::RetentionMetrics;
use crate::selector::RetentionPlan;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Removes a single file.
pub trait FileRemover {
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`FileRemover`] backed by [`std::fs::remove_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl FileRemover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Result of executing a plan.
#[derive(Debug, Clone, Default)]
pub struct EnforcementResult {
    /// Files removed (or that would be removed, in dry-run mode).
    pub erased_count: usize,
    /// Files that could not be removed.
    pub failed_count: usize,
    /// Bytes freed by the removals above.
    pub bytes_reclaimed: u64,
    /// Paths that failed, with the error message.
    pub failed_erasures: Vec<(PathBuf, String)>,
}

impl EnforcementResult {
    pub fn is_success(&self) -> bool {
        self.failed_count == 0
    }
}

/// Applies retention decisions to the filesystem.
pub struct RetentionEnforcer<R> {
    remover: R,
    dry_run: bool,
    metrics: RetentionMetrics,
}

impl<R: FileRemover> RetentionEnforcer<R> {
    pub fn new(remover: R, dry_run: bool, metrics: RetentionMetrics) -> Self {
        Self {
            remover,
            dry_run,
            metrics,
        }
    }

    /// Remove every file the plan marks for erasure.
    ///
    /// Individual failures are collected in the result rather than
    /// returned as an error.
    pub fn enforce(&self, plan: &RetentionPlan) -> EnforcementResult {
        let mut result = EnforcementResult::default();
        let selected = plan.erase_count();
        self.metrics.record_selected(selected);

        if selected == 0 {
            info!(
                files = plan.decisions().len(),
                limit_bytes = plan.limit().bytes(),
                "Nothing to erase, inventory fits under the limit"
            );
            return result;
        }

        info!(
            candidates = selected,
            bytes_to_reclaim = plan.erase_bytes(),
            dry_run = self.dry_run,
            "Starting erasure of files over the limit"
        );

        for decision in plan.erase() {
            let record = decision.record();

            if self.dry_run {
                info!(
                    path = %record.path().display(),
                    size_bytes = record.size_bytes(),
                    cumulative_bytes = decision.cumulative_bytes(),
                    "[DRY RUN] Would erase file"
                );
                result.erased_count += 1;
                result.bytes_reclaimed =
                    result.bytes_reclaimed.saturating_add(record.size_bytes());
                self.metrics.record_erased(record.size_bytes());
                continue;
            }

            match self.remover.remove(record.path()) {
                Ok(()) => {
                    info!(
                        path = %record.path().display(),
                        size_bytes = record.size_bytes(),
                        "Erased file"
                    );
                    result.erased_count += 1;
                    result.bytes_reclaimed =
                        result.bytes_reclaimed.saturating_add(record.size_bytes());
                    self.metrics.record_erased(record.size_bytes());
                }
                Err(e) => {
                    error!(
                        path = %record.path().display(),
                        error = %e,
                        "Failed to erase file"
                    );
                    result
                        .failed_erasures
                        .push((record.path().to_path_buf(), e.to_string()));
                    self.metrics.record_erase_failure();
                }
            }
        }

        result.failed_count = result.failed_erasures.len();

        info!(
            erased = result.erased_count,
            failed = result.failed_count,
            bytes_reclaimed = result.bytes_reclaimed,
            dry_run = self.dry_run,
            "Erasure complete"
        );

        result
    }
}
