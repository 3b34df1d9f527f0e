//! Retention run metrics
//!
//! Cloneable counters shared between the stages of a run and read back for
//! the closing summary.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::{info, warn};

/// Counters for one retention run
#[derive(Debug, Clone)]
pub struct RetentionMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Files accepted into the inventory
    files_inventoried: AtomicUsize,
    /// Bytes across the inventory
    bytes_inventoried: AtomicU64,
    /// Files the selector marked for erasure
    files_selected: AtomicUsize,
    /// Files actually removed (or that would be, in dry-run mode)
    files_erased: AtomicUsize,
    /// Removals that failed
    erase_failures: AtomicUsize,
    /// Bytes freed by successful removals
    bytes_reclaimed: AtomicU64,
}

impl Default for RetentionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RetentionMetrics {
    /// Create a new metrics tracker
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                files_inventoried: AtomicUsize::new(0),
                bytes_inventoried: AtomicU64::new(0),
                files_selected: AtomicUsize::new(0),
                files_erased: AtomicUsize::new(0),
                erase_failures: AtomicUsize::new(0),
                bytes_reclaimed: AtomicU64::new(0),
            }),
        }
    }

    /// Record one inventoried file
    pub fn record_inventoried(&self, size_bytes: u64) {
        self.inner.files_inventoried.fetch_add(1, Ordering::Relaxed);
        self.inner
            .bytes_inventoried
            .fetch_add(size_bytes, Ordering::Relaxed);
    }

    /// Record files selected for erasure
    pub fn record_selected(&self, count: usize) {
        self.inner.files_selected.fetch_add(count, Ordering::Relaxed);
    }

    /// Record one erased file
    pub fn record_erased(&self, size_bytes: u64) {
        self.inner.files_erased.fetch_add(1, Ordering::Relaxed);
        self.inner
            .bytes_reclaimed
            .fetch_add(size_bytes, Ordering::Relaxed);
    }

    /// Record one failed erasure
    pub fn record_erase_failure(&self) {
        self.inner.erase_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn files_inventoried(&self) -> usize {
        self.inner.files_inventoried.load(Ordering::Relaxed)
    }

    pub fn bytes_inventoried(&self) -> u64 {
        self.inner.bytes_inventoried.load(Ordering::Relaxed)
    }

    pub fn files_selected(&self) -> usize {
        self.inner.files_selected.load(Ordering::Relaxed)
    }

    pub fn files_erased(&self) -> usize {
        self.inner.files_erased.load(Ordering::Relaxed)
    }

    pub fn erase_failures(&self) -> usize {
        self.inner.erase_failures.load(Ordering::Relaxed)
    }

    pub fn bytes_reclaimed(&self) -> u64 {
        self.inner.bytes_reclaimed.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            files_inventoried: self.files_inventoried(),
            bytes_inventoried: self.bytes_inventoried(),
            files_selected: self.files_selected(),
            files_erased: self.files_erased(),
            erase_failures: self.erase_failures(),
            bytes_reclaimed: self.bytes_reclaimed(),
        }
    }
}

/// Point-in-time copy of [`RetentionMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSummary {
    pub files_inventoried: usize,
    pub bytes_inventoried: u64,
    pub files_selected: usize,
    pub files_erased: usize,
    pub erase_failures: usize,
    pub bytes_reclaimed: u64,
}

impl MetricsSummary {
    /// Log the summary
    pub fn log(&self) {
        info!(
            files_inventoried = self.files_inventoried,
            bytes_inventoried = self.bytes_inventoried,
            files_selected = self.files_selected,
            files_erased = self.files_erased,
            bytes_reclaimed = self.bytes_reclaimed,
            "Retention run summary"
        );
        if self.erase_failures > 0 {
            warn!(
                erase_failures = self.erase_failures,
                "Some files could not be erased"
            );
        }
    }
}
