//! Size-capped retention for rotated log files.
//!
//! The crate is split along the two stages of a run:
//!
//! - Deciding: [`inventory`] turns paths into frozen [`FileRecord`]s and
//!   [`selector`] partitions them into keep/erase against a [`RetentionLimit`].
//! - Acting: [`enforcer`] executes the erase half of a [`RetentionPlan`]
//!   (or only logs it in dry-run mode), [`metrics`] counts what happened and
//!   [`report`] renders the operator listing.
//!
//! Nothing is deleted until a complete plan exists.
//!
//! ## Usage
//!
//! ```no_run
//! use retention::{FsRemover, RetentionEnforcer, RetentionLimit, RetentionMetrics};
//!
//! let limit = RetentionLimit::parse("512m")?.ensure_minimum(false)?;
//! let records = retention::build_inventory(["/var/log/app.log.1", "/var/log/app.log.2"])?;
//! let plan = retention::select(records, limit);
//!
//! let enforcer = RetentionEnforcer::new(FsRemover, true, RetentionMetrics::new());
//! let result = enforcer.enforce(&plan);
//! println!("would reclaim {} bytes", result.bytes_reclaimed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod enforcer;
pub mod inventory;
pub mod limit;
pub mod metrics;
pub mod report;
pub mod selector;

// Re-export commonly used types
pub use enforcer::{EnforcementResult, FileRemover, FsRemover, RetentionEnforcer};
pub use inventory::{FileRecord, InventoryError, build_inventory};
pub use limit::{LimitError, MINIMUM_LIMIT_BYTES, RetentionLimit};
pub use metrics::{MetricsSummary, RetentionMetrics};
pub use report::Report;
pub use selector::{RetentionDecision, RetentionPlan, select};
