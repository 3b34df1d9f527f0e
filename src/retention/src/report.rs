//! Operator-facing listing of a retention run.
//!
//! Structured diagnostics go through `tracing`; this is the plain-text report
//! written to standard output by the binary.

use crate::enforcer::EnforcementResult;
use crate::inventory::FileRecord;
use crate::selector::RetentionPlan;
use std::io::{self, Write};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Writes the run report to `out`.
///
/// `verbose` enables the inventory listing; the erase listing and summary are
/// written when either `verbose` or `dry_run` is set.
pub struct Report<W> {
    out: W,
    verbose: bool,
    dry_run: bool,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, verbose: bool, dry_run: bool) -> Self {
        Self {
            out,
            verbose,
            dry_run,
        }
    }

    /// Version line, verbose only.
    pub fn banner(&mut self, version_info: &str) -> io::Result<()> {
        if self.verbose {
            writeln!(self.out, "{version_info}")?;
        }
        Ok(())
    }

    /// Every inventoried file, most recent first.
    pub fn inventory(&mut self, plan: &RetentionPlan) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        writeln!(self.out, "Files:")?;
        for decision in plan.decisions() {
            let record = decision.record();
            writeln!(self.out, "  {}", describe(record))?;
        }
        Ok(())
    }

    /// Files selected for erasure with the running total at each one.
    pub fn erase_plan(&mut self, plan: &RetentionPlan) -> io::Result<()> {
        if !(self.verbose || self.dry_run) || plan.erase_count() == 0 {
            return Ok(());
        }
        let heading = if self.dry_run {
            "Would erase:"
        } else {
            "Erasing:"
        };
        writeln!(self.out, "{heading}")?;
        for decision in plan.erase() {
            writeln!(
                self.out,
                "  {}  {}",
                describe(decision.record()),
                decision.cumulative_bytes()
            )?;
        }
        Ok(())
    }

    /// One closing line with kept and erased totals.
    pub fn summary(&mut self, plan: &RetentionPlan, result: &EnforcementResult) -> io::Result<()> {
        if !(self.verbose || self.dry_run) {
            return Ok(());
        }
        let verb = if self.dry_run { "would erase" } else { "erased" };
        write!(
            self.out,
            "Kept {} files ({} bytes), {verb} {} files ({} bytes)",
            plan.keep_count(),
            plan.kept_bytes(),
            result.erased_count,
            result.bytes_reclaimed,
        )?;
        if result.failed_count > 0 {
            write!(self.out, ", failed to erase {} files", result.failed_count)?;
        }
        writeln!(self.out)
    }

    /// One warning line per failed removal. Always written.
    pub fn erase_failures(&mut self, program: &str, result: &EnforcementResult) -> io::Result<()> {
        for (path, reason) in &result.failed_erasures {
            writeln!(
                self.out,
                "{program}: WARNING - unable to erase {}: {reason}",
                path.display()
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn describe(record: &FileRecord) -> String {
    format!(
        "{}  {}  {}",
        record.path().display(),
        record.modified_at().format(TIMESTAMP_FORMAT),
        record.size_bytes()
    )
}
