//! Enforcement against the real filesystem
//!
//! Covers what happens when the filesystem changes between inventory and
//! deletion, and checks the metrics reported at the end of a run.

use anyhow::Result;
use common::sources;
use retention::{FsRemover, Report, RetentionEnforcer, RetentionLimit, RetentionMetrics};
use std::io::Cursor;
use tests_integration::{LogDirFixture, init_test_logging};

const KB: u64 = 1024;

#[test]
fn test_vanished_file_is_reported_and_others_still_erased() -> Result<()> {
    init_test_logging();
    let fixture = LogDirFixture::new()?;
    fixture.create("a.log", 600 * KB, 0)?;
    fixture.create("b.log", 600 * KB, 60)?;
    fixture.create("c.log", 600 * KB, 120)?;

    let paths = sources::collect(&[fixture.pattern("*.log")], Cursor::new(""))?;
    let records = retention::build_inventory(&paths)?;
    let plan = retention::select(records, RetentionLimit::parse("1m")?);

    // Removed by someone else after the plan was made.
    std::fs::remove_file(fixture.path().join("b.log"))?;

    let metrics = RetentionMetrics::new();
    let enforcer = RetentionEnforcer::new(FsRemover, false, metrics.clone());
    let result = enforcer.enforce(&plan);

    assert!(!result.is_success());
    assert_eq!(result.erased_count, 1);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.failed_erasures[0].0, fixture.path().join("b.log"));
    assert_eq!(result.bytes_reclaimed, 600 * KB);
    assert_eq!(fixture.remaining()?, vec!["a.log"]);

    let summary = metrics.summary();
    assert_eq!(summary.files_selected, 2);
    assert_eq!(summary.files_erased, 1);
    assert_eq!(summary.erase_failures, 1);

    let mut report = Report::new(Vec::new(), false, false);
    report.erase_failures("trimspace", &result)?;
    let output = String::from_utf8(report.into_inner())?;
    assert!(output.starts_with("trimspace: WARNING - unable to erase "));
    assert!(output.contains("b.log"));
    Ok(())
}

#[test]
fn test_stdin_file_list_drives_deletion() -> Result<()> {
    init_test_logging();
    let fixture = LogDirFixture::new()?;
    let newest = fixture.create("newest.log", 800 * KB, 0)?;
    let older = fixture.create("older.log", 800 * KB, 60)?;
    fixture.create("unlisted.log", 800 * KB, 120)?;

    let list = format!("{}\n\n  {}  \n", newest.display(), older.display());
    let paths = sources::collect::<String, _>(&[], Cursor::new(list))?;
    let records = retention::build_inventory(&paths)?;
    let plan = retention::select(records, RetentionLimit::parse("1m")?);

    let metrics = RetentionMetrics::new();
    let result = RetentionEnforcer::new(FsRemover, false, metrics.clone()).enforce(&plan);

    assert!(result.is_success());
    assert_eq!(fixture.remaining()?, vec!["newest.log", "unlisted.log"]);
    assert_eq!(metrics.files_erased(), 1);
    Ok(())
}

#[test]
fn test_second_pass_is_a_no_op() -> Result<()> {
    init_test_logging();
    let fixture = LogDirFixture::new()?;
    fixture.create("a.log", 600 * KB, 0)?;
    fixture.create("b.log", 600 * KB, 60)?;

    let limit = RetentionLimit::parse("1m")?;
    for _ in 0..2 {
        let paths = sources::collect(&[fixture.pattern("*.log")], Cursor::new(""))?;
        let plan = retention::select(retention::build_inventory(&paths)?, limit);
        let enforcer = RetentionEnforcer::new(FsRemover, false, RetentionMetrics::new());
        let result = enforcer.enforce(&plan);
        assert!(result.is_success());
    }

    assert_eq!(fixture.remaining()?, vec!["a.log"]);
    Ok(())
}
