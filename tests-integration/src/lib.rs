//! Common test utilities and helpers for integration tests

pub mod fixtures;

pub use fixtures::LogDirFixture;

/// Initialize test logging
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
