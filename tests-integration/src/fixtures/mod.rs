//! Test fixtures for retention integration tests
//!
//! Fixtures build real directories of files with controlled sizes and
//! modification times.

mod log_dir;

pub use log_dir::LogDirFixture;
