//! Shared plumbing for the trimspace binary: command-line surface, layered
//! configuration and the file-list sources that feed the inventory.

pub mod cli;
pub mod config;
pub mod sources;

pub use cli::{Cli, PROGRAM_NAME};
pub use config::{ConfigError, ConfigOverrides, Configuration, RetentionSettings};
pub use sources::SourceError;
