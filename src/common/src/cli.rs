use crate::config::ConfigOverrides;
use clap::Parser;

/// Name used in report and error lines.
pub const PROGRAM_NAME: &str = "trimspace";

/// Delete the oldest files until the rest fit under a size limit
#[derive(Parser, Debug, Clone, Default)]
#[command(name = PROGRAM_NAME, version, about, long_about = None)]
pub struct Cli {
    /// File patterns to manage. Paths are read from standard input, one per
    /// line, when no pattern is given
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Size limit for the kept files, with an optional b, k, m, g or t suffix
    #[arg(long, visible_alias = "size", value_name = "N[b|k|m|g|t]")]
    pub limit: Option<String>,

    /// Allow limits below 1 MiB
    #[arg(long)]
    pub force: bool,

    /// Report what would be erased without deleting anything
    #[arg(short = 'n', long)]
    pub noop: bool,

    /// List discovered files and the erase set with running totals
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Values given on the command line, for layering over the environment.
    ///
    /// Flags that were not passed stay unset so they cannot switch off a
    /// value enabled through the environment.
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            limit: self.limit.clone(),
            force: self.force.then_some(true),
            noop: self.noop.then_some(true),
            verbose: self.verbose.then_some(true),
        }
    }
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::{Configuration, RetentionSettings};
    use anyhow::{Context, Result};
    use std::io::IsTerminal;
    use tracing_subscriber::EnvFilter;

    /// Initialize logging on standard error.
    ///
    /// `RUST_LOG` takes precedence over the flags.
    pub fn init_logging(verbose: bool, quiet: bool) {
        let level = if quiet {
            "error"
        } else if verbose {
            "info"
        } else {
            "warn"
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .try_init();
    }

    /// Merge environment and command line, then validate the result.
    pub fn load_settings(cli: &Cli) -> Result<RetentionSettings> {
        let config = Configuration::load(&cli.config_overrides())
            .context("Failed to load configuration")?;
        let settings = config.resolve()?;
        Ok(settings)
    }

    /// Standard version information
    pub fn version_info() -> String {
        format!("{PROGRAM_NAME} v{}", env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "trimspace",
            "--limit",
            "2m",
            "--force",
            "-n",
            "-v",
            "/var/log/app/*.log",
            "/var/log/app/*.gz",
        ])
        .unwrap();

        assert_eq!(cli.limit.as_deref(), Some("2m"));
        assert!(cli.force);
        assert!(cli.noop);
        assert!(cli.verbose);
        assert_eq!(cli.patterns, vec!["/var/log/app/*.log", "/var/log/app/*.gz"]);
    }

    #[test]
    fn test_size_is_an_alias_for_limit() {
        let cli = Cli::try_parse_from(["trimspace", "--size", "10g"]).unwrap();
        assert_eq!(cli.limit.as_deref(), Some("10g"));
        assert!(cli.patterns.is_empty());
    }

    #[test]
    fn test_long_flag_names() {
        let cli = Cli::try_parse_from(["trimspace", "--noop", "--verbose", "--limit=1m"]).unwrap();
        assert!(cli.noop);
        assert!(cli.verbose);
        assert_eq!(cli.limit.as_deref(), Some("1m"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["trimspace", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_unset_flags_do_not_override() {
        let cli = Cli::try_parse_from(["trimspace", "--noop"]).unwrap();
        let overrides = cli.config_overrides();

        assert_eq!(overrides.limit, None);
        assert_eq!(overrides.force, None);
        assert_eq!(overrides.noop, Some(true));
        assert_eq!(overrides.verbose, None);
    }

    #[test]
    fn test_version_info() {
        let version = utils::version_info();
        assert!(version.starts_with("trimspace v"));
        assert!(version.contains(env!("CARGO_PKG_VERSION")));
    }
}
