//! Layered run configuration: defaults, `TRIMSPACE__*` environment
//! variables, then command-line values.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use retention::{LimitError, RetentionLimit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix for environment overrides, e.g. `TRIMSPACE__LIMIT=2g`.
pub const ENV_PREFIX: &str = "TRIMSPACE__";

/// Raw limit as it arrived: the environment layer hands plain numbers over
/// as integers, the command line always as text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitSetting {
    Bytes(u64),
    Text(String),
}

impl LimitSetting {
    fn parse(&self) -> Result<RetentionLimit, LimitError> {
        match self {
            LimitSetting::Bytes(bytes) => Ok(RetentionLimit::from_bytes(*bytes)),
            LimitSetting::Text(text) => RetentionLimit::parse(text),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Size limit for the kept files.
    ///
    /// Env: TRIMSPACE__LIMIT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<LimitSetting>,

    /// Allow limits below 1 MiB.
    ///
    /// Env: TRIMSPACE__FORCE
    #[serde(default)]
    pub force: bool,

    /// Report without deleting.
    ///
    /// Env: TRIMSPACE__NOOP
    #[serde(default)]
    pub noop: bool,

    /// Print the file listing.
    ///
    /// Env: TRIMSPACE__VERBOSE
    #[serde(default)]
    pub verbose: bool,
}

/// Command-line values layered on top of the environment. `None` leaves the
/// lower layer untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Validated settings for one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetentionSettings {
    pub limit: RetentionLimit,
    pub force: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Configuration {
    /// Defaults, then `TRIMSPACE__*` environment variables, then `overrides`.
    pub fn figment(overrides: &ConfigOverrides) -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides))
    }

    pub fn load(overrides: &ConfigOverrides) -> Result<Self, Box<figment::Error>> {
        let config = Self::figment(overrides).extract().map_err(Box::new)?;
        Ok(config)
    }

    /// Parse the limit and apply the minimum-size guard.
    pub fn resolve(&self) -> Result<RetentionSettings, ConfigError> {
        let limit = self
            .limit
            .as_ref()
            .ok_or(ConfigError::MissingLimit)?
            .parse()?
            .ensure_minimum(self.force)?;

        Ok(RetentionSettings {
            limit,
            force: self.force,
            dry_run: self.noop,
            verbose: self.verbose,
        })
    }
}

/// Errors raised while turning configuration into [`RetentionSettings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No limit on the command line or in the environment.
    #[error("no size limit given, use --limit <N[b|k|m|g|t]>")]
    MissingLimit,

    /// The limit failed to parse or is below the minimum.
    #[error(transparent)]
    Limit(#[from] LimitError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use retention::MINIMUM_LIMIT_BYTES;

    fn load(overrides: &ConfigOverrides) -> figment::Result<Configuration> {
        Configuration::load(overrides).map_err(|e| *e)
    }

    fn overrides(limit: Option<&str>) -> ConfigOverrides {
        ConfigOverrides {
            limit: limit.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_have_no_limit() {
        Jail::expect_with(|_jail| {
            let config = load(&ConfigOverrides::default())?;
            assert_eq!(config, Configuration::default());
            assert!(matches!(config.resolve(), Err(ConfigError::MissingLimit)));
            Ok(())
        });
    }

    #[test]
    fn test_command_line_limit() {
        Jail::expect_with(|_jail| {
            let config = load(&overrides(Some("2m")))?;
            let settings = config.resolve().unwrap();

            assert_eq!(settings.limit.bytes(), 2_097_152);
            assert!(!settings.dry_run);
            assert!(!settings.verbose);
            Ok(())
        });
    }

    #[test]
    fn test_env_var_supplies_values() {
        Jail::expect_with(|jail| {
            jail.set_env("TRIMSPACE__LIMIT", "3g");
            jail.set_env("TRIMSPACE__NOOP", "true");
            jail.set_env("TRIMSPACE__VERBOSE", "true");

            let settings = load(&ConfigOverrides::default())?
                .resolve()
                .unwrap();

            assert_eq!(settings.limit.bytes(), 3 * 1024 * 1024 * 1024);
            assert!(settings.dry_run);
            assert!(settings.verbose);
            Ok(())
        });
    }

    #[test]
    fn test_numeric_env_limit_is_bytes() {
        Jail::expect_with(|jail| {
            jail.set_env("TRIMSPACE__LIMIT", "2097152");

            let config = load(&ConfigOverrides::default())?;
            assert_eq!(config.limit, Some(LimitSetting::Bytes(2_097_152)));
            assert_eq!(config.resolve().unwrap().limit.bytes(), 2_097_152);
            Ok(())
        });
    }

    #[test]
    fn test_command_line_wins_over_env() {
        Jail::expect_with(|jail| {
            jail.set_env("TRIMSPACE__LIMIT", "3g");
            jail.set_env("TRIMSPACE__NOOP", "true");

            let config = load(&overrides(Some("5m")))?;
            let settings = config.resolve().unwrap();

            assert_eq!(settings.limit.bytes(), 5 * 1024 * 1024);
            // --noop was not passed, so the environment value stands.
            assert!(settings.dry_run);
            Ok(())
        });
    }

    #[test]
    fn test_small_limit_needs_force() {
        Jail::expect_with(|_jail| {
            let config = load(&overrides(Some("100")))?;
            assert!(matches!(
                config.resolve(),
                Err(ConfigError::Limit(LimitError::BelowMinimum { limit: 100, minimum }))
                    if minimum == MINIMUM_LIMIT_BYTES
            ));

            let forced = load(&ConfigOverrides {
                limit: Some("100".to_string()),
                force: Some(true),
                ..Default::default()
            })?;
            let settings = forced.resolve().unwrap();
            assert_eq!(settings.limit.bytes(), 100);
            assert!(settings.force);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_limit() {
        Jail::expect_with(|_jail| {
            let config = load(&overrides(Some("lots")))?;
            let err = config.resolve().unwrap_err();
            assert!(matches!(err, ConfigError::Limit(LimitError::UnknownUnit { .. })));
            assert!(err.to_string().contains("lots"));
            Ok(())
        });
    }
}
