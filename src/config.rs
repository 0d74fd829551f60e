//! Configuration management for the contact index.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is read if present; `dotenvy` does not write to stdout, which
//! the command server uses for responses.

use crate::error::{ConfigError, ConfigResult};
use crate::matching::DEFAULT_NAME_SLACK;
use crate::merge::MergeStrategy;
use std::env;

/// Largest accepted value for `CONTACTS_NAME_SLACK`.
pub const MAX_NAME_SLACK: usize = 16;

/// Configuration for the contact index.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level used when `RUST_LOG` is unset (default: "error")
    pub log_level: String,

    /// How merge passes treat overlapping duplicate groups (default: transitive)
    pub merge_strategy: MergeStrategy,

    /// Allowed length difference for the fuzzy name-containment rule (default: 2)
    pub name_slack: usize,

    /// Whether the command server validates fields on insert and update (default: true)
    pub validate_on_insert: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `CONTACTS_LOG_LEVEL`: Logging level (default: "error")
    /// - `CONTACTS_MERGE_STRATEGY`: `transitive` or `per_group` (default: transitive)
    /// - `CONTACTS_NAME_SLACK`: Name slack, 0-16 (default: 2)
    /// - `CONTACTS_VALIDATE_ON_INSERT`: `true` or `false` (default: true)
    pub fn from_env() -> ConfigResult<Self> {
        // Don't fail when there is no .env file
        let _ = dotenvy::dotenv();

        let log_level = env::var("CONTACTS_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        let merge_strategy = match env::var("CONTACTS_MERGE_STRATEGY") {
            Ok(val) => val
                .parse::<MergeStrategy>()
                .map_err(|reason| ConfigError::InvalidValue {
                    var: "CONTACTS_MERGE_STRATEGY".to_string(),
                    reason,
                })?,
            Err(_) => MergeStrategy::default(),
        };

        let name_slack = Self::parse_env_usize("CONTACTS_NAME_SLACK", DEFAULT_NAME_SLACK)?;
        if name_slack > MAX_NAME_SLACK {
            return Err(ConfigError::InvalidValue {
                var: "CONTACTS_NAME_SLACK".to_string(),
                reason: format!("Must be between 0 and {}", MAX_NAME_SLACK),
            });
        }

        let validate_on_insert = Self::parse_env_bool("CONTACTS_VALIDATE_ON_INSERT", true)?;

        Ok(Config {
            log_level,
            merge_strategy,
            name_slack,
            validate_on_insert,
        })
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as bool with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be true or false, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "error".to_string(),
            merge_strategy: MergeStrategy::default(),
            name_slack: DEFAULT_NAME_SLACK,
            validate_on_insert: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 4] = [
        "CONTACTS_LOG_LEVEL",
        "CONTACTS_MERGE_STRATEGY",
        "CONTACTS_NAME_SLACK",
        "CONTACTS_VALIDATE_ON_INSERT",
    ];

    // Helper to set and unset env vars for testing
    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            // Start from a clean slate even if a .env file set something
            for var in VARS {
                env::remove_var(var);
            }
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.log_level, "error");
        assert_eq!(config.merge_strategy, MergeStrategy::Transitive);
        assert_eq!(config.name_slack, 2);
        assert!(config.validate_on_insert);
    }

    #[test]
    #[serial]
    fn test_config_from_env_valid() {
        let mut guard = EnvGuard::new();
        guard.set("CONTACTS_LOG_LEVEL", "debug");
        guard.set("CONTACTS_MERGE_STRATEGY", "per_group");
        guard.set("CONTACTS_NAME_SLACK", "4");
        guard.set("CONTACTS_VALIDATE_ON_INSERT", "false");

        let result = Config::from_env();
        assert!(result.is_ok(), "Config should be valid: {:?}", result);

        let config = result.unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.merge_strategy, MergeStrategy::PerGroup);
        assert_eq!(config.name_slack, 4);
        assert!(!config.validate_on_insert);
    }

    #[test]
    #[serial]
    fn test_config_invalid_merge_strategy() {
        let mut guard = EnvGuard::new();
        guard.set("CONTACTS_MERGE_STRATEGY", "eventually");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => {
                assert_eq!(var, "CONTACTS_MERGE_STRATEGY");
            }
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_name_slack_out_of_range() {
        let mut guard = EnvGuard::new();
        guard.set("CONTACTS_NAME_SLACK", "17");

        let result = Config::from_env();
        assert!(result.is_err(), "Config should fail with name slack above the maximum");
        if let Err(ConfigError::InvalidValue { var, .. }) = result {
            assert_eq!(var, "CONTACTS_NAME_SLACK");
        }
    }

    #[test]
    #[serial]
    fn test_parse_env_usize() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_CONTACTS_USIZE", "42");

        let result = Config::parse_env_usize("TEST_CONTACTS_USIZE", 10);
        assert_eq!(result.unwrap(), 42);

        let result = Config::parse_env_usize("NONEXISTENT", 10);
        assert_eq!(result.unwrap(), 10);

        guard.set("TEST_CONTACTS_USIZE", "-3");
        assert!(Config::parse_env_usize("TEST_CONTACTS_USIZE", 10).is_err());
    }

    #[test]
    #[serial]
    fn test_parse_env_bool() {
        let mut guard = EnvGuard::new();
        guard.set("TEST_CONTACTS_BOOL", "YES");
        assert!(Config::parse_env_bool("TEST_CONTACTS_BOOL", false).unwrap());

        guard.set("TEST_CONTACTS_BOOL", "0");
        assert!(!Config::parse_env_bool("TEST_CONTACTS_BOOL", true).unwrap());

        guard.set("TEST_CONTACTS_BOOL", "maybe");
        assert!(Config::parse_env_bool("TEST_CONTACTS_BOOL", true).is_err());

        assert!(Config::parse_env_bool("NONEXISTENT", true).unwrap());
    }
}
