//! Configuration for expense settlement

use crate::money::{DEFAULT_SCALE, MAX_SCALE};
use crate::split::RemainderPolicy;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};

/// Settlement configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Decimal places of the currency's minor unit (2 = cents)
    pub minor_unit_scale: u32,

    /// Split configuration
    pub split: SplitConfig,

    /// Output configuration
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minor_unit_scale: DEFAULT_SCALE,
            split: SplitConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Split configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Who absorbs leftover minor units of an equal or weighted split
    pub remainder_policy: RemainderPolicy,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty print JSON
    pub pretty_print: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from `SETTLEMENT_*` variables resolved through `lookup`
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let mut config = Config::default();

        if let Some(scale) = lookup("SETTLEMENT_MINOR_UNIT_SCALE") {
            config.minor_unit_scale = scale.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SETTLEMENT_MINOR_UNIT_SCALE: {}", e))
            })?;
        }

        if let Some(policy) = lookup("SETTLEMENT_REMAINDER_POLICY") {
            let de: StrDeserializer<'_, ValueError> = policy.as_str().into_deserializer();
            config.split.remainder_policy = RemainderPolicy::deserialize(de).map_err(|e| {
                crate::Error::Config(format!("Invalid SETTLEMENT_REMAINDER_POLICY: {}", e))
            })?;
        }

        if let Some(pretty) = lookup("SETTLEMENT_PRETTY_PRINT") {
            config.output.pretty_print = pretty.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SETTLEMENT_PRETTY_PRINT: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.minor_unit_scale > MAX_SCALE {
            return Err(crate::Error::Config(format!(
                "minor_unit_scale {} exceeds maximum {}",
                self.minor_unit_scale, MAX_SCALE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.minor_unit_scale, 2);
        assert_eq!(config.split.remainder_policy, RemainderPolicy::FirstInRoster);
        assert!(config.output.pretty_print);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
minor_unit_scale = 0

[split]
remainder_policy = "last_in_roster"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.minor_unit_scale, 0);
        assert_eq!(config.split.remainder_policy, RemainderPolicy::LastInRoster);
        // Missing sections fall back to defaults
        assert!(config.output.pretty_print);
    }

    #[test]
    fn test_from_file_rejects_bad_scale() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "minor_unit_scale = 12").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "minor_unit_scale = \"two\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_parses_all_variables() {
        let config = Config::from_lookup(lookup(&[
            ("SETTLEMENT_MINOR_UNIT_SCALE", "0"),
            ("SETTLEMENT_REMAINDER_POLICY", "last_in_roster"),
            ("SETTLEMENT_PRETTY_PRINT", "false"),
        ]))
        .unwrap();

        assert_eq!(config.minor_unit_scale, 0);
        assert_eq!(config.split.remainder_policy, RemainderPolicy::LastInRoster);
        assert!(!config.output.pretty_print);
    }

    #[test]
    fn test_from_lookup_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_lookup_remainder_policy_matches_serde_names() {
        for policy in [RemainderPolicy::FirstInRoster, RemainderPolicy::LastInRoster] {
            let name = serde_json::to_value(policy).unwrap();
            let name = name.as_str().unwrap().to_string();

            let config =
                Config::from_lookup(lookup(&[("SETTLEMENT_REMAINDER_POLICY", name.as_str())]))
                    .unwrap();
            assert_eq!(config.split.remainder_policy, policy);
        }
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let bad = [
            ("SETTLEMENT_REMAINDER_POLICY", "middle_of_roster"),
            ("SETTLEMENT_MINOR_UNIT_SCALE", "two"),
            ("SETTLEMENT_MINOR_UNIT_SCALE", "10"),
            ("SETTLEMENT_PRETTY_PRINT", "maybe"),
        ];

        for var in bad {
            let err = Config::from_lookup(lookup(&[var])).unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)), "{:?} accepted", var);
        }
    }

    #[test]
    fn test_from_env() {
        // Only test in this crate that touches SETTLEMENT_* variables
        std::env::set_var("SETTLEMENT_MINOR_UNIT_SCALE", "3");
        std::env::set_var("SETTLEMENT_REMAINDER_POLICY", "last_in_roster");
        std::env::set_var("SETTLEMENT_PRETTY_PRINT", "false");

        let config = Config::from_env();

        std::env::remove_var("SETTLEMENT_MINOR_UNIT_SCALE");
        std::env::remove_var("SETTLEMENT_REMAINDER_POLICY");
        std::env::remove_var("SETTLEMENT_PRETTY_PRINT");

        let config = config.unwrap();
        assert_eq!(config.minor_unit_scale, 3);
        assert_eq!(config.split.remainder_policy, RemainderPolicy::LastInRoster);
        assert!(!config.output.pretty_print);
    }

    #[test]
    fn test_validate_rejects_large_scale() {
        let config = Config {
            minor_unit_scale: MAX_SCALE + 1,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/settlement.toml").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
