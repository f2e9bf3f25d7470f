//! Configuration module.
//!
//! Loads configuration from environment variables.

use std::env;

use crate::cache::CacheKind;
use crate::error::{CacheError, Result};

/// Variable listing the cache kinds to construct.
pub const KINDS_VAR: &str = "MEMOCACHE_KINDS";

/// Variable toggling debug logging inside the stores.
pub const LOGGING_VAR: &str = "MEMOCACHE_LOGGING";

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Kinds whose stores are built at startup.
    /// Kinds without a store in this crate are accepted and skipped.
    pub kinds: Vec<CacheKind>,

    /// Emit debug lines on store writes and turn clears.
    pub logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kinds: vec![CacheKind::Zone, CacheKind::Memory],
            logging: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::var(KINDS_VAR).ok(), env::var(LOGGING_VAR).ok())
    }

    /// Build configuration from raw variable values.
    pub fn from_vars(kinds: Option<String>, logging: Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(kinds) = kinds {
            config.kinds = parse_kinds(&kinds)?;
        }

        if let Some(logging) = logging {
            config.logging = parse_flag(LOGGING_VAR, &logging)?;
        }

        Ok(config)
    }

    /// Set the kinds to construct (builder pattern).
    #[must_use]
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = CacheKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Enable or disable store logging.
    #[must_use]
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Whether `kind` is enabled.
    pub fn is_enabled(&self, kind: CacheKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Parse a comma-separated kind list, dropping blanks and duplicates.
fn parse_kinds(raw: &str) -> Result<Vec<CacheKind>> {
    let mut kinds = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: CacheKind = name.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

fn parse_flag(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(CacheError::Config(format!("{}={} is not a boolean", var, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(None, None).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.is_enabled(CacheKind::Zone));
        assert!(config.is_enabled(CacheKind::Memory));
        assert!(!config.logging);
    }

    #[test]
    fn test_parse_kinds() {
        let config = Config::from_vars(Some("memory, ,session,memory".into()), None).unwrap();
        assert_eq!(config.kinds, vec![CacheKind::Memory, CacheKind::Session]);
    }

    #[test]
    fn test_unknown_kind() {
        let err = Config::from_vars(Some("zone,redis".into()), None).unwrap_err();
        assert_eq!(err, CacheError::UnknownKind("redis".to_string()));
    }

    #[test]
    fn test_logging_flag() {
        assert!(Config::from_vars(None, Some("TRUE".into())).unwrap().logging);
        assert!(!Config::from_vars(None, Some("0".into())).unwrap().logging);
        assert!(matches!(
            Config::from_vars(None, Some("maybe".into())),
            Err(CacheError::Config(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = Config::default().kinds([CacheKind::Zone]).logging(true);
        assert_eq!(config.kinds, vec![CacheKind::Zone]);
        assert!(config.logging);
    }
}
