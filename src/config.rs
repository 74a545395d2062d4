//! Engine configuration
//!
//! Every section falls back to its defaults for missing fields, so a config
//! file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::StringComparison;

/// Top level configuration of an [`ExpressionEngine`](crate::ExpressionEngine)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Options of the context expressions are parsed and evaluated in
    pub context: ContextOptions,
    /// Parsed expression cache
    pub cache: CacheConfig,
}

impl EngineConfig {
    /// Read a configuration from JSON text
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }
}

/// Case sensitivity of names and string comparisons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Match function names, keywords and word operators regardless of case
    pub ignore_case_for_parsing: bool,
    /// Compare strings case-insensitively in equality, ordering and `In`
    pub ignore_case_for_equality: bool,
}

impl ContextOptions {
    pub fn string_comparison(&self) -> StringComparison {
        if self.ignore_case_for_equality {
            StringComparison::IgnoreCase
        } else {
            StringComparison::Ordinal
        }
    }
}

/// Configuration of the parsed expression cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether parsed expressions are cached at all
    pub enabled: bool,
    /// Maximum number of cached expressions
    pub capacity: usize,
}

impl CacheConfig {
    pub fn new(enabled: bool, capacity: usize) -> Self {
        Self { enabled, capacity }
    }

    /// Large cache for long-running hosts with many templates
    pub fn high_performance() -> Self {
        Self {
            enabled: true,
            capacity: 10_000,
        }
    }

    pub fn low_memory() -> Self {
        Self {
            enabled: true,
            capacity: 64,
        }
    }

    /// Parse on every call
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            capacity: 0,
        }
    }

    /// Small cache that makes eviction easy to observe
    pub fn testing() -> Self {
        Self {
            enabled: true,
            capacity: 4,
        }
    }

    /// Whether the configuration results in a usable cache
    pub fn is_active(&self) -> bool {
        self.enabled && self.capacity > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_presets() {
        let config = CacheConfig::default();
        assert!(config.is_active());
        assert_eq!(config.capacity, 1_000);

        assert_eq!(CacheConfig::high_performance().capacity, 10_000);
        assert_eq!(CacheConfig::low_memory().capacity, 64);
        assert!(!CacheConfig::disabled().is_active());
        assert!(!CacheConfig::new(true, 0).is_active());
        assert_eq!(CacheConfig::testing(), CacheConfig::new(true, 4));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "context": { "ignore_case_for_equality": true } }"#)
                .unwrap();
        assert!(config.context.ignore_case_for_equality);
        assert!(!config.context.ignore_case_for_parsing);
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(
            config.context.string_comparison(),
            StringComparison::IgnoreCase
        );
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(
            EngineConfig::from_json_str("{}").unwrap(),
            EngineConfig::default()
        );
        assert!(EngineConfig::from_json_str("{ \"cache\": 3 }").is_err());
    }
}
