//! Search configuration with documented tunables
//!
//! All knobs that shape a single decision are collected here with
//! explanations of their purpose and how they interact.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{DEFAULT_DEADLINE_MS, DEFAULT_MAX_BRANCH, MIN_SEARCH_DEPTH};

/// Configuration for one search driver
///
/// Passed explicitly into the driver at call time. These values trade
/// decision quality against wall-clock cost per turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Hard ceiling on tree depth
    ///
    /// Depth advances twice per simulated turn (once when turn order is
    /// fixed, once when the turn ends), so a ceiling of 3-5 spans roughly
    /// 1.5-2.5 turns of lookahead. Used directly when `adaptive_depth` is
    /// off; the adaptive controller clamps into [3, 5] on its own.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum candidate actions kept per side after ordering
    ///
    /// The move orderer sorts candidates by estimated power and truncates
    /// to this width. Branching cost is roughly quadratic in this value
    /// at every turn boundary, so small changes swing search time hard.
    #[serde(default = "default_max_branch")]
    pub max_branch: usize,

    /// Wall-clock budget per decision in milliseconds
    ///
    /// Exceeding it forfeits the turn in the host environment, so the
    /// executor treats it as fatal rather than degrading to a default
    /// move.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Recompute the depth ceiling from match progress each decision
    ///
    /// When on, depth starts at 3 and grows toward 5 as units faint and
    /// the state space narrows. When off, `max_depth` is used as-is.
    #[serde(default = "default_adaptive_depth")]
    pub adaptive_depth: bool,
}

fn default_max_depth() -> u32 {
    MIN_SEARCH_DEPTH
}

fn default_max_branch() -> usize {
    DEFAULT_MAX_BRANCH
}

fn default_deadline_ms() -> u64 {
    DEFAULT_DEADLINE_MS
}

fn default_adaptive_depth() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_branch: default_max_branch(),
            deadline_ms: default_deadline_ms(),
            adaptive_depth: default_adaptive_depth(),
        }
    }
}

impl SearchConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be at least 1".into());
        }

        if self.max_branch == 0 {
            return Err("max_branch must be at least 1".into());
        }

        if self.deadline_ms == 0 {
            return Err("deadline_ms must be positive".into());
        }

        Ok(())
    }

    /// Load a config from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {:?}: {}", path, e))?;

        let config: SearchConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config TOML: {}", e))?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_branch_rejected() {
        let config = SearchConfig {
            max_branch: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let config = SearchConfig {
            deadline_ms: 0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SearchConfig = toml::from_str("max_branch = 3").unwrap();
        assert_eq!(config.max_branch, 3);
        assert_eq!(config.max_depth, MIN_SEARCH_DEPTH);
        assert!(config.adaptive_depth);
    }
}
