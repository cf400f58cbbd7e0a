//! Harness configuration.
//!
//! Configuration is plain TOML. Every key is optional; missing keys take the
//! defaults shown below.
//!
//! ```toml
//! [dump]
//! default_rows = 10
//!
//! [locator]
//! include_hidden = false
//! order = "depth-first"
//!
//! [tracing]
//! log_interactions = true
//! ```
//!
//! [`HarnessConfig::from_env`] reads the file named by the
//! `LATTICE_PROBE_CONFIG` environment variable and falls back to the defaults
//! when the variable is not set.

use std::path::Path;

use lattice_probe_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "LATTICE_PROBE_CONFIG";

/// Order in which the locator visits the component tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Node, then each child subtree in order.
    #[default]
    DepthFirst,
    /// Level by level.
    BreadthFirst,
}

/// Settings for grid dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Number of rows rendered when no explicit range is given.
    pub default_rows: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self { default_rows: 10 }
    }
}

/// Settings for component lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Whether searches include hidden components unless the search says otherwise.
    pub include_hidden: bool,
    /// Traversal order.
    pub order: TraversalOrder,
}

/// Settings for interaction logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Emit a debug event for every simulated interaction.
    pub log_interactions: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_interactions: true,
        }
    }
}

/// Complete harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub dump: DumpConfig,
    pub locator: LocatorConfig,
    pub tracing: TracingConfig,
}

impl HarnessConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> HarnessResult<Self> {
        toml::from_str(s).map_err(|e| HarnessError::config("<string>", e.to_string()))
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| HarnessError::config(path, e.to_string()))?;
        let config = toml::from_str(&content).map_err(|e| HarnessError::config(path, e.to_string()))?;
        tracing::debug!(target: targets::ENVIRONMENT, path = %path.display(), "loaded harness configuration");
        Ok(config)
    }

    /// Read configuration from the file named by `LATTICE_PROBE_CONFIG`.
    ///
    /// Returns the defaults when the variable is unset or empty.
    pub fn from_env() -> HarnessResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> HarnessResult<String> {
        toml::to_string_pretty(self).map_err(|e| HarnessError::config("<string>", e.to_string()))
    }
}
