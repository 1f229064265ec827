//! Engine settings loaded from TOML
//!
//! ```toml
//! [exploration]
//! beam_width = 3
//! max_depth = 5
//! max_llm_calls = 20
//! n_executions = 1000
//! sigma = 0.1
//! seed = 42
//!
//! [goal]
//! value = 0.8
//!
//! [logging]
//! filter = "info"
//! json = false
//!
//! [simulator]
//! cache_capacity = 10000
//!
//! [proposer]
//! max_proposals = 3
//! max_attempts = 2
//! catalog = "catalog.yaml"
//! ```
//!
//! Every section and key is optional.

use crate::error::EngineError;
use scenario_model::{ConfigError, ExplorationConfig, Goal};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Search parameters
    pub exploration: ExplorationConfig,
    /// Goal threshold
    pub goal: GoalSettings,
    /// Log output
    pub logging: LoggingSettings,
    /// Reference simulator
    pub simulator: SimulatorSettings,
    /// Reference proposer
    pub proposer: ProposerSettings,
}

/// `[goal]` section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoalSettings {
    /// Target success rate
    pub value: f64,
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self { value: 0.8 }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// `[simulator]` section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorSettings {
    /// Max cached seeded simulations (0 disables the cache)
    pub cache_capacity: u64,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            cache_capacity: 10_000,
        }
    }
}

/// `[proposer]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProposerSettings {
    /// Max actions returned per call
    pub max_proposals: usize,
    /// Attempts per call for transient failures
    pub max_attempts: u32,
    /// Catalog file; the embedded catalog is used when unset
    pub catalog: Option<PathBuf>,
}

impl Default for ProposerSettings {
    fn default() -> Self {
        Self {
            max_proposals: 3,
            max_attempts: 2,
            catalog: None,
        }
    }
}

impl EngineSettings {
    /// Parse and validate settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, EngineError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, EngineError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exploration.validate()?;
        self.goal()?;
        if self.proposer.max_proposals == 0 {
            return Err(ConfigError::InvalidSettings(
                "proposer.max_proposals must be at least 1".into(),
            ));
        }
        if self.proposer.max_attempts == 0 {
            return Err(ConfigError::InvalidSettings(
                "proposer.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Goal built from the `[goal]` section
    pub fn goal(&self) -> Result<Goal, ConfigError> {
        Goal::success_rate_at_least(self.goal.value)
    }
}
