use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::bridge::ReadyStrategy;
use crate::error::{BridgeError, Result};

pub const DEFAULT_DATABASE: &str = "todo.db";
pub const DEFAULT_READY_DELAY_MS: u64 = 2000;

/// Host configuration, read from an optional YAML file and then overridden
/// by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite file holding the task table.
    pub database: PathBuf,
    pub readiness: ReadinessConfig,
    /// `tracing` filter directive, e.g. `todo_bridge=debug`.
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadinessConfig {
    pub strategy: StrategyKind,
    /// Only used by [`StrategyKind::Delay`].
    pub delay_ms: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Handshake,
    Delay,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            readiness: ReadinessConfig::default(),
            log_filter: None,
        }
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Handshake,
            delay_ms: DEFAULT_READY_DELAY_MS,
        }
    }
}

impl ReadinessConfig {
    pub fn strategy(&self) -> ReadyStrategy {
        match self.strategy {
            StrategyKind::Handshake => ReadyStrategy::Handshake,
            StrategyKind::Delay => ReadyStrategy::Delay(Duration::from_millis(self.delay_ms)),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty file is a valid "all defaults" config.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            return Err(BridgeError::Config("database path is empty".into()));
        }
        Ok(())
    }
}
