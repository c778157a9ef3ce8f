//! Configuration module
//!
//! Handles loading and managing the run configuration.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::{expand_path, load_default};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Partition of the suite assigned to this host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shard {
    pub current: u32,
    pub total: u32,
}

impl Shard {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    /// A single shard covering the whole suite is not a sharded run
    pub fn is_sharded(&self) -> bool {
        self.total != 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.total == 0 {
            anyhow::bail!("Shard total must be at least 1");
        }
        if self.current == 0 || self.current > self.total {
            anyhow::bail!(
                "Shard index {} out of range 1..={}",
                self.current,
                self.total
            );
        }
        Ok(())
    }
}

impl FromStr for Shard {
    type Err = anyhow::Error;

    /// Parse `current/total`
    fn from_str(s: &str) -> Result<Self> {
        let (current, total) = s
            .split_once('/')
            .with_context(|| format!("Invalid shard '{s}', expected <current>/<total>"))?;
        let shard = Shard::new(
            current
                .trim()
                .parse()
                .with_context(|| format!("Invalid shard index in '{s}'"))?,
            total
                .trim()
                .parse()
                .with_context(|| format!("Invalid shard total in '{s}'"))?,
        );
        shard.validate()?;
        Ok(shard)
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

/// Construction-time configuration of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of workers the run starts with
    pub total_workers: u32,

    /// How many times a failing spec file is rescheduled
    pub spec_file_retries: u32,

    /// Delay between retries in seconds (display only)
    pub spec_file_retries_delay: u64,

    /// Shard of the suite handled by this host
    pub shard: Option<Shard>,

    /// Continuous run mode
    pub watch: bool,

    /// Force colour on/off; `None` detects from the terminal
    pub color: Option<bool>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_workers: 1,
            spec_file_retries: 0,
            spec_file_retries_delay: 0,
            shard: None,
            watch: false,
            color: None,
        }
    }
}

impl RunConfig {
    pub fn new(total_workers: u32) -> Self {
        Self {
            total_workers,
            ..Default::default()
        }
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.spec_file_retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, secs: u64) -> Self {
        self.spec_file_retries_delay = secs;
        self
    }

    pub fn with_shard(mut self, shard: Shard) -> Self {
        self.shard = Some(shard);
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = Some(color);
        self
    }

    /// Shard, if this run is actually sharded
    pub fn active_shard(&self) -> Option<Shard> {
        self.shard.filter(Shard::is_sharded)
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.total_workers == 0 {
            anyhow::bail!("total_workers must be at least 1");
        }
        if let Some(shard) = &self.shard {
            shard.validate()?;
        }
        Ok(())
    }

    /// Apply environment overrides (environment takes precedence)
    pub fn merge_env(&mut self, env: &EnvConfig) -> Result<()> {
        if let Some(workers) = env.workers {
            self.total_workers = workers;
        }
        if let Some(retries) = env.retries {
            self.spec_file_retries = retries;
        }
        if let Some(delay) = env.retries_delay {
            self.spec_file_retries_delay = delay;
        }
        if let Some(shard) = &env.shard {
            self.shard = Some(shard.parse()?);
        }
        if let Some(watch) = env.watch {
            self.watch = watch;
        }
        if let Some(color) = env.force_color {
            self.color = Some(color);
        }
        self.validate()
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
