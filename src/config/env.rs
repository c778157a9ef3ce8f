//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

#![allow(dead_code)]

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "RUN_CONSOLE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Worker count from RUN_CONSOLE_WORKERS
    pub workers: Option<u32>,
    /// Spec file retries from RUN_CONSOLE_RETRIES
    pub retries: Option<u32>,
    /// Retry delay from RUN_CONSOLE_RETRIES_DELAY
    pub retries_delay: Option<u64>,
    /// Shard from RUN_CONSOLE_SHARD (`current/total`)
    pub shard: Option<String>,
    /// Watch mode from RUN_CONSOLE_WATCH
    pub watch: Option<bool>,
    /// Config file from RUN_CONSOLE_CONFIG
    pub config_file: Option<String>,
    /// Log level from RUN_CONSOLE_LOG
    pub log_level: Option<String>,
    /// Colour override from FORCE_COLOR
    pub force_color: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            workers: get_env_parse("WORKERS"),
            retries: get_env_parse("RETRIES"),
            retries_delay: get_env_parse("RETRIES_DELAY"),
            shard: get_env("SHARD"),
            watch: get_env_bool("WATCH"),
            config_file: get_env("CONFIG"),
            log_level: get_env("LOG"),
            force_color: env::var("FORCE_COLOR").ok().map(|v| v != "0"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.workers.is_some()
            || self.retries.is_some()
            || self.retries_delay.is_some()
            || self.shard.is_some()
            || self.watch.is_some()
            || self.config_file.is_some()
            || self.log_level.is_some()
            || self.force_color.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn workers(mut self, workers: u32) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_WORKERS"), workers.to_string()));
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_RETRIES"), retries.to_string()));
        self
    }

    pub fn shard(mut self, shard: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_SHARD"), shard.into()));
        self
    }

    pub fn watch(mut self, watch: bool) -> Self {
        self.vars
            .push((format!("{ENV_PREFIX}_WATCH"), watch.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all RUN_CONSOLE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_WORKERS        Number of workers the run starts with");
    println!("  {ENV_PREFIX}_RETRIES        Spec file retry budget");
    println!("  {ENV_PREFIX}_RETRIES_DELAY  Delay between retries in seconds");
    println!("  {ENV_PREFIX}_SHARD          Shard of the suite (current/total)");
    println!("  {ENV_PREFIX}_WATCH          Enable watch mode (true/false)");
    println!("  {ENV_PREFIX}_CONFIG         Path to configuration file");
    println!("  {ENV_PREFIX}_LOG            Log level (trace, debug, info, warn, error)");
    println!("  FORCE_COLOR                 0 disables colours, anything else forces them");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_WORKERS=8");
    println!("  export {ENV_PREFIX}_SHARD=1/2");
    println!("  run-console replay events.jsonl");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.workers.is_none());
        assert!(config.shard.is_none());
        assert!(!config.has_any());
    }

    // Single test so parallel test threads never race on the same variables
    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .workers(12)
            .retries(3)
            .shard("1/4")
            .watch(true)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.workers, Some(12));
        assert_eq!(config.retries, Some(3));
        assert_eq!(config.shard.as_deref(), Some("1/4"));
        assert_eq!(config.watch, Some(true));
        assert!(config.has_any());
    }
}
