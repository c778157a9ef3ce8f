//! Configuration file discovery
//!
//! Finds and loads the run configuration from standard locations.

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use super::RunConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./run-console.yaml",
    "./run-console.yml",
    "./.run-console.yaml",
    "~/.config/run-console/config.yaml",
];

/// Find configuration file in standard locations
pub fn find_config() -> Option<PathBuf> {
    CONFIG_LOCATIONS
        .iter()
        .map(|location| expand_path(location))
        .find(|path| path.exists())
}

/// Load configuration from default location, falling back to defaults
pub fn load_default() -> Result<RunConfig> {
    match find_config() {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            RunConfig::load(&path)
        }
        None => Ok(RunConfig::default()),
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(expand_path("./a.yaml"), PathBuf::from("./a.yaml"));
    }

    #[test]
    fn test_expand_path_home() {
        let expanded = expand_path("~/x/config.yaml");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("x/config.yaml"));
        }
    }
}
