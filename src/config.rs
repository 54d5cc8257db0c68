use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable that overrides the configured backend base URL
pub const API_BASE_ENV: &str = "XPBOARD_API_BASE";

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend exposing `/auth/signin` and `/graphql`
    pub api_base: String,
    /// Maximum number of XP transactions requested
    pub xp_limit: usize,
    /// Number of projects shown before the rest collapse into "Others"
    pub top_projects: usize,
    /// Number of recent results shown on the dashboard
    pub recent_results: usize,
    /// Distinct results fetched for the pass rate; the recent list is its head
    pub results_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: DEFAULT_API_BASE.to_string(),
            xp_limit: 2000,
            top_projects: 10,
            recent_results: 8,
            results_window: 100,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "xpboard", "xpboard")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Load the config file, falling back to defaults when it does not exist,
    /// then apply the environment override.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        let config = Self::load_from(&config_path)?;
        Ok(config.with_env_override(std::env::var(API_BASE_ENV).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let config_data =
            fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        fs::write(path, config_data).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    /// Replace `api_base` with a non-blank override
    pub fn with_env_override(mut self, api_base: Option<String>) -> Self {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        self
    }

    /// Base URL without trailing slashes, rejected unless it is http(s)
    pub fn normalized_api_base(&self) -> Result<String, ConfigError> {
        let base = self.api_base.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidApiBase(self.api_base.clone()));
        }
        Ok(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top_projects, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base": "https://proxy.example.org"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base, "https://proxy.example.org");
        assert_eq!(config.xp_limit, 2000);
        assert_eq!(config.recent_results, 8);
        assert_eq!(config.results_window, 100);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            top_projects: 5,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_env_override(Some("https://other.host/".to_string()));
        assert_eq!(config.api_base, "https://other.host/");
        assert_eq!(config.normalized_api_base().unwrap(), "https://other.host");

        let config = Config::default().with_env_override(Some("   ".to_string()));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_invalid_api_base() {
        let config = Config {
            api_base: "ftp://nope".to_string(),
            ..Config::default()
        };
        assert!(config.normalized_api_base().is_err());
    }
}
