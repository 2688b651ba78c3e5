//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::Project;
use crate::entities::pricing::Strategy;

/// PricePlan configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strategy `analyze` reports when none is given
    pub default_strategy: Option<Strategy>,

    /// Symbol printed in front of prices
    pub currency_symbol: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// `project` is the already discovered project, if any.
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/priceplan/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 2. Project config (.priceplan/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 3. Environment variables
        if let Ok(strategy) = std::env::var("PRICEPLAN_STRATEGY") {
            match strategy.parse::<Strategy>() {
                Ok(strategy) => config.default_strategy = Some(strategy),
                Err(e) => warn!(value = %strategy, error = %e, "ignoring PRICEPLAN_STRATEGY"),
            }
        }
        if let Ok(symbol) = std::env::var("PRICEPLAN_CURRENCY") {
            config.currency_symbol = Some(symbol);
        }

        config
    }

    /// Unreadable or malformed files are skipped
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "priceplan")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_strategy.is_some() {
            self.default_strategy = other.default_strategy;
        }
        if other.currency_symbol.is_some() {
            self.currency_symbol = other.currency_symbol;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.default_strategy.unwrap_or(Strategy::Optimal)
    }

    pub fn currency(&self) -> &str {
        self.currency_symbol.as_deref().unwrap_or("$")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut config: Config =
            serde_yml::from_str("default_strategy: value\ncurrency_symbol: \"€\"\n").unwrap();
        config.merge(Config {
            currency_symbol: Some("£".to_string()),
            ..Default::default()
        });

        assert_eq!(config.strategy(), Strategy::Value);
        assert_eq!(config.currency(), "£");
        assert_eq!(config.default_format, None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.strategy(), Strategy::Optimal);
        assert_eq!(config.currency(), "$");
    }

    #[test]
    fn test_project_layer_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.config_path(), "default_format: json\n").unwrap();

        let config = Config::load_for(Some(&project));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "default_strategy: [not, a, strategy]\n").unwrap();
        assert!(Config::read_file(&path).is_none());
    }
}
