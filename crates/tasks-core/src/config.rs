use crate::{TaskError, TaskResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Task file used when no path is given on the command line.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Maximum number of undo steps kept; unbounded when unset.
    #[serde(default)]
    pub history_limit: Option<usize>,

    #[serde(default)]
    pub default_sort: Option<String>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/tasks/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("tasks/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("tasks\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the user configuration, falling back to defaults when the file
    /// is missing or malformed.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(config) = Self::from_toml_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> TaskResult<Self> {
        toml::from_str(content).map_err(|e| TaskError::Config(e.to_string()))
    }

    pub fn effective_default_sort(&self) -> &str {
        self.default_sort.as_deref().unwrap_or("id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.effective_default_sort(), "id");
    }

    #[test]
    fn test_parse_all_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            data_file = "/tmp/tasks.json"
            history_limit = 25
            default_sort = "state"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/tasks.json")));
        assert_eq!(config.history_limit, Some(25));
        assert_eq!(config.effective_default_sort(), "state");
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let err = AppConfig::from_toml_str("history_limit = \"many\"").unwrap_err();
        assert!(matches!(err, TaskError::Config(_)));
    }
}
