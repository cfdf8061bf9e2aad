use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote backend. Empty means local-only mode.
    #[serde(default)]
    pub api_base: String,

    /// Where session and board files live. Defaults to ~/.todo.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

const CONFIG_FILE_PATH: &str = "config.toml";

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config {
            api_base: String::new(),
            data_dir: None,
        };

        //detect the config file exists
        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Some(file_config) = Self::from_toml_str(&content) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables if they exist
        if let Ok(api_base) = std::env::var("TODO_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(data_dir) = std::env::var("TODO_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(data_dir));
        }
        config
    }

    pub fn from_toml_str(content: &str) -> Option<Self> {
        toml::from_str::<Config>(content).ok()
    }

    /// Remote mode is enabled when a backend URL is configured.
    pub fn is_remote(&self) -> bool {
        !self.api_base.trim().is_empty()
    }

    /// Resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::todo_dir)
    }
}
