use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Editor configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// General editor settings
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Editor settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EditorConfig {
    /// Show line numbers
    #[serde(default = "default_show_line_numbers")]
    pub show_line_numbers: bool,

    /// Commands run through the vi engine at startup, before any input
    #[serde(default = "default_startup_commands")]
    pub startup_commands: Vec<String>,
}

fn default_show_line_numbers() -> bool {
    true
}

fn default_startup_commands() -> Vec<String> {
    vec![
        "set expandtab".to_string(),
        "set shiftwidth=8".to_string(),
        "set tabstop=16".to_string(),
        "set autoindent".to_string(),
        // User command file in the working directory; missing is fine
        "source kawausorc".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: default_show_line_numbers(),
            startup_commands: default_startup_commands(),
        }
    }
}

/// Configuration manager
pub struct ConfigManager {
    /// The config
    config: Config,

    /// The path to the config file
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager
    pub fn new(config_dir: &Path) -> Self {
        let config_path = config_dir.join("config.json");

        Self {
            config: Config::default(),
            config_path,
        }
    }

    /// Load the config
    pub fn load(&mut self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // Load config if it exists, otherwise use defaults
        if self.config_path.exists() {
            let config_str = fs::read_to_string(&self.config_path)?;
            self.config = serde_json::from_str(&config_str)
                .map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        }

        Ok(())
    }

    /// Save the config
    pub fn save(&self) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, config_str)?;
        Ok(())
    }

    /// Get the config
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the config
    pub fn get_config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}
