use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Name of the configuration file searched for from the working directory
pub const CONFIG_FILE: &str = "vert.toml";

/// The vert configuration file structure (vert.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VertConfig {
    /// How results are printed
    pub output: OutputConfig,

    /// How candidate versions are read
    pub input: InputConfig,
}

/// Output defaults, each overridden by its command line flag
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Sort the printed versions
    pub sort: Option<bool>,

    /// Print the failed versions instead of the passed ones
    pub failed: Option<bool>,
}

/// Input defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Read candidates as `git describe --tags` output
    pub git: Option<bool>,
}

impl VertConfig {
    /// Load configuration from vert.toml, searching upward from the given directory
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE);

            if config_path.is_file() {
                let content = std::fs::read_to_string(&config_path)
                    .with_context(|| format!("Failed to read {}", config_path.display()))?;
                let config: VertConfig = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse {}", config_path.display()))?;
                log::debug!("Loaded configuration from {}", config_path.display());
                return Ok(Some(config));
            }

            // Reached filesystem root, no config found
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Load configuration by searching upward from the current working directory
    pub fn load_from_cwd() -> Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        Self::load(&cwd)
    }
}
