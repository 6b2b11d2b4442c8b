use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::format::DEFAULT_SUFFIX;

pub const DEFAULT_CONFIG_FILE: &str = "huffpack.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Appended to encoded file names, stripped when decoding.
    pub suffix: String,
    pub overwrite: bool,
    pub log_filter: String,
    /// Decode each new container in memory before writing it.
    pub verify_after_encode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            overwrite: true,
            log_filter: "huffpack=info".to_string(),
            verify_after_encode: false,
        }
    }
}

impl Config {
    /// Load from `config_path`, or from `huffpack.toml` when it exists,
    /// falling back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.suffix.len() < 2 || !self.suffix.starts_with('.') {
            bail!("suffix must start with '.' and name an extension, got {:?}", self.suffix);
        }
        Ok(())
    }

    /// `input` plus the configured suffix.
    pub fn encoded_name(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_owned();
        name.push(&self.suffix);
        PathBuf::from(name)
    }

    /// `input` without the configured suffix, or with `.out` appended when
    /// the suffix is absent (or the path is not UTF-8) so the input is never
    /// overwritten.
    pub fn decoded_name(&self, input: &Path) -> PathBuf {
        let stem = input
            .to_str()
            .and_then(|text| text.strip_suffix(self.suffix.as_str()))
            .filter(|stem| !stem.is_empty() && !stem.ends_with(std::path::MAIN_SEPARATOR));

        match stem {
            Some(stem) => PathBuf::from(stem),
            None => {
                let mut name = input.as_os_str().to_owned();
                name.push(".out");
                PathBuf::from(name)
            }
        }
    }
}
