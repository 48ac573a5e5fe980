use crate::error::{Result, SaludosError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const CONFIG_DIR_ENV: &str = "SALUDOS_CONFIG_DIR";
const DEFAULT_IMAGE: &str = "EhE0ruYWoAUY85U.jpeg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Configuration for saludos, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// How many times a confirmation prompt pair may be entered before failing
    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: u32,

    #[serde(default)]
    pub color: ColorChoice,

    /// Image opened by `lanzar`
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_confirm_attempts() -> u32 {
    1
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            confirm_attempts: default_confirm_attempts(),
            color: ColorChoice::default(),
            image: default_image(),
        }
    }
}

impl AppConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// `SALUDOS_CONFIG_DIR` if set, otherwise the platform config directory.
pub fn config_dir(env: &HashMap<String, String>) -> Result<PathBuf> {
    if let Some(dir) = env.get(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "saludos", "saludos")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| SaludosError::Config("could not determine config directory".to_string()))
}
