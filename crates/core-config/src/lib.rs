//! Configuration loading and parsing.
//!
//! Parses `oxed.toml` (or an override path provided by the binary). Two knobs
//! are recognized: `[errors] verbose = <bool>` (start with full error
//! messages on, as if `H` had been typed) and `[prompt] string = "<text>"`
//! (printed before each command read; the classic editor shows none).
//! Unknown fields are ignored so the file can grow without breaking older
//! binaries, and a missing or unparsable file falls back to defaults.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ErrorsConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PromptConfig {
    #[serde(default)]
    pub string: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub errors: ErrorsConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,
}

impl Config {
    pub fn verbose_errors(&self) -> bool {
        self.file.errors.verbose
    }

    pub fn prompt(&self) -> Option<&str> {
        self.file.prompt.string.as_deref()
    }
}

/// Best-effort config path following platform conventions: a local
/// `oxed.toml` wins, then the platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("oxed.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxed").join("oxed.toml");
    }
    PathBuf::from("oxed.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(Config { file })
            }
            Err(e) => {
                warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}
