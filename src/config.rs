use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};
use continuity_core::DEFAULT_ENDPOINT;

/// Environment variable that overrides the configured endpoint
pub const ENDPOINT_ENV: &str = "CONTINUITY_ENDPOINT";

const DEFAULT_NOTICE_SECONDS: u64 = 4;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Initial backend address. Changes made in the settings dialog are not written back.
    pub endpoint: Option<String>,
    /// How long a toast stays on screen
    pub notice_seconds: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Pick the starting endpoint: command line, then environment, then file, then default.
    pub fn resolve_endpoint(&self, flag: Option<&str>, env: Option<String>) -> String {
        flag.map(str::to_string)
            .or(env)
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn notice_seconds(&self) -> u64 {
        self.notice_seconds.unwrap_or(DEFAULT_NOTICE_SECONDS)
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("continuity"))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
