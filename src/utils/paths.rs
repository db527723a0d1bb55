use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Cannot determine config directory"))?
            .join("datadeck");

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn credentials_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("credentials.json"))
    }
}
