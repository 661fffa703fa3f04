//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod scan;

use std::path::PathBuf;

use tracing::debug;

use dialscan_core::DialscanConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dialscan")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DialscanConfig> {
    let path = match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(default_config_path()).filter(|p| p.exists()),
    };

    let config = match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            DialscanConfig::from_file(&path)?
        }
        None => DialscanConfig::default(),
    };

    config.validate()?;
    Ok(config)
}
