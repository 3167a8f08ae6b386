//! JSON configuration file adapter.
//!
//! Implements [`ConfigSource`].  The file path comes from the
//! `PIBOT_CONFIG` environment variable; without it, or when the file
//! does not exist, the built-in defaults are used.  Whatever is loaded
//! is validated before it is handed out.

use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::ConfigSource;
use crate::config::RobotConfig;
use crate::error::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PIBOT_CONFIG";

pub struct JsonConfigFile {
    path: Option<PathBuf>,
}

impl JsonConfigFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Path from [`CONFIG_ENV`], if set.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }
}

impl ConfigSource for JsonConfigFile {
    fn load(&self) -> Result<RobotConfig> {
        let config = match &self.path {
            None => {
                info!("Config: no {} set, using defaults", CONFIG_ENV);
                RobotConfig::default()
            }
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => {
                    let cfg: RobotConfig = serde_json::from_str(&text).map_err(|e| {
                        warn!("Config: {} is not valid: {}", path.display(), e);
                        Error::Config("malformed config file")
                    })?;
                    info!("Config: loaded {}", path.display());
                    cfg
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("Config: {} not found, using defaults", path.display());
                    RobotConfig::default()
                }
                Err(e) => {
                    warn!("Config: cannot read {}: {}", path.display(), e);
                    return Err(Error::Config("config file unreadable"));
                }
            },
        };
        config.validate()?;
        Ok(config)
    }
}
