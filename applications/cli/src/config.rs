/// Application configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use shelf_core::UploadLimits;
use shelf_playback::PlayerConfig;
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "shelf.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub upload: UploadLimits,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `shelf.toml`; an explicit path must exist.
    /// Environment variables take precedence, e.g.
    /// `SHELF_PLAYER__ERROR_SKIP_DELAY_MS=500`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (prefixed with SHELF_)
        settings = settings.add_source(
            config::Environment::with_prefix("SHELF")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let volume = self.player.default_volume;
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "player.default_volume must be within [0, 1], got {}",
                volume
            )));
        }

        let tolerance = self.player.seek_tolerance_secs;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CliError::Config(format!(
                "player.seek_tolerance_secs must be non-negative, got {}",
                tolerance
            )));
        }

        if self.upload.max_file_bytes == 0 {
            return Err(CliError::Config(
                "upload.max_file_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
