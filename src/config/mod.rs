//! Configuration: directory layout, launcher settings and RetroArch's config file.

pub mod retroarch_cfg;

pub use retroarch_cfg::RetroArchConfig;

use crate::models::LauncherConfig;
use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Directory name used under the user's config root
pub const CONFIG_NAME: &str = "arcadenne";

/// Directory name of RetroArch's own configuration under the user's config root
pub const RETROARCH_CONFIG_NAME: &str = "retroarch";

/// Launcher settings file inside the launcher config directory
pub const LAUNCHER_CONFIG_FILE: &str = "arcadenne.yaml";

/// Errors in configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing config key: {0}")]
    MissingKey(String),

    #[error("invalid display mode: {0}")]
    InvalidDisplayMode(String),
}

/// Every directory the launcher reads from or writes to.
///
/// Built once at startup and handed to the components that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Launcher config directory (`~/.config/arcadenne`)
    pub config_dir: Utf8PathBuf,

    /// Title-card cache
    pub titles_dir: Utf8PathBuf,

    /// Rotating log files
    pub log_dir: Utf8PathBuf,

    /// Directory holding retroarch.cfg
    pub retroarch_config_dir: Utf8PathBuf,

    /// Used for `~` expansion in RetroArch paths
    pub home_dir: Option<Utf8PathBuf>,
}

impl Paths {
    /// Standard layout below a config root (normally `$XDG_CONFIG_HOME`).
    pub fn under_config_root(config_root: &Utf8Path, home_dir: Option<Utf8PathBuf>) -> Self {
        let config_dir = config_root.join(CONFIG_NAME);
        Self {
            titles_dir: config_dir.join("titles"),
            log_dir: config_dir.join("logs"),
            retroarch_config_dir: config_root.join(RETROARCH_CONFIG_NAME),
            config_dir,
            home_dir,
        }
    }

    /// Standard layout for the current user.
    pub fn discover() -> Result<Self> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow!("Could not determine the user's home directory"))?;

        let config_root = Utf8PathBuf::from_path_buf(base.config_dir().to_path_buf())
            .map_err(|p| anyhow!("Config directory is not valid UTF-8: {}", p.display()))?;
        let home_dir = Utf8PathBuf::from_path_buf(base.home_dir().to_path_buf()).ok();

        Ok(Self::under_config_root(&config_root, home_dir))
    }

    /// Apply directory overrides from the launcher settings.
    pub fn with_overrides(mut self, config: &LauncherConfig) -> Self {
        if let Some(dir) = &config.titles_dir {
            self.titles_dir = dir.clone();
        }
        if let Some(dir) = &config.retroarch_config_dir {
            self.retroarch_config_dir = dir.clone();
        }
        self
    }

    /// Create the directories the launcher writes to.
    pub fn ensure_writable_dirs(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.titles_dir, &self.log_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory: {}", dir))?;
            }
        }
        Ok(())
    }
}

/// Where a loaded launcher config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from `arcadenne.yaml`
    File,
    /// The file was missing; built-in defaults are in use
    Defaults,
}

/// Configuration manager for loading and saving `arcadenne.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager for the launcher config directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(LAUNCHER_CONFIG_FILE),
            config_dir,
        })
    }

    /// Load the launcher configuration.
    ///
    /// Loading happens before logging is configured, so nothing is logged here; pass the
    /// returned [`ConfigSource`] to [`ConfigManager::log_source`] once it is.
    ///
    /// # Returns
    /// The loaded LauncherConfig, or defaults if the file doesn't exist
    pub fn load_config(&self) -> Result<(LauncherConfig, ConfigSource)> {
        if !self.config_path.exists() {
            return Ok((LauncherConfig::default(), ConfigSource::Defaults));
        }

        let file_contents = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read launcher config: {}", self.config_path))?;

        let config: LauncherConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse launcher config: {}", self.config_path))?;

        Ok((config, ConfigSource::File))
    }

    /// Report where the launcher config came from.
    pub fn log_source(&self, source: ConfigSource) {
        match source {
            ConfigSource::File => {
                tracing::info!("Loaded launcher config from {}", self.config_path)
            }
            ConfigSource::Defaults => tracing::warn!(
                "Launcher config file not found at {}, using defaults",
                self.config_path
            ),
        }
    }

    /// Save the launcher configuration.
    pub fn save_config(&self, config: &LauncherConfig) -> Result<()> {
        let yaml_string = serde_yaml_ng::to_string(config)
            .context("Failed to serialize launcher config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write launcher config: {}", self.config_path))?;

        tracing::info!("Saved launcher config to {}", self.config_path);
        Ok(())
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
