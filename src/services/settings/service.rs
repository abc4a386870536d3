use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::models::settings::EngineSettings;

/// Environment variable that points at an explicit settings file.
pub const CONFIG_PATH_ENV: &str = "GIG_LIFECYCLE_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Loads and saves [`EngineSettings`] as TOML.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service bound to the resolved default location.
    pub fn from_default_location() -> Self {
        Self::new(Self::resolve_path())
    }

    /// `$GIG_LIFECYCLE_CONFIG`, else the platform config dir, else
    /// `./config.toml`.
    pub fn resolve_path() -> PathBuf {
        if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(explicit);
        }

        if let Some(dirs) = ProjectDirs::from("com", "GigBoard", "GigLifecycle") {
            dirs.config_dir().join(CONFIG_FILE_NAME)
        } else {
            log::warn!("Unable to resolve project directory; using current dir for settings");
            PathBuf::from(CONFIG_FILE_NAME)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings, falling back to defaults when the file does not exist.
    pub fn load(&self) -> Result<EngineSettings> {
        if !self.path.exists() {
            log::info!(
                "No settings file at {}; using defaults",
                self.path.display()
            );
            return Ok(EngineSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        let settings = toml::from_str(&data)
            .with_context(|| format!("failed to parse settings in {}", self.path.display()))?;

        log::info!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    pub fn save(&self, settings: &EngineSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let data = toml::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }
}
