use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::BoardSettings;

const SETTINGS_FILE: &str = "board.toml";

/// Reads and writes `BoardSettings` as a TOML file.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service backed by the platform config directory, falling back to the
    /// working directory when no home directory can be resolved.
    pub fn for_user() -> Self {
        let path = ProjectDirs::from("com", "ScheduleBoard", "ScheduleBoard")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields defaults.
    pub fn get(&self) -> Result<BoardSettings> {
        if !self.path.exists() {
            return Ok(BoardSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        let settings: BoardSettings = toml::from_str(&data)
            .with_context(|| format!("failed to parse settings in {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;
        Ok(settings)
    }

    /// Load settings, logging and falling back to defaults on any problem.
    pub fn get_or_default(&self) -> BoardSettings {
        match self.get() {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {:#}", err);
                BoardSettings::default()
            }
        }
    }

    pub fn update(&self, settings: &BoardSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

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
