//! User settings stored as `config.yaml`
//!
//! The file lives next to the running executable, which after an install is
//! the self-copy inside the managed directory. `JPEGLI_EXPLORER_CONFIG`
//! points at a different file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, config};

/// Environment variable overriding the settings file location
pub const CONFIG_PATH_ENV: &str = "JPEGLI_EXPLORER_CONFIG";

/// Settings file name
pub const CONFIG_FILE: &str = "config.yaml";

/// Default butteraugli distance passed to `cjpegli`
pub const DEFAULT_DISTANCE: f64 = 0.5;

/// Valid range for the distance
pub const MIN_DISTANCE: f64 = 0.0;
pub const MAX_DISTANCE: f64 = 25.0;

/// Persisted settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Encoder distance, lower is higher quality
    #[serde(default = "default_distance")]
    pub distance: f64,
}

fn default_distance() -> f64 {
    DEFAULT_DISTANCE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl Settings {
    /// Load settings from `path`, writing defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings at {}, writing defaults", path.display());
                let settings = Self::default();
                settings.save(path)?;
                return Ok(settings);
            }
            Err(e) => {
                return Err(config::parse_failed(
                    path.display().to_string(),
                    e.to_string(),
                ));
            }
        };

        let settings: Self = serde_yaml::from_str(&content)
            .map_err(|e| config::parse_failed(path.display().to_string(), e.to_string()))?;
        debug!("Loaded settings from {}: {settings:?}", path.display());
        Ok(settings)
    }

    /// Write settings to `path`, creating its parent directory
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_failed =
            |reason: String| config::write_failed(path.display().to_string(), reason);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| write_failed(e.to_string()))?;
        fs::write(path, yaml).map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }

    /// Replace the distance after checking its range
    pub fn set_distance(&mut self, distance: f64) -> Result<()> {
        validate_distance(distance)?;
        self.distance = distance;
        Ok(())
    }
}

/// Check that `distance` lies within the accepted range
pub fn validate_distance(distance: f64) -> Result<()> {
    if !(MIN_DISTANCE..=MAX_DISTANCE).contains(&distance) {
        return Err(config::invalid(format!(
            "distance must be between {MIN_DISTANCE} and {MAX_DISTANCE}, got {distance}"
        )));
    }
    Ok(())
}

/// Location of the settings file
///
/// `JPEGLI_EXPLORER_CONFIG` when set, otherwise `config.yaml` in the
/// directory of the running executable.
pub fn settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let exe = std::env::current_exe()?;
    let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(dir.join(CONFIG_FILE))
}
