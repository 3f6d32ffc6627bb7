use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use studio_core::ResumeDocument;
use studio_engine::TrackerSettings;
use studio_logging::{studio_info, studio_warn};
use thiserror::Error;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "studio.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Loads tracker settings from a RON file.
///
/// A missing file means defaults. An unreadable or malformed file is logged
/// and also falls back to defaults; settings never stop the studio.
pub fn load_settings(path: &Path) -> TrackerSettings {
    match read_settings(path) {
        Ok(Some(settings)) => {
            studio_info!("Loaded settings from {:?}", path);
            settings
        }
        Ok(None) => TrackerSettings::default(),
        Err(err) => {
            studio_warn!("{}; using default settings", err);
            TrackerSettings::default()
        }
    }
}

fn read_settings(path: &Path) -> Result<Option<TrackerSettings>, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|err| SettingsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

/// Loads a resume document from JSON. Unlike settings, an explicit resume must load.
pub fn load_resume(path: &Path) -> Result<ResumeDocument, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|err| SettingsError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
