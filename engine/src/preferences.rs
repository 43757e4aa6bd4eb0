//! Persisted user preferences (`~/.mcq/preferences.json`).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "darkMode", default)]
    pub dark_mode: bool,
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse preferences at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write preferences at {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed preference storage. Writes are atomic.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, if a home directory is known.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        crate::config::data_dir().map(|dir| Self::new(dir.join("preferences.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Preferences>, PreferencesError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PreferencesError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| PreferencesError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        let bytes = serde_json::to_vec(preferences)?;
        mcq_utils::atomic_write(&self.path, &bytes).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
