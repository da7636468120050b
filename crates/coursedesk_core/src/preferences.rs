//! Persisted UI preferences (dark mode).

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dark_mode: Option<bool>,
}

#[derive(Debug)]
pub enum PreferencesError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
}

impl Display for PreferencesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "preferences file `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid preferences file: {err}"),
        }
    }
}

impl Error for PreferencesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PreferencesError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Dark-mode flag backed by a JSON file.
///
/// A stored value wins over the OS colour-scheme preference; the OS value
/// applies only when nothing has been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    path: PathBuf,
    dark_mode: bool,
}

impl Preferences {
    pub fn load(
        path: impl Into<PathBuf>,
        system_prefers_dark: bool,
    ) -> Result<Self, PreferencesError> {
        let path = path.into();
        let stored = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<StoredPreferences>(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoredPreferences::default(),
            Err(source) => return Err(PreferencesError::Io { path, source }),
        };

        Ok(Self {
            dark_mode: stored.dark_mode.unwrap_or(system_prefers_dark),
            path,
        })
    }

    /// Like `load`, but an unreadable file falls back to the OS preference.
    pub fn load_or_default(path: impl Into<PathBuf>, system_prefers_dark: bool) -> Self {
        let path = path.into();
        Self::load(path.clone(), system_prefers_dark).unwrap_or_else(|err| {
            warn!(
                "event=preferences_load module=preferences status=error path={} error={}",
                path.display(),
                err
            );
            Self {
                path,
                dark_mode: system_prefers_dark,
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Sets and persists the flag. In-memory state changes only on a
    /// successful write.
    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), PreferencesError> {
        let raw = serde_json::to_string_pretty(&StoredPreferences {
            dark_mode: Some(enabled),
        })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PreferencesError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, raw).map_err(|source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        })?;

        self.dark_mode = enabled;
        info!(
            "event=preferences_save module=preferences status=ok dark_mode={}",
            enabled
        );
        Ok(())
    }

    /// Flips the flag and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> Result<bool, PreferencesError> {
        let next = !self.dark_mode;
        self.set_dark_mode(next)?;
        Ok(next)
    }
}
