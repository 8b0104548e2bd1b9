//! Preference stores.
//!
//! [`TomlPreferenceStore`] keeps preferences as a flat TOML table in the
//! platform-appropriate config directory:
//! - Windows:  `%APPDATA%\RemotePad\preferences.toml`
//! - Linux:    `~/.config/remote-pad/preferences.toml`
//! - macOS:    `~/Library/Application Support/RemotePad/preferences.toml`
//!
//! ```toml
//! sensitivity = "1.5"
//! ```
//!
//! Values are stored as strings so the file is never rejected because a value
//! has an unexpected type; interpreting them is the caller's job.
//!
//! [`MemoryPreferenceStore`] keeps everything in a map and forgets it on exit.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::preferences::{PreferenceError, PreferenceStore};

const PREFERENCES_FILE: &str = "preferences.toml";

/// Resolves the default preference file path, if the platform has one.
pub fn default_preferences_path() -> Option<PathBuf> {
    platform_config_dir().map(|dir| dir.join(PREFERENCES_FILE))
}

/// A preference store backed by a TOML file.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlPreferenceStore {
    /// Loads the store from `path`.  A missing file yields an empty store; the
    /// file is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::Io`] for file-system errors other than "not
    /// found", and [`PreferenceError::Corrupt`] if the TOML is malformed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| PreferenceError::Corrupt {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no preferences at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(PreferenceError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), PreferenceError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| PreferenceError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content =
            toml::to_string_pretty(&self.values).map_err(|e| PreferenceError::Encode(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    /// Writes through to disk.  On failure the in-memory value is still updated.
    fn set(&mut self, name: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(name.to_string(), value.to_string());
        self.save()
    }
}

/// A preference store that lives only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), PreferenceError> {
        self.insert(name, value);
        Ok(())
    }
}

/// Resolves the platform config directory for remote-pad.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("RemotePad"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("remote-pad"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("RemotePad")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
