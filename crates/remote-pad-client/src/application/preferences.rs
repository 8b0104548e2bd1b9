//! Preference persistence port and the persisted sensitivity setting.
//!
//! The controller keeps exactly one user preference, the sensitivity factor.
//! It is read once at startup and written back after every adjustment.  The
//! storage itself sits behind [`PreferenceStore`] so tests can substitute an
//! in-memory or mocked store for the TOML file used in production.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use remote_pad_core::Sensitivity;

/// Key under which the sensitivity is persisted.
pub const SENSITIVITY_KEY: &str = "sensitivity";

/// Error type for preference storage operations.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The stored preferences could not be parsed.
    #[error("preferences at {path} are corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
    /// The preferences could not be encoded for storage.
    #[error("failed to encode preferences: {0}")]
    Encode(String),
}

/// Key/value storage for user preferences.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send {
    /// Returns the stored value for `name`, if any.
    fn get(&self, name: &str) -> Option<String>;

    /// Stores `value` under `name`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError`] when the value cannot be written.
    fn set(&mut self, name: &str, value: &str) -> Result<(), PreferenceError>;
}

/// The sensitivity factor together with the store it is persisted in.
pub struct SensitivitySetting {
    current: Sensitivity,
    store: Box<dyn PreferenceStore>,
}

impl SensitivitySetting {
    /// Reads the persisted sensitivity from `store`.
    ///
    /// Missing or unparseable values fall back to the default of 1.0.
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let stored = store.get(SENSITIVITY_KEY);
        let current = Sensitivity::from_stored(stored.as_deref());
        debug!("loaded sensitivity {:.1}", current.value());
        Self { current, store }
    }

    /// Returns the current sensitivity.
    pub fn current(&self) -> Sensitivity {
        self.current
    }

    /// Returns the current factor as a plain number.
    pub fn value(&self) -> f64 {
        self.current.value()
    }

    /// Raises the factor by one step, persists it, and returns the new value.
    pub fn increment(&mut self) -> Sensitivity {
        self.current.increment();
        self.persist();
        self.current
    }

    /// Lowers the factor by one step, persists it, and returns the new value.
    pub fn decrement(&mut self) -> Sensitivity {
        self.current.decrement();
        self.persist();
        self.current
    }

    /// A failed write keeps the in-memory value; the next adjustment retries.
    fn persist(&mut self) {
        let stored = self.current.to_stored();
        if let Err(e) = self.store.set(SENSITIVITY_KEY, &stored) {
            warn!("could not persist sensitivity {stored}: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
