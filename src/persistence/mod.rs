//! Settings persistence
//!
//! Features:
//! - Versioned JSON record
//! - Factory reset when the stored version does not match
//! - Pluggable backing store (in-memory or a file on disk)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::settings::{SETTINGS_VERSION, Settings};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings record could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-volatile byte storage for the settings record
pub trait SettingsStore {
    /// Stored bytes, or `None` if nothing was ever written
    fn read(&mut self) -> Result<Option<Vec<u8>>, SettingsError>;
    fn write(&mut self, bytes: &[u8]) -> Result<(), SettingsError>;
}

/// Volatile store for tests and runs without a settings file
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Option<Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl SettingsStore for MemoryStore {
    fn read(&mut self) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SettingsError> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn read(&mut self) -> Result<Option<Vec<u8>>, SettingsError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SettingsError> {
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// Only the version is read before trusting the rest of the record
#[derive(Deserialize)]
struct VersionProbe {
    settings_version: u8,
}

/// Load the record, falling back to factory defaults when it is missing,
/// unreadable, or written by a different layout version. A readable record
/// is clamped into range before it is returned.
pub fn load(store: &mut impl SettingsStore) -> Result<Settings, SettingsError> {
    let Some(bytes) = store.read()? else {
        log::info!("No stored settings, loading defaults");
        return factory_reset(store);
    };

    match serde_json::from_slice::<VersionProbe>(&bytes) {
        Ok(probe) if probe.settings_version == SETTINGS_VERSION => {}
        Ok(probe) => {
            log::warn!(
                "Stored settings version {} != {}, loading defaults",
                probe.settings_version,
                SETTINGS_VERSION
            );
            return factory_reset(store);
        }
        Err(err) => {
            log::warn!("Stored settings unreadable ({}), loading defaults", err);
            return factory_reset(store);
        }
    }

    match serde_json::from_slice::<Settings>(&bytes) {
        Ok(mut settings) => {
            log::info!("Loaded settings version {}", settings.settings_version);
            if settings.clamp() {
                log::warn!("Stored settings held out-of-range values, clamped");
            }
            Ok(settings)
        }
        Err(err) => {
            log::warn!("Stored settings corrupt ({}), loading defaults", err);
            factory_reset(store)
        }
    }
}

pub fn save(settings: &Settings, store: &mut impl SettingsStore) -> Result<(), SettingsError> {
    let bytes = serde_json::to_vec_pretty(settings)?;
    store.write(&bytes)?;
    log::debug!("Settings saved");
    Ok(())
}

fn factory_reset(store: &mut impl SettingsStore) -> Result<Settings, SettingsError> {
    let settings = Settings::default();
    save(&settings, store)?;
    Ok(settings)
}
