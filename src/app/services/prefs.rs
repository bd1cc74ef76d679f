//! Key-value settings store.
//!
//! Two keys are used: the font choice (integer) and the poetry access token
//! (string). Writes are independent and last-write-wins; there is no
//! transaction spanning both keys.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::app::domain::settings::FontChoice;
use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    TextFontChoice,
    PoetryAccessToken,
}

impl PrefKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TextFontChoice => "text-font-choice",
            Self::PoetryAccessToken => "poetry-access-token",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Int(i64),
    Text(String),
}

impl PrefValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            Self::Int(_) => None,
        }
    }
}

pub trait SettingsStore: Send + Sync {
    /// Latest value for `key`, or `None` if it was never written.
    fn read(&self, key: PrefKey) -> Result<Option<PrefValue>>;

    fn write(&self, key: PrefKey, value: PrefValue) -> Result<()>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn read(&self, key: PrefKey) -> Result<Option<PrefValue>> {
        (**self).read(key)
    }

    fn write(&self, key: PrefKey, value: PrefValue) -> Result<()> {
        (**self).write(key, value)
    }
}

/// Stored font preference. A value of the wrong type or an unknown index
/// reads as unset.
pub fn read_font(store: &dyn SettingsStore) -> Result<Option<FontChoice>> {
    let font = match store.read(PrefKey::TextFontChoice)? {
        Some(value) => {
            let font = value.as_int().and_then(FontChoice::from_index);
            if font.is_none() {
                warn!(?value, "unrecognised font preference");
            }
            font
        }
        None => None,
    };
    Ok(font)
}

pub fn write_font(store: &dyn SettingsStore, font: FontChoice) -> Result<()> {
    store.write(PrefKey::TextFontChoice, PrefValue::Int(font.index()))
}

pub fn read_token(store: &dyn SettingsStore) -> Result<Option<String>> {
    Ok(store
        .read(PrefKey::PoetryAccessToken)?
        .and_then(|v| v.as_text().map(str::to_string)))
}

pub fn write_token(store: &dyn SettingsStore, token: &str) -> Result<()> {
    store.write(PrefKey::PoetryAccessToken, PrefValue::Text(token.to_string()))
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| AppError::Settings("settings lock poisoned".to_string()))
}

/// In-memory store, used for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<PrefKey, PrefValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn read(&self, key: PrefKey) -> Result<Option<PrefValue>> {
        Ok(lock(&self.values)?.get(&key).cloned())
    }

    fn write(&self, key: PrefKey, value: PrefValue) -> Result<()> {
        lock(&self.values)?.insert(key, value);
        Ok(())
    }
}

/// JSON object on disk. Reads always go to the file so that values written by
/// another process are seen; writes rewrite the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, PrefValue>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                AppError::Settings(format!("corrupt preferences {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for FileStore {
    fn read(&self, key: PrefKey) -> Result<Option<PrefValue>> {
        Ok(self.load()?.remove(key.as_str()))
    }

    fn write(&self, key: PrefKey, value: PrefValue) -> Result<()> {
        let _guard = lock(&self.write_lock)?;

        let mut values = self.load()?;
        values.insert(key.as_str().to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so readers never observe a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(key = key.as_str(), path = %self.path.display(), "preference written");
        Ok(())
    }
}
