use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::selection::Selection;

/// Resolve the global data directory (~/.spice-analyzer/).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".spice-analyzer")
}

/// Write through a temp file + rename so readers never see a half-written file.
fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp = dir.join(format!(".{}.tmp", file_name));
    fs::write(&tmp, data).map_err(|e| Error::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(path, e))
}

pub fn default_language() -> String {
    "ru".to_string()
}

// --- Persisted selection ---

/// What survives a restart: the selection lists and the UI language.
/// Derived sets are always recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(flatten)]
    pub selection: Selection,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for PersistedState {
    fn default() -> Self {
        PersistedState {
            selection: Selection::default(),
            language: default_language(),
        }
    }
}

/// Key/value slot holding the persisted selection.
pub trait StateStore: Send {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>>;
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// `state.json` on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// `state.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        FileStore::new(dir.join("state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileStore {
    fn default() -> Self {
        FileStore::in_dir(&data_dir())
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::json(self.path.display().to_string(), e))
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let json =
            serde_json::to_string_pretty(state).map_err(|e| Error::json("persisted state", e))?;
        write_atomic(&self.path, &json)
    }
}

/// In-memory slot. Clones share the same slot, so a test can keep a handle
/// after moving the store into an `AppState`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with raw JSON, as if a previous session had written it.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        MemoryStore {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedState>> {
        match self.raw() {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::json("memory store", e)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let json = serde_json::to_string(state).map_err(|e| Error::json("persisted state", e))?;
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(json);
        }
        Ok(())
    }
}

// --- Settings ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Brief,
    Detailed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory holding products.json, methods.json and spices.json.
    /// The builtin catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_dir: Option<PathBuf>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub text_style: TextStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            catalog_dir: None,
            language: default_language(),
            text_style: TextStyle::default(),
        }
    }
}

fn settings_path(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

/// Read `settings.json` from `dir`. Missing or malformed files yield defaults.
pub fn read_settings_in(dir: &Path) -> Settings {
    let path = settings_path(dir);
    if !path.exists() {
        return Settings::default();
    }
    match fs::read_to_string(&path)
        .map_err(|e| Error::io(&path, e))
        .and_then(|raw| serde_json::from_str(&raw).map_err(|e| Error::json("settings.json", e)))
    {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("ignoring settings: {}", e);
            Settings::default()
        }
    }
}

pub fn read_settings() -> Settings {
    read_settings_in(&data_dir())
}

pub fn write_settings_in(dir: &Path, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::json("settings", e))?;
    write_atomic(&settings_path(dir), &json)
}
