//! Durable key/value storage for the quote list and the settings.
//!
//! Values are opaque strings keyed by name. A missing key is the normal
//! "use defaults" case, never an error. Whatever is read back is repaired on
//! the way in: the quote list drops entries that do not decode (all of them
//! when the list itself cannot be parsed) and the settings always pass
//! through the normalizer.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use quote_common::{DisplayStyle, Quote, RawSettings, Result, Settings};
use serde_json::Value;

/// Key of the serialized quote list.
pub const QUOTES_KEY: &str = "quotes";
/// Key of the displayed refresh interval.
pub const REFRESH_INTERVAL_KEY: &str = "refreshInterval";
/// Key of the scroll speed.
pub const SCROLL_SPEED_KEY: &str = "scrollSpeed";
/// Key of the display style.
pub const DISPLAY_STYLE_KEY: &str = "displayStyle";

/// Opaque string storage.
pub trait Storage: Send {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// In-memory storage; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage backed by one JSON object file.
///
/// Every `set` rewrites the whole file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Open `path`. A missing file is empty storage; an unreadable one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Storage file {} is corrupt, starting empty: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// Read the persisted quote list.
///
/// Missing or unparseable data yields an empty list. Entries that do not
/// decode as a `Quote` are skipped one by one and the rest are kept.
pub fn load_quotes(storage: &dyn Storage) -> Result<Vec<Quote>> {
    let Some(blob) = storage.get(QUOTES_KEY)? else {
        return Ok(Vec::new());
    };
    let entries: Vec<Value> = match serde_json::from_str(&blob) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Persisted quote list is unreadable, starting empty: {}", e);
            return Ok(Vec::new());
        }
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Quote>(entry) {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("Skipping persisted quote #{}: {}", index, e);
                None
            }
        })
        .collect())
}

/// Persist the quote list.
pub fn save_quotes(storage: &mut dyn Storage, quotes: &[Quote]) -> Result<()> {
    storage.set(QUOTES_KEY, serde_json::to_string(quotes)?)
}

/// Read and normalize the settings. Missing or garbled scalars fall back to defaults.
pub fn load_settings(storage: &dyn Storage) -> Result<Settings> {
    let number = |key: &str| -> Result<f64> {
        Ok(storage
            .get(key)?
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0))
    };
    let display_style = storage
        .get(DISPLAY_STYLE_KEY)?
        .and_then(|v| v.trim().parse::<DisplayStyle>().ok())
        .unwrap_or_default();

    Ok(Settings::normalize(RawSettings {
        refresh_interval: number(REFRESH_INTERVAL_KEY)?,
        scroll_speed: number(SCROLL_SPEED_KEY)?,
        display_style,
    }))
}

/// Persist the three settings scalars.
pub fn save_settings(storage: &mut dyn Storage, settings: &Settings) -> Result<()> {
    storage.set(
        REFRESH_INTERVAL_KEY,
        settings.refresh_interval_display().to_string(),
    )?;
    storage.set(SCROLL_SPEED_KEY, settings.scroll_speed().to_string())?;
    storage.set(DISPLAY_STYLE_KEY, settings.display_style().to_string())
}
