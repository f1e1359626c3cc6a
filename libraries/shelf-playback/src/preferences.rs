//! Player preference persistence
//!
//! Volume, mode, mute and favorites survive across sessions through a
//! key-value [`PreferenceStore`]. Restoring is lenient: a missing or
//! malformed value falls back to its default and is logged.

use crate::error::{PlaybackError, Result};
use crate::types::{PlaybackMode, PlayerState};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shelf_core::TrackId;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key for the volume preference (number in `[0, 1]`)
pub const VOLUME_KEY: &str = "player-volume";

/// Key for the playback mode preference (mode name)
pub const MODE_KEY: &str = "player-mode";

/// Key for the mute preference (boolean)
pub const MUTE_KEY: &str = "player-mute";

/// Key for the favorites preference (list of track ids)
pub const FAVORITES_KEY: &str = "player-favorites";

/// Key-value store for preferences
pub trait PreferenceStore {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a value
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// In-memory preference store
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, Value>,
}

impl MemoryPreferences {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preference store backed by a JSON object file
///
/// The whole file is rewritten on every `set`. A missing file is an empty
/// store.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFilePreferences {
    /// Open (or lazily create) the preference file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&contents)? {
                Value::Object(map) => map,
                _ => {
                    return Err(PlaybackError::Preferences(format!(
                        "{} does not contain a JSON object",
                        path.display()
                    )))
                }
            }
        } else {
            Map::new()
        };

        debug!(path = %path.display(), keys = values.len(), "Opened preference file");
        Ok(Self { path, values })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// Persisted subset of the player state
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub volume: f32,
    pub mode: PlaybackMode,
    pub muted: bool,
    pub favorites: BTreeSet<TrackId>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: 1.0,
            mode: PlaybackMode::Sequential,
            muted: false,
            favorites: BTreeSet::new(),
        }
    }
}

impl Preferences {
    /// Restore preferences, taking each missing field from `defaults`
    pub fn load<P: PreferenceStore + ?Sized>(store: &P, defaults: Preferences) -> Self {
        let volume = read_field::<f32, _>(store, VOLUME_KEY)
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(defaults.volume);

        Self {
            volume,
            mode: read_field(store, MODE_KEY).unwrap_or(defaults.mode),
            muted: read_field(store, MUTE_KEY).unwrap_or(defaults.muted),
            favorites: read_field(store, FAVORITES_KEY).unwrap_or(defaults.favorites),
        }
    }

    /// Write all four keys
    pub fn save<P: PreferenceStore + ?Sized>(&self, store: &mut P) -> Result<()> {
        store.set(VOLUME_KEY, serde_json::to_value(self.volume)?)?;
        store.set(MODE_KEY, serde_json::to_value(self.mode)?)?;
        store.set(MUTE_KEY, Value::Bool(self.muted))?;
        store.set(FAVORITES_KEY, serde_json::to_value(&self.favorites)?)?;
        Ok(())
    }

    /// Extract the persisted fields from a state
    pub fn from_state(state: &PlayerState) -> Self {
        Self {
            volume: state.volume,
            mode: state.mode,
            muted: state.muted_by_user,
            favorites: state.favorites.clone(),
        }
    }

    /// Initial player state seeded with these preferences
    pub fn into_state(self) -> PlayerState {
        PlayerState {
            volume: self.volume,
            mode: self.mode,
            muted_by_user: self.muted,
            favorites: self.favorites,
            ..PlayerState::default()
        }
    }
}

fn read_field<T, P>(store: &P, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    P: PreferenceStore + ?Sized,
{
    match store.get(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(key, error = %e, "Ignoring malformed preference");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read preference");
            None
        }
    }
}
