//! Saved-level library and the remote save boundary
//!
//! Features:
//! - Versioned JSON envelope in LocalStorage
//! - Local upsert/delete, authoritative for gameplay
//! - Fallible remote store; failures never roll back local state

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::{Level, sample_levels};
use crate::platform::storage;

/// Envelope format version
pub const LIBRARY_VERSION: u32 = 1;

/// Why a remote save failed
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to serialize level: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remote persistence for levels
///
/// One-shot, fallible. Last write wins at the store; the caller keeps its
/// local copy whatever happens here.
pub trait LevelStore {
    fn save_level(&mut self, level: &Level) -> Result<(), SaveError>;
}

/// In-process store, used natively and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Serialized levels in write order
    pub saved: Vec<String>,
    /// Fail the next save with this error, once
    fail_next: Option<SaveError>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&mut self, error: SaveError) {
        self.fail_next = Some(error);
    }

    /// Parse the most recent write back into a level
    pub fn last_saved(&self) -> Option<Level> {
        serde_json::from_str(self.saved.last()?).ok()
    }
}

impl LevelStore for MemoryStore {
    fn save_level(&mut self, level: &Level) -> Result<(), SaveError> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        self.saved.push(serde_json::to_string(level)?);
        Ok(())
    }
}

/// Locally saved levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLibrary {
    pub current: Level,
    saved: Vec<Level>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    library: LevelLibrary,
}

impl Default for LevelLibrary {
    fn default() -> Self {
        let first = sample_levels().remove(0);
        Self {
            current: first.clone(),
            saved: vec![first],
        }
    }
}

impl LevelLibrary {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "creative_blocks_levels";

    pub fn saved(&self) -> &[Level] {
        &self.saved
    }

    pub fn get(&self, id: &str) -> Option<&Level> {
        self.saved.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replace the level with the same id, or append it
    /// Returns true if the level was new to the library
    pub fn upsert(&mut self, level: Level) -> bool {
        match self.saved.iter_mut().find(|l| l.id == level.id) {
            Some(existing) => {
                *existing = level;
                false
            }
            None => {
                self.saved.push(level);
                true
            }
        }
    }

    /// Remove a saved level; returns true if it existed
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.saved.len();
        self.saved.retain(|l| l.id != id);
        let removed = self.saved.len() != before;
        if removed {
            log::info!("Deleted level: {}", id);
        }
        removed
    }

    /// Encode as a versioned envelope
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Envelope {
            version: LIBRARY_VERSION,
            library: self.clone(),
        })
    }

    /// Decode a versioned envelope; None for unreadable or unknown versions
    pub fn from_json(json: &str) -> Option<Self> {
        let envelope: Envelope = serde_json::from_str(json).ok()?;
        if envelope.version != LIBRARY_VERSION {
            log::warn!(
                "Ignoring level library with version {} (expected {})",
                envelope.version,
                LIBRARY_VERSION
            );
            return None;
        }
        Some(envelope.library)
    }

    /// Load the library from storage
    pub fn load() -> Self {
        if let Some(library) = storage::get_item(Self::STORAGE_KEY).and_then(|json| Self::from_json(&json)) {
            log::info!("Loaded {} saved levels", library.saved.len());
            return library;
        }

        log::info!("No saved levels found, starting with the tutorial");
        Self::default()
    }

    /// Save the library to storage
    pub fn save(&self) {
        match self.to_json() {
            Ok(json) => {
                if storage::set_item(Self::STORAGE_KEY, &json) {
                    log::info!("Level library saved ({} levels)", self.saved.len());
                }
            }
            Err(e) => log::warn!("Failed to encode level library: {}", e),
        }
    }
}
