//! Level import/export
//!
//! Levels travel as pretty-printed JSON. Import always assigns a fresh level
//! id so a shared level can never collide with one already stored locally.

use rand::Rng;
use thiserror::Error;

use super::model::Level;
use crate::fresh_id;

/// Why a level could not be exported or imported
///
/// Every variant reads as "invalid format" to the player.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed JSON, or a required field (id, name, blocks, goal) missing
    #[error("invalid level format: {0}")]
    Json(#[from] serde_json::Error),
    /// Parsed, but a required field is empty
    #[error("invalid level format: {0}")]
    InvalidFormat(&'static str),
}

/// Serialize a level to shareable text
pub fn export_level(level: &Level) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(level)?)
}

/// Parse shared text into a level with a fresh id
pub fn import_level(text: &str, rng: &mut impl Rng) -> Result<Level, CodecError> {
    let mut level: Level = serde_json::from_str(text).map_err(|e| {
        log::warn!("Failed to import level: {}", e);
        e
    })?;

    if level.id.is_empty() {
        return Err(CodecError::InvalidFormat("missing level id"));
    }
    if level.name.is_empty() {
        return Err(CodecError::InvalidFormat("missing level name"));
    }

    let original_id = std::mem::replace(&mut level.id, fresh_id("imported", rng));
    log::debug!("Imported level {} as {}", original_id, level.id);

    Ok(level)
}
