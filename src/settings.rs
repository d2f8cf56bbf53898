//! Player settings and preferences
//!
//! Persisted separately from levels and achievements in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DEBOUNCE_MS;
use crate::level::Difficulty;
use crate::platform::storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Show hint text in play mode
    pub show_hints: bool,
    /// Difficulty used by the "random level" button
    pub default_random_difficulty: Difficulty,
    /// Show the tutorial the first time the game opens
    pub show_tutorial_on_start: bool,

    // === Input ===
    /// Minimum gap between accepted key actions (ms)
    pub input_debounce_ms: f64,

    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no camera sway or celebration effects)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hints: true,
            default_random_difficulty: Difficulty::Easy,
            show_tutorial_on_start: true,

            input_debounce_ms: DEFAULT_DEBOUNCE_MS,

            sound_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "creative_blocks_settings";

    /// Effective sound-effect gain (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if !self.sound_enabled {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Debounce interval with negative values treated as zero
    pub fn debounce_ms(&self) -> f64 {
        self.input_debounce_ms.max(0.0)
    }

    /// Load settings from storage, falling back to defaults
    pub fn load() -> Self {
        match storage::get_item(Self::STORAGE_KEY).map(|json| serde_json::from_str(&json)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from storage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Stored settings unreadable ({}), using defaults", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            if storage::set_item(Self::STORAGE_KEY, &json) {
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.debounce_ms(), 150.0);
        assert!(settings.show_hints);
    }

    #[test]
    fn test_muted_sfx_volume() {
        let settings = Settings {
            sound_enabled: false,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"show_hints":false}"#).unwrap();
        assert!(!settings.show_hints);
        assert_eq!(settings.input_debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_load_on_native_is_default() {
        assert_eq!(Settings::load(), Settings::default());
    }
}
