//! Achievement system
//!
//! Persisted to LocalStorage. Unlocks add points to a running total score.

use serde::{Deserialize, Serialize};

use crate::platform::{self, storage};

/// A single achievement and the player's progress toward it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points: u32,
    pub unlocked: bool,
    /// Unix timestamp (ms) when unlocked
    #[serde(default)]
    pub unlocked_at: Option<f64>,
    /// Set on unlock until the HUD acknowledges it
    #[serde(default)]
    pub just_unlocked: bool,
    #[serde(default)]
    pub progress: u32,
    /// Counter achievements unlock when `progress` reaches this
    #[serde(default)]
    pub target: Option<u32>,
}

impl Achievement {
    fn new(id: &str, name: &str, description: &str, points: u32, target: Option<u32>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            points,
            unlocked: false,
            unlocked_at: None,
            just_unlocked: false,
            progress: 0,
            target,
        }
    }
}

/// Emitted the first time an achievement unlocks
#[derive(Debug, Clone, PartialEq)]
pub struct Unlock {
    pub id: String,
    pub name: String,
    pub points: u32,
}

/// Well-known achievement ids
pub mod ids {
    pub const LEVEL_COMPLETE: &str = "level_complete";
    pub const FIRST_CREATION: &str = "first_creation";
    pub const LEVEL_SHARED: &str = "level_shared";
    pub const BLOCKS_MOVED: &str = "blocks_moved";
    pub const SPEED_RUN: &str = "speed_run";
    pub const HELPFUL_RATING: &str = "helpful_rating";
    pub const LEVEL_MASTER: &str = "level_master";
    pub const CREATIVE_GENIUS: &str = "creative_genius";
}

/// The player's achievements and total score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievements {
    pub achievements: Vec<Achievement>,
    pub total_score: u32,
}

impl Default for Achievements {
    fn default() -> Self {
        Self::new()
    }
}

impl Achievements {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "creative_blocks_achievements";

    /// Fresh catalog, nothing unlocked
    pub fn new() -> Self {
        use ids::*;
        Self {
            achievements: vec![
                Achievement::new(LEVEL_COMPLETE, "First Success!", "Complete your first level", 10, None),
                Achievement::new(FIRST_CREATION, "Creative Mind", "Create your first custom level", 15, None),
                Achievement::new(LEVEL_SHARED, "Community Builder", "Share a level with the community", 20, None),
                Achievement::new(BLOCKS_MOVED, "Block Mover", "Move 50 blocks in total", 25, Some(50)),
                Achievement::new(SPEED_RUN, "Speed Demon", "Complete a level in under 30 seconds", 30, None),
                Achievement::new(HELPFUL_RATING, "Helpful Community Member", "Rate 10 community levels", 15, Some(10)),
                Achievement::new(LEVEL_MASTER, "Level Master", "Complete 25 levels", 50, Some(25)),
                Achievement::new(CREATIVE_GENIUS, "Creative Genius", "Create 10 custom levels", 75, Some(10)),
            ],
            total_score: 0,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Unlock an achievement
    /// Returns the unlock if this call unlocked it, None if unknown or already unlocked
    pub fn unlock(&mut self, id: &str) -> Option<Unlock> {
        let achievement = self.achievements.iter_mut().find(|a| a.id == id)?;
        if achievement.unlocked {
            return None;
        }

        achievement.unlocked = true;
        achievement.unlocked_at = Some(platform::now_ms());
        achievement.just_unlocked = true;
        if let Some(target) = achievement.target {
            achievement.progress = target;
        }
        self.total_score += achievement.points;

        log::info!(
            "Achievement unlocked: {} (+{} points)",
            achievement.name,
            achievement.points
        );

        Some(Unlock {
            id: achievement.id.clone(),
            name: achievement.name.clone(),
            points: achievement.points,
        })
    }

    /// Set progress on a counter achievement (capped at its target)
    /// Unlocks it once the target is reached
    pub fn update_progress(&mut self, id: &str, progress: u32) -> Option<Unlock> {
        let achievement = self.achievements.iter_mut().find(|a| a.id == id)?;
        let target = achievement.target?;
        if achievement.unlocked {
            return None;
        }

        achievement.progress = progress.min(target);
        if progress >= target {
            self.unlock(id)
        } else {
            None
        }
    }

    /// Add one to a counter achievement
    pub fn increment(&mut self, id: &str) -> Option<Unlock> {
        let progress = self.get(id)?.progress;
        self.update_progress(id, progress + 1)
    }

    /// Acknowledge all fresh unlocks (after the HUD toast is shown)
    pub fn clear_just_unlocked(&mut self) {
        for achievement in &mut self.achievements {
            achievement.just_unlocked = false;
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Share of achievements unlocked (0 - 100)
    pub fn completion_percentage(&self) -> f32 {
        if self.achievements.is_empty() {
            return 0.0;
        }
        self.unlocked_count() as f32 / self.achievements.len() as f32 * 100.0
    }

    /// Load achievements from storage
    pub fn load() -> Self {
        if let Some(json) = storage::get_item(Self::STORAGE_KEY) {
            if let Ok(achievements) = serde_json::from_str::<Achievements>(&json) {
                log::info!("Loaded {} unlocked achievements", achievements.unlocked_count());
                return achievements;
            }
        }

        log::info!("No achievements found, starting fresh");
        Self::new()
    }

    /// Save achievements to storage
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            if storage::set_item(Self::STORAGE_KEY, &json) {
                log::info!("Achievements saved ({} points)", self.total_score);
            }
        }
    }
}
