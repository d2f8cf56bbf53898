//! Session state
//!
//! Everything the play and editor surfaces hold between input events. The
//! current level is only ever swapped as a whole value, so a reader between
//! events sees either the old level or the new one, never a mix.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::achievements::{Achievements, Unlock, ids};
use crate::consts::{CURSOR_START, DEFAULT_BLOCK_COLOR, SPEED_RUN_SECS};
use crate::fresh_id;
use crate::level::{
    Block, BlockKind, Cell, CodecError, Difficulty, Level, LevelGoal, LevelIssue, clone_level, empty_level,
    estimate_difficulty, export_level, generate_hint, import_level, is_goal_satisfied, is_valid_move,
    random_level, validate_level,
};
use crate::persistence::{LevelLibrary, LevelStore, SaveError};
use crate::settings::Settings;

/// Maximum number of replaced levels kept for "back"
pub const HISTORY_LIMIT: usize = 20;

/// Which surface is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Menu,
    Playing,
    Editor,
}

/// Something the UI, audio or HUD may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ModeChanged(GameMode),
    CursorMoved(Cell),
    BlockSelected { block_id: String },
    SelectionCleared,
    BlockMoved { block_id: String, x: i32, y: i32, z: i32 },
    MoveRejected { block_id: String, x: i32, z: i32 },
    BlockPlaced { block_id: String, x: i32, y: i32, z: i32 },
    BlockRemoved { block_id: String },
    GoalChanged,
    LevelLoaded { level_id: String },
    LevelCompleted { level_id: String, elapsed_secs: f64 },
    LevelSaved { level_id: String },
    AchievementUnlocked(Unlock),
}

/// Result of a save: local effects always apply, the remote part may fail
#[derive(Debug)]
pub struct SaveOutcome {
    pub events: Vec<GameEvent>,
    pub remote: Result<(), SaveError>,
}

/// Why a level could not be shared
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("level has {} design issue(s)", .0.len())]
    Invalid(Vec<LevelIssue>),
    /// Saved locally, but the remote save failed
    #[error("remote save failed: {source}")]
    Save {
        source: SaveError,
        /// Events from the local save, still to be reported
        events: Vec<GameEvent>,
    },
}

/// Complete application state threaded through the input handler and UI
#[derive(Debug, Clone)]
pub struct Session {
    pub mode: GameMode,
    /// Current level (replace via `replace_level` / `load_level` only)
    level: Level,
    /// Level as it was when loaded; `reset_level` returns here
    initial_level: Level,
    /// Previously loaded levels, newest last
    history: Vec<Level>,
    pub cursor: Cell,
    /// Selected block, by id, in the current level
    selected: Option<String>,
    pub achievements: Achievements,
    pub library: LevelLibrary,
    pub settings: Settings,
    rng: Pcg32,
    /// When the current level was loaded (ms)
    loaded_at_ms: f64,
    /// Completion already reported for this load
    completed: bool,
}

impl Session {
    /// Create a session with fresh achievements and the default library
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self::with_state(seed, settings, Achievements::new(), LevelLibrary::default(), 0.0)
    }

    /// Restore settings, achievements and saved levels from storage
    pub fn restore(seed: u64, now_ms: f64) -> Self {
        Self::with_state(
            seed,
            Settings::load(),
            Achievements::load(),
            LevelLibrary::load(),
            now_ms,
        )
    }

    fn with_state(
        seed: u64,
        settings: Settings,
        achievements: Achievements,
        library: LevelLibrary,
        now_ms: f64,
    ) -> Self {
        let level = library.current.clone();
        Self {
            mode: GameMode::Menu,
            initial_level: level.clone(),
            level,
            history: Vec::new(),
            cursor: Cell::new(CURSOR_START.0, CURSOR_START.1),
            selected: None,
            achievements,
            library,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            loaded_at_ms: now_ms,
            completed: false,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn history(&self) -> &[Level] {
        &self.history
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected block, resolved against the current level
    pub fn selected_block(&self) -> Option<&Block> {
        self.level.block(self.selected.as_deref()?)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    // === Level replacement ===

    /// Swap in an edited version of the current level
    ///
    /// An edit defines a new layout: `reset_level` returns here and the
    /// level can be completed again. The selection survives only if its
    /// block still exists.
    pub fn replace_level(&mut self, next: Level) {
        self.initial_level = next.clone();
        self.completed = false;
        self.swap_level(next);
    }

    /// Swap the current level without moving the reset baseline
    fn swap_level(&mut self, next: Level) {
        if let Some(id) = &self.selected {
            if next.block(id).is_none() {
                self.selected = None;
            }
        }
        self.library.current = next.clone();
        self.level = next;
    }

    /// Load a different level, remembering the current one
    pub fn load_level(&mut self, level: Level, now_ms: f64) -> Vec<GameEvent> {
        self.history.push(self.level.clone());
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.enter_level(level, now_ms)
    }

    /// Return to the previously loaded level
    pub fn back(&mut self, now_ms: f64) -> Vec<GameEvent> {
        match self.history.pop() {
            Some(level) => self.enter_level(level, now_ms),
            None => Vec::new(),
        }
    }

    /// Put every block back where it was when the level was loaded
    pub fn reset_level(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let initial = self.initial_level.clone();
        self.enter_level(initial, now_ms)
    }

    fn enter_level(&mut self, level: Level, now_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.selected.take().is_some() {
            events.push(GameEvent::SelectionCleared);
        }
        log::info!("Loaded level: {}", level.name);

        self.initial_level = level.clone();
        self.library.current = level.clone();
        self.level = level;
        self.loaded_at_ms = now_ms;
        self.completed = false;

        events.push(GameEvent::LevelLoaded {
            level_id: self.level.id.clone(),
        });
        events
    }

    // === Mode and cursor ===

    /// Switch surfaces
    ///
    /// Going from the editor to play starts a fresh test run of the edited
    /// level: reset returns to it, the clock restarts and completion re-arms.
    pub fn set_mode(&mut self, mode: GameMode, now_ms: f64) -> Vec<GameEvent> {
        if mode == self.mode {
            return Vec::new();
        }
        log::info!("Game mode changed to: {:?}", mode);
        if self.mode == GameMode::Editor && mode == GameMode::Playing {
            self.initial_level = self.level.clone();
            self.loaded_at_ms = now_ms;
            self.completed = false;
        }
        self.mode = mode;

        let mut events = vec![GameEvent::ModeChanged(mode)];
        if mode != GameMode::Playing && self.selected.take().is_some() {
            events.push(GameEvent::SelectionCleared);
        }
        events
    }

    /// Move the cursor by (dx, dz), clamped to the board
    pub fn move_cursor(&mut self, dx: i32, dz: i32) -> Option<GameEvent> {
        let max = crate::consts::BOARD_SIZE - 1;
        let next = Cell::new((self.cursor.x + dx).clamp(0, max), (self.cursor.z + dz).clamp(0, max));
        if next == self.cursor {
            return None;
        }
        self.cursor = next;
        Some(GameEvent::CursorMoved(next))
    }

    pub fn clear_selection(&mut self) -> Option<GameEvent> {
        self.selected.take().map(|_| GameEvent::SelectionCleared)
    }

    // === Play mode ===

    /// Select the movable block under the cursor, or move the selected block there
    pub fn select_at_cursor(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let Some(selected) = self.selected_block().cloned() else {
            return match self.level.top_block_at(self.cursor) {
                Some(block) if block.is_movable() => {
                    log::debug!("Block selected: {}", block.id);
                    self.selected = Some(block.id.clone());
                    vec![GameEvent::BlockSelected {
                        block_id: block.id.clone(),
                    }]
                }
                _ => Vec::new(),
            };
        };

        if selected.cell() == self.cursor {
            return self.clear_selection().into_iter().collect();
        }

        let (x, y, z) = (self.cursor.x, selected.y, self.cursor.z);
        if !is_valid_move(&self.level.blocks, &selected.id, x, z, y) {
            return vec![GameEvent::MoveRejected {
                block_id: selected.id,
                x,
                z,
            }];
        }

        let blocks = self
            .level
            .blocks
            .iter()
            .map(|b| if b.id == selected.id { b.moved_to(x, y, z) } else { b.clone() })
            .collect();
        let next = self.level.with_blocks(blocks);
        self.swap_level(next);
        self.selected = None;

        let mut events = vec![
            GameEvent::BlockMoved {
                block_id: selected.id,
                x,
                y,
                z,
            },
            GameEvent::SelectionCleared,
        ];
        self.count(&mut events, ids::BLOCKS_MOVED);
        self.check_completion(now_ms, &mut events);
        events
    }

    fn check_completion(&mut self, now_ms: f64, events: &mut Vec<GameEvent>) {
        if self.completed || !is_goal_satisfied(&self.level.blocks, &self.level.goal) {
            return;
        }
        self.completed = true;

        let elapsed_secs = ((now_ms - self.loaded_at_ms) / 1000.0).max(0.0);
        log::info!("Level completed: {} in {:.1}s", self.level.name, elapsed_secs);
        events.push(GameEvent::LevelCompleted {
            level_id: self.level.id.clone(),
            elapsed_secs,
        });

        self.unlock(events, ids::LEVEL_COMPLETE);
        self.count(events, ids::LEVEL_MASTER);
        if elapsed_secs < SPEED_RUN_SECS {
            self.unlock(events, ids::SPEED_RUN);
        }
    }

    fn unlock(&mut self, events: &mut Vec<GameEvent>, id: &str) {
        if let Some(unlock) = self.achievements.unlock(id) {
            events.push(GameEvent::AchievementUnlocked(unlock));
        }
    }

    fn count(&mut self, events: &mut Vec<GameEvent>, id: &str) {
        if let Some(unlock) = self.achievements.increment(id) {
            events.push(GameEvent::AchievementUnlocked(unlock));
        }
    }

    /// Advisory hint for the current level, if hints are enabled
    pub fn hint(&self) -> Option<String> {
        self.settings
            .show_hints
            .then(|| generate_hint(&self.level.blocks, &self.level.goal))
    }

    // === Editor ===

    /// Remove the top block under the cursor, or place a movable block there
    pub fn toggle_block_at_cursor(&mut self) -> Vec<GameEvent> {
        if let Some(existing) = self.level.top_block_at(self.cursor) {
            let block_id = existing.id.clone();
            let blocks = self.level.blocks.iter().filter(|b| b.id != block_id).cloned().collect();
            let next = self.level.with_blocks(blocks);
            self.replace_level(next);
            return vec![GameEvent::BlockRemoved { block_id }];
        }
        self.place_block(BlockKind::Movable, DEFAULT_BLOCK_COLOR)
    }

    /// Stack a new block on top of the cursor column
    pub fn place_block(&mut self, kind: BlockKind, color: &str) -> Vec<GameEvent> {
        let y = self.level.top_block_at(self.cursor).map_or(0, |b| b.y + 1);
        let block = Block::new(
            fresh_id("block", &mut self.rng),
            self.cursor.x,
            y,
            self.cursor.z,
            color,
            kind,
        );
        let event = GameEvent::BlockPlaced {
            block_id: block.id.clone(),
            x: block.x,
            y: block.y,
            z: block.z,
        };

        let mut blocks = self.level.blocks.clone();
        blocks.push(block);
        let next = self.level.with_blocks(blocks);
        self.replace_level(next);
        vec![event]
    }

    /// Add the cursor cell as a target
    ///
    /// A non-`move_blocks` goal is replaced by a `move_blocks` goal.
    pub fn add_goal_position(&mut self) -> Vec<GameEvent> {
        let mut targets = self.level.goal.target_positions().to_vec();
        if targets.contains(&self.cursor) {
            return Vec::new();
        }
        targets.push(self.cursor);
        self.set_goal(LevelGoal::MoveBlocks {
            target_positions: targets,
        })
    }

    /// Drop the cursor cell from the targets
    pub fn remove_goal_position(&mut self) -> Vec<GameEvent> {
        let targets = self.level.goal.target_positions();
        if !targets.contains(&self.cursor) {
            return Vec::new();
        }
        let target_positions = targets.iter().copied().filter(|c| *c != self.cursor).collect();
        self.set_goal(LevelGoal::MoveBlocks { target_positions })
    }

    pub fn set_goal(&mut self, goal: LevelGoal) -> Vec<GameEvent> {
        let next = self.level.with_goal(goal);
        self.replace_level(next);
        vec![GameEvent::GoalChanged]
    }

    /// Update the author-supplied details
    pub fn set_details(&mut self, name: &str, description: &str, difficulty: Difficulty) {
        let next = Level {
            name: name.to_string(),
            description: description.to_string(),
            difficulty,
            ..self.level.clone()
        };
        self.replace_level(next);
    }

    /// Difficulty the heuristic would give the current level
    pub fn suggest_difficulty(&self) -> Difficulty {
        estimate_difficulty(&self.level)
    }

    /// Design issues in the current level
    pub fn issues(&self) -> Vec<LevelIssue> {
        validate_level(&self.level.blocks, &self.level.goal)
    }

    /// Start a blank level
    pub fn new_level(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let level = empty_level(&mut self.rng);
        self.load_level(level, now_ms)
    }

    /// Load a freshly generated random level
    pub fn generate_random(&mut self, difficulty: Difficulty, now_ms: f64) -> Vec<GameEvent> {
        let level = random_level(difficulty, &mut self.rng);
        self.load_level(level, now_ms)
    }

    /// Load a copy of the current level under a fresh identity
    pub fn clone_current(&mut self, name: Option<&str>, now_ms: f64) -> Vec<GameEvent> {
        let level = clone_level(&self.level, name, &mut self.rng);
        self.load_level(level, now_ms)
    }

    // === Saving and sharing ===

    /// Save the current level locally, then remotely
    ///
    /// Local state is authoritative and is kept even if the remote save fails.
    pub fn save_current(&mut self, store: &mut impl LevelStore, now_ms: f64) -> SaveOutcome {
        let level = Level {
            created_at: Some(now_ms),
            ..self.level.clone()
        };
        // Saving mid-play must not move the reset baseline
        self.initial_level.created_at = level.created_at;
        self.swap_level(level.clone());

        let mut events = vec![GameEvent::LevelSaved {
            level_id: level.id.clone(),
        }];
        if self.library.upsert(level.clone()) {
            self.unlock(&mut events, ids::FIRST_CREATION);
            self.count(&mut events, ids::CREATIVE_GENIUS);
        }
        self.library.save();
        self.achievements.save();
        log::info!("Saved level: {}", level.name);

        let remote = store.save_level(&level);
        if let Err(e) = &remote {
            log::warn!("Failed to save level to server: {}", e);
        }

        SaveOutcome { events, remote }
    }

    /// Publish the current level; refuses levels with design issues
    pub fn share_current(&mut self, store: &mut impl LevelStore, now_ms: f64) -> Result<Vec<GameEvent>, ShareError> {
        let issues = self.issues();
        if !issues.is_empty() {
            return Err(ShareError::Invalid(issues));
        }

        let SaveOutcome { mut events, remote } = self.save_current(store, now_ms);
        if let Err(source) = remote {
            return Err(ShareError::Save { source, events });
        }

        log::info!("Shared level: {}", self.level.name);
        self.unlock(&mut events, ids::LEVEL_SHARED);
        self.achievements.save();
        Ok(events)
    }

    /// Load a level from the shared catalog under a fresh identity
    pub fn download_level(&mut self, level: Level, now_ms: f64) -> Vec<GameEvent> {
        let level = Level {
            id: fresh_id("downloaded", &mut self.rng),
            ..level
        };
        self.load_level(level, now_ms)
    }

    /// Remove a level from the local library
    pub fn delete_saved(&mut self, level_id: &str) -> bool {
        let removed = self.library.delete(level_id);
        if removed {
            self.library.save();
        }
        removed
    }

    /// Rate a community level (1 - 5 stars)
    pub fn rate_level(&mut self, level_id: &str, stars: u8) -> Vec<GameEvent> {
        let stars = stars.clamp(1, 5);
        log::info!("Rating level {} with {} stars", level_id, stars);

        let mut events = Vec::new();
        self.count(&mut events, ids::HELPFUL_RATING);
        self.achievements.save();
        events
    }

    // === Preferences ===

    /// Replace and persist the player's settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings.save();
    }

    /// True the first time it's asked while the tutorial is enabled
    pub fn take_tutorial_prompt(&mut self) -> bool {
        if !self.settings.show_tutorial_on_start {
            return false;
        }
        let settings = Settings {
            show_tutorial_on_start: false,
            ..self.settings.clone()
        };
        self.set_settings(settings);
        true
    }

    /// Mark fresh unlocks as shown
    pub fn acknowledge_unlocks(&mut self) {
        self.achievements.clear_just_unlocked();
        self.achievements.save();
    }

    // === Import/export ===

    /// Import shared text and load it
    pub fn import_text(&mut self, text: &str, now_ms: f64) -> Result<Vec<GameEvent>, CodecError> {
        let level = import_level(text, &mut self.rng)?;
        Ok(self.load_level(level, now_ms))
    }

    pub fn export_current(&self) -> Result<String, CodecError> {
        export_level(&self.level)
    }
}
