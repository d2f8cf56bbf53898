//! Creative Blocks - A block-moving puzzle game on an 8x8 board
//!
//! Core modules:
//! - `level`: Pure level core (data model, goal evaluation, generation, validation, codec)
//! - `session`: Application state and the discrete-event input handler
//! - `achievements`: Achievement unlocks and score bookkeeping
//! - `persistence`: Saved-level library and the remote save boundary
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Player preferences

pub mod achievements;
pub mod level;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;

pub use achievements::Achievements;
pub use level::{Block, BlockKind, Cell, Difficulty, Level, LevelGoal};
pub use session::{GameEvent, GameMode, Session};
pub use settings::Settings;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Board is `BOARD_SIZE` x `BOARD_SIZE` cells on the (x, z) plane
    pub const BOARD_SIZE: i32 = 8;

    /// Colors cycled by the random level generator
    pub const BLOCK_PALETTE: [&str; 5] = ["#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6"];
    /// Color of blocks placed in the editor
    pub const DEFAULT_BLOCK_COLOR: &str = "#3B82F6";
    /// Color of fixed obstacles in the sample levels
    pub const OBSTACLE_COLOR: &str = "#6B7280";

    /// Cursor starts in the middle of the board
    pub const CURSOR_START: (i32, i32) = (3, 3);

    /// Minimum gap between accepted input actions
    pub const DEFAULT_DEBOUNCE_MS: f64 = 150.0;

    /// Solving a level within this many seconds of loading it earns `speed_run`
    pub const SPEED_RUN_SECS: f64 = 30.0;
}

/// True if (x, z) lies on the board
#[inline]
pub fn in_bounds(x: i32, z: i32) -> bool {
    (0..consts::BOARD_SIZE).contains(&x) && (0..consts::BOARD_SIZE).contains(&z)
}

/// Generate a fresh identifier of the form `{prefix}-{16 hex digits}`
pub fn fresh_id(prefix: &str, rng: &mut impl Rng) -> String {
    format!("{}-{:016x}", prefix, rng.random::<u64>())
}
