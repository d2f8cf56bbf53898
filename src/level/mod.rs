//! Level core
//!
//! The rules of the puzzle. This module must stay pure and stateless:
//! - No I/O, no clocks, no global state
//! - Randomness only from the caller's RNG
//! - Callers replace whole `Level` values rather than patching them in place

pub mod codec;
pub mod generator;
pub mod goal;
pub mod model;
pub mod validator;

pub use codec::{CodecError, export_level, import_level};
pub use generator::{
    LevelStats, clone_level, empty_level, estimate_difficulty, level_stats, random_level, sample_levels,
};
pub use goal::{generate_hint, is_goal_satisfied, is_valid_move, max_stack_height, pattern_string};
pub use model::{Block, BlockKind, Cell, Difficulty, Level, LevelGoal};
pub use validator::{LevelIssue, issue_messages, validate_level};
