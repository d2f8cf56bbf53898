//! Application session
//!
//! The state the play and editor surfaces share, and the input handler that
//! drives it. All game rules are delegated to the pure `level` core.

pub mod input;
pub mod state;

pub use input::{Debouncer, InputAction, InputHandler, apply_action};
pub use state::{GameEvent, GameMode, HISTORY_LIMIT, SaveOutcome, Session, ShareError};
