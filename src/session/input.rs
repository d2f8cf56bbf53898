//! Discrete input handling
//!
//! Key presses arrive as events, pass an explicit debounce, and are applied to
//! the session strictly in arrival order.

use super::state::{GameEvent, GameMode, Session};

/// A player action on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Up,
    Down,
    Left,
    Right,
    /// Select/place (Space)
    Select,
    /// Confirm (Enter)
    Confirm,
    /// Cancel/menu (Escape)
    Cancel,
}

impl InputAction {
    /// Map a DOM `KeyboardEvent.code` to an action
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(InputAction::Up),
            "ArrowDown" | "KeyS" => Some(InputAction::Down),
            "ArrowLeft" | "KeyA" => Some(InputAction::Left),
            "ArrowRight" | "KeyD" => Some(InputAction::Right),
            "Space" => Some(InputAction::Select),
            "Enter" => Some(InputAction::Confirm),
            "Escape" => Some(InputAction::Cancel),
            _ => None,
        }
    }

    /// Cursor delta (dx, dz) for movement actions
    pub fn direction(&self) -> Option<(i32, i32)> {
        match self {
            InputAction::Up => Some((0, -1)),
            InputAction::Down => Some((0, 1)),
            InputAction::Left => Some((-1, 0)),
            InputAction::Right => Some((1, 0)),
            _ => None,
        }
    }
}

/// Drops actions that arrive too soon after the last accepted one
///
/// `Cancel` always goes through and doesn't restart the interval.
#[derive(Debug, Clone)]
pub struct Debouncer {
    pub interval_ms: f64,
    last_accepted_ms: Option<f64>,
}

impl Debouncer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_accepted_ms: None,
        }
    }

    pub fn accept(&mut self, action: InputAction, now_ms: f64) -> bool {
        if action == InputAction::Cancel {
            return true;
        }
        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }
}

/// Applies debounced input actions to a session
#[derive(Debug, Clone)]
pub struct InputHandler {
    pub debouncer: Debouncer,
}

impl InputHandler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            debouncer: Debouncer::new(interval_ms),
        }
    }

    /// Handler using the session's configured debounce interval
    pub fn for_session(session: &Session) -> Self {
        Self::new(session.settings.debounce_ms())
    }

    /// Handle one action; returns what changed (empty if debounced or a no-op)
    pub fn handle(&mut self, session: &mut Session, action: InputAction, now_ms: f64) -> Vec<GameEvent> {
        if !self.debouncer.accept(action, now_ms) {
            return Vec::new();
        }
        apply_action(session, action, now_ms)
    }

    /// Handle a raw key code; unmapped keys are ignored
    pub fn handle_key(&mut self, session: &mut Session, code: &str, now_ms: f64) -> Vec<GameEvent> {
        match InputAction::from_key_code(code) {
            Some(action) => self.handle(session, action, now_ms),
            None => Vec::new(),
        }
    }
}

/// Apply an action without debouncing
pub fn apply_action(session: &mut Session, action: InputAction, now_ms: f64) -> Vec<GameEvent> {
    if let Some((dx, dz)) = action.direction() {
        return session.move_cursor(dx, dz).into_iter().collect();
    }

    match (action, session.mode) {
        (InputAction::Select, GameMode::Playing) => session.select_at_cursor(now_ms),
        (InputAction::Select, GameMode::Editor) => session.toggle_block_at_cursor(),
        (InputAction::Confirm, GameMode::Menu | GameMode::Editor) => session.set_mode(GameMode::Playing, now_ms),
        (InputAction::Cancel, _) => match session.clear_selection() {
            Some(event) => vec![event],
            None => session.set_mode(GameMode::Menu, now_ms),
        },
        _ => Vec::new(),
    }
}
