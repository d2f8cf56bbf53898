//! Creative Blocks entry point
//!
//! Handles platform-specific initialization. On the web the page drives a
//! `WebSession` through exported bindings; natively a small terminal session
//! reads commands from stdin.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use creative_blocks::level::issue_messages;
    use creative_blocks::platform;
    use creative_blocks::session::{GameEvent, GameMode, InputHandler, Session};
    use creative_blocks::settings::Settings;

    /// Session handle owned by the page's JS
    #[wasm_bindgen]
    pub struct WebSession {
        session: Session,
        input: InputHandler,
    }

    #[wasm_bindgen]
    impl WebSession {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebSession {
            let now = platform::now_ms();
            let session = Session::restore(now as u64, now);
            let input = InputHandler::for_session(&session);
            log::info!("Session restored on level: {}", session.level().name);
            WebSession { session, input }
        }

        /// Feed a `KeyboardEvent.code`; returns true if the board changed
        pub fn handle_key(&mut self, code: &str) -> bool {
            let events = self.input.handle_key(&mut self.session, code, platform::now_ms());
            let completed = events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelCompleted { .. }));
            if completed {
                self.session.achievements.save();
            }
            !events.is_empty()
        }

        pub fn play(&mut self) {
            self.session.set_mode(GameMode::Playing, platform::now_ms());
        }

        pub fn edit(&mut self) {
            self.session.set_mode(GameMode::Editor, platform::now_ms());
        }

        /// Current level as shareable text (empty on failure)
        pub fn export_level(&self) -> String {
            self.session.export_current().unwrap_or_default()
        }

        /// Load shared text; false if the format is invalid
        pub fn import_level(&mut self, text: &str) -> bool {
            self.session.import_text(text, platform::now_ms()).is_ok()
        }

        /// Current level as JSON for the renderer
        pub fn level_json(&self) -> String {
            serde_json::to_string(self.session.level()).unwrap_or_default()
        }

        pub fn hint(&self) -> Option<String> {
            self.session.hint()
        }

        /// Design issues, one per line
        pub fn issues(&self) -> String {
            issue_messages(&self.session.issues()).join("\n")
        }

        pub fn total_score(&self) -> u32 {
            self.session.achievements.total_score
        }

        pub fn completion_percentage(&self) -> f32 {
            self.session.achievements.completion_percentage()
        }

        /// Call once the page has shown the unlock toasts
        pub fn acknowledge_unlocks(&mut self) {
            self.session.acknowledge_unlocks();
        }

        /// True only the first time, while the tutorial is enabled
        pub fn show_tutorial(&mut self) -> bool {
            self.session.take_tutorial_prompt()
        }

        /// Gain for sound effects (0 when muted)
        pub fn sfx_volume(&self) -> f32 {
            self.session.settings.effective_sfx_volume()
        }

        pub fn reduced_motion(&self) -> bool {
            self.session.settings.reduced_motion
        }

        pub fn set_show_hints(&mut self, show: bool) {
            let settings = Settings {
                show_hints: show,
                ..self.session.settings.clone()
            };
            self.session.set_settings(settings);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }
        log::info!("Creative Blocks starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Creative Blocks (native) starting...");

    if let Err(e) = native::run() {
        log::error!("Terminal session failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{self, BufRead, Write};

    use creative_blocks::consts::BOARD_SIZE;
    use creative_blocks::level::{Cell, Difficulty, issue_messages, level_stats};
    use creative_blocks::persistence::MemoryStore;
    use creative_blocks::platform;
    use creative_blocks::session::{GameEvent, GameMode, InputAction, InputHandler, Session, ShareError};
    use creative_blocks::settings::Settings;

    const TUTORIAL: &str = "Move every block onto a target ('.'). Walk the cursor with w/a/s/d, \
                            press return on a block to pick it up and again on a free cell to drop it.";

    /// Text rendering of the board; `@` cursor, `#` fixed, `o` movable, `.` target
    fn render(session: &Session) -> String {
        let level = session.level();
        let targets = level.goal.target_positions();
        let mut out = format!("{} [{}]\n", level.name, level.difficulty.as_str());
        for z in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let cell = Cell::new(x, z);
                let glyph = match level.top_block_at(cell) {
                    _ if cell == session.cursor => '@',
                    Some(b) if Some(b.id.as_str()) == session.selected_id() => '*',
                    Some(b) if b.is_movable() => 'o',
                    Some(_) => '#',
                    None if targets.contains(&cell) => '.',
                    None => '-',
                };
                out.push(glyph);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    fn describe(event: &GameEvent) -> Option<String> {
        match event {
            GameEvent::LevelCompleted { elapsed_secs, .. } => {
                Some(format!("Level complete in {:.1}s!", elapsed_secs))
            }
            GameEvent::AchievementUnlocked(unlock) => {
                Some(format!("Achievement unlocked: {} (+{})", unlock.name, unlock.points))
            }
            GameEvent::MoveRejected { x, z, .. } => Some(format!("Can't move there ({}, {})", x, z)),
            _ => None,
        }
    }

    pub fn run() -> io::Result<()> {
        let now = platform::now_ms();
        let mut session = Session::new(now as u64, Settings::load());
        // Terminal input is line-buffered already
        let mut input = InputHandler::new(0.0);
        let mut store = MemoryStore::new();
        session.set_mode(GameMode::Playing, now);

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        if session.take_tutorial_prompt() {
            writeln!(stdout, "{}", TUTORIAL)?;
        }
        writeln!(stdout, "{}", render(&session))?;
        write!(stdout, "> ")?;
        stdout.flush()?;

        for line in stdin.lock().lines() {
            let line = line?;
            let now = platform::now_ms();
            let mut words = line.split_whitespace();
            let command = words.next().unwrap_or("");

            let action = match command {
                "w" => Some(InputAction::Up),
                "s" => Some(InputAction::Down),
                "a" => Some(InputAction::Left),
                "d" => Some(InputAction::Right),
                "" | "select" => Some(InputAction::Select),
                "enter" => Some(InputAction::Confirm),
                "esc" => Some(InputAction::Cancel),
                _ => None,
            };

            let events = if let Some(action) = action {
                input.handle(&mut session, action, now)
            } else {
                match command {
                    "quit" | "q" => break,
                    "play" => session.set_mode(GameMode::Playing, now),
                    "edit" => session.set_mode(GameMode::Editor, now),
                    "goal" => session.add_goal_position(),
                    "reset" => session.reset_level(now),
                    "new" => session.new_level(now),
                    "random" => {
                        let difficulty = words
                            .next()
                            .and_then(Difficulty::from_str)
                            .unwrap_or(session.settings.default_random_difficulty);
                        session.generate_random(difficulty, now)
                    }
                    "hint" => {
                        writeln!(stdout, "{}", session.hint().unwrap_or_default())?;
                        Vec::new()
                    }
                    "check" => {
                        let issues = issue_messages(&session.issues());
                        if issues.is_empty() {
                            writeln!(stdout, "Level looks good")?;
                        }
                        for issue in issues {
                            writeln!(stdout, "- {}", issue)?;
                        }
                        Vec::new()
                    }
                    "stats" => {
                        let stats = level_stats(session.level());
                        writeln!(
                            stdout,
                            "{} movable, {} fixed, {} goals, {}",
                            stats.movable_blocks, stats.fixed_blocks, stats.goal_areas, stats.estimated_time
                        )?;
                        Vec::new()
                    }
                    "save" => {
                        let outcome = session.save_current(&mut store, now);
                        if let Err(e) = outcome.remote {
                            writeln!(stdout, "Saved locally, remote save failed: {}", e)?;
                        }
                        outcome.events
                    }
                    "share" => match session.share_current(&mut store, now) {
                        Ok(events) => events,
                        Err(ShareError::Invalid(issues)) => {
                            for issue in issue_messages(&issues) {
                                writeln!(stdout, "- {}", issue)?;
                            }
                            Vec::new()
                        }
                        Err(ShareError::Save { source, events }) => {
                            writeln!(stdout, "Saved locally, sharing failed: {}", source)?;
                            events
                        }
                    },
                    "levels" => {
                        for level in session.library.saved() {
                            writeln!(stdout, "{}  {}", level.id, level.name)?;
                        }
                        Vec::new()
                    }
                    "delete" => {
                        let id = words.next().unwrap_or("");
                        if !session.delete_saved(id) {
                            writeln!(stdout, "No saved level '{}'", id)?;
                        }
                        Vec::new()
                    }
                    "hints" => {
                        let settings = Settings {
                            show_hints: words.next() != Some("off"),
                            ..session.settings.clone()
                        };
                        session.set_settings(settings);
                        Vec::new()
                    }
                    "score" => {
                        let achievements = &session.achievements;
                        writeln!(
                            stdout,
                            "{} points, {:.0}% of achievements",
                            achievements.total_score,
                            achievements.completion_percentage()
                        )?;
                        Vec::new()
                    }
                    "export" => {
                        match session.export_current() {
                            Ok(text) => writeln!(stdout, "{}", text)?,
                            Err(e) => writeln!(stdout, "Export failed: {}", e)?,
                        }
                        Vec::new()
                    }
                    _ => {
                        writeln!(
                            stdout,
                            "Commands: w a s d, select, enter, esc, play, edit, goal, reset, new, \
                             random <easy|medium|hard>, hint, check, stats, save, share, levels, delete <id>, \
                             hints <on|off>, score, export, quit"
                        )?;
                        Vec::new()
                    }
                }
            };

            for message in events.iter().filter_map(describe) {
                writeln!(stdout, "{}", message)?;
            }
            if events.iter().any(|e| matches!(e, GameEvent::AchievementUnlocked(_))) {
                session.acknowledge_unlocks();
            }
            writeln!(stdout, "{}", render(&session))?;
            write!(stdout, "> ")?;
            stdout.flush()?;
        }

        log::info!("Final score: {}", session.achievements.total_score);
        Ok(())
    }
}
