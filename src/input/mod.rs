//! Input handling: keys, compose text, mention suggestions and the palette.
//!
//! ```text
//! KeyEvent -> KeybindingConfig::resolve() -> Command -> palette / compose box / session
//! ```
//!
//! [`InputRouter`] is the entry point for a key-driven front end that reads raw
//! `crossterm` key events. The line-based `chatloom` binary skips it and feeds
//! the [`ComposeBox`] and [`SlashCommand`]s directly; both paths share the
//! compose box and the palette actions.
//!
//! # Modules
//!
//! - [`command`] - The [`Command`] enum with all user actions
//! - [`keybindings`] - Default key binding tables per [`InputMode`]
//! - [`mention`] - `@mention` autocomplete state machine
//! - [`compose`] - The compose box that owns the autocomplete
//! - [`palette`] - The Ctrl/Cmd+K command palette
//! - [`slash_command`] - `/name` commands for the line driver

pub mod command;
pub mod compose;
pub mod keybindings;
pub mod mention;
pub mod palette;
pub mod slash_command;

pub use command::Command;
pub use compose::{ComposeAction, ComposeBox};
pub use keybindings::{InputMode, KeyCombo, KeybindingConfig};
pub use mention::{apply_mention, mention_query, MentionAutocomplete, MentionState};
pub use palette::{CommandPalette, PaletteAction, PaletteOutcome};
pub use slash_command::SlashCommand;

use crossterm::event::KeyEvent;

/// Where a key press ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing to do outside the input layer
    None,
    /// Send this text to the session
    Submit(String),
    /// A palette entry was chosen
    Palette(PaletteAction),
    /// A global command for the session (new chat, regenerate, cancel, quit)
    Session(Command),
}

/// Keyboard surface: routes keys to the palette, then the compose box, then
/// the session.
#[derive(Debug, Clone)]
pub struct InputRouter {
    pub keybindings: KeybindingConfig,
    pub palette: CommandPalette,
    pub compose: ComposeBox,
}

impl InputRouter {
    pub fn new(compose: ComposeBox) -> Self {
        Self {
            keybindings: KeybindingConfig::new(),
            palette: CommandPalette::new(),
            compose,
        }
    }

    pub fn mode(&self) -> InputMode {
        if self.palette.is_visible() {
            InputMode::Palette
        } else {
            self.compose.mode()
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let Some(cmd) = self.keybindings.resolve(KeyCombo::from(key), self.mode()) else {
            return KeyOutcome::None;
        };
        self.handle_command(cmd)
    }

    pub fn handle_command(&mut self, cmd: Command) -> KeyOutcome {
        if cmd == Command::Quit {
            return KeyOutcome::Session(cmd);
        }
        match self.palette.apply(&cmd) {
            PaletteOutcome::Chosen(action) => return KeyOutcome::Palette(action),
            PaletteOutcome::Handled => return KeyOutcome::None,
            PaletteOutcome::Ignored => {}
        }
        match self.compose.apply(&cmd) {
            ComposeAction::Submit(text) => KeyOutcome::Submit(text),
            ComposeAction::Handled => KeyOutcome::None,
            ComposeAction::Unhandled if cmd.is_session_command() => KeyOutcome::Session(cmd),
            ComposeAction::Unhandled => KeyOutcome::None,
        }
    }
}
