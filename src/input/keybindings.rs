//! Default keybindings.
//!
//! Maps key combinations to [`Command`]s. Lookup checks the table for the
//! current [`InputMode`] first, then the global table, then falls back to
//! inserting printable characters.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use super::command::Command;

/// Represents a key combination (key code + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Creates a key combo with no modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub const fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    pub const fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    /// Creates a key combo with Super (Cmd on macOS) modifier.
    pub const fn super_key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SUPER)
    }
}

impl From<KeyEvent> for KeyCombo {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers)
    }
}

/// Which surface currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// Plain typing in the compose box
    Compose,
    /// Mention suggestions are showing
    Mentions,
    /// The command palette is open
    Palette,
}

/// Keybinding configuration.
#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    /// Always active unless a mode table overrides the key
    pub global: HashMap<KeyCombo, Command>,
    pub modes: HashMap<InputMode, HashMap<KeyCombo, Command>>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingConfig {
    /// Creates a new keybinding configuration with default bindings.
    pub fn new() -> Self {
        let mut config = Self {
            global: HashMap::new(),
            modes: HashMap::new(),
        };
        config.setup_global_bindings();
        config.setup_compose_bindings();
        config.setup_list_bindings(InputMode::Mentions);
        config.setup_list_bindings(InputMode::Palette);
        config
    }

    fn setup_global_bindings(&mut self) {
        self.global
            .insert(KeyCombo::ctrl(KeyCode::Char('c')), Command::Quit);

        // Palette: Ctrl+K everywhere, Cmd+K where the terminal reports Super
        self.global
            .insert(KeyCombo::ctrl(KeyCode::Char('k')), Command::OpenPalette);
        self.global
            .insert(KeyCombo::super_key(KeyCode::Char('k')), Command::OpenPalette);

        self.global
            .insert(KeyCombo::ctrl(KeyCode::Char('n')), Command::NewChat);
        self.global
            .insert(KeyCombo::ctrl(KeyCode::Char('r')), Command::Regenerate);
    }

    fn setup_compose_bindings(&mut self) {
        let mut compose = HashMap::new();
        compose.insert(KeyCombo::plain(KeyCode::Enter), Command::Submit);
        compose.insert(KeyCombo::shift(KeyCode::Enter), Command::InsertNewline);
        compose.insert(KeyCombo::alt(KeyCode::Enter), Command::InsertNewline);
        compose.insert(KeyCombo::plain(KeyCode::Backspace), Command::Backspace);
        compose.insert(KeyCombo::plain(KeyCode::Esc), Command::CancelStream);
        self.modes.insert(InputMode::Compose, compose);
    }

    fn setup_list_bindings(&mut self, mode: InputMode) {
        let mut list = HashMap::new();
        list.insert(KeyCombo::plain(KeyCode::Up), Command::MoveUp);
        list.insert(KeyCombo::plain(KeyCode::Down), Command::MoveDown);
        list.insert(KeyCombo::plain(KeyCode::Enter), Command::Confirm);
        list.insert(KeyCombo::plain(KeyCode::Esc), Command::Dismiss);
        if mode == InputMode::Mentions {
            // Typing keeps refining the query
            list.insert(KeyCombo::plain(KeyCode::Tab), Command::Confirm);
            list.insert(KeyCombo::plain(KeyCode::Backspace), Command::Backspace);
        }
        self.modes.insert(mode, list);
    }

    /// Resolve a key to a command in `mode`.
    pub fn resolve(&self, combo: KeyCombo, mode: InputMode) -> Option<Command> {
        if let Some(cmd) = self.modes.get(&mode).and_then(|m| m.get(&combo)) {
            return Some(cmd.clone());
        }
        if let Some(cmd) = self.global.get(&combo) {
            return Some(cmd.clone());
        }

        match combo.code {
            KeyCode::Char(c)
                if mode != InputMode::Palette
                    && (combo.modifiers == KeyModifiers::NONE
                        || combo.modifiers == KeyModifiers::SHIFT) =>
            {
                Some(Command::InsertChar(c))
            }
            _ => None,
        }
    }
}
