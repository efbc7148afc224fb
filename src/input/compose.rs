//! Compose box: the text being written plus its mention suggestions.

use std::sync::Arc;

use super::command::Command;
use super::keybindings::InputMode;
use super::mention::MentionAutocomplete;
use crate::names::NameIndex;

/// Result of applying a command to the compose box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeAction {
    /// The command is not for the compose box
    Unhandled,
    Handled,
    /// Send this text; the box has been cleared
    Submit(String),
}

#[derive(Debug, Clone)]
pub struct ComposeBox {
    text: String,
    mention: MentionAutocomplete,
    names: Arc<NameIndex>,
}

impl ComposeBox {
    pub fn new(names: Arc<NameIndex>) -> Self {
        Self {
            text: String::new(),
            mention: MentionAutocomplete::new(),
            names,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mention(&self) -> &MentionAutocomplete {
        &self.mention
    }

    /// Which key table applies right now.
    pub fn mode(&self) -> InputMode {
        if self.mention.is_open() {
            InputMode::Mentions
        } else {
            InputMode::Compose
        }
    }

    /// Replace the whole text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.refresh();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.push(c);
        self.refresh();
    }

    pub fn backspace(&mut self) {
        self.text.pop();
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.mention.dismiss();
    }

    /// Confirm suggestion `index`, as a pointer click would.
    pub fn select_suggestion(&mut self, index: usize) -> bool {
        match self.mention.select(index, &self.text) {
            Some(text) => {
                self.text = text;
                true
            }
            None => false,
        }
    }

    /// Take the text for sending. Suppressed while suggestions are showing.
    pub fn submit(&mut self) -> Option<String> {
        if self.mention.is_open() || self.text.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.text);
        self.mention.dismiss();
        Some(text)
    }

    pub fn apply(&mut self, cmd: &Command) -> ComposeAction {
        match cmd {
            Command::InsertChar(c) => self.insert_char(*c),
            Command::InsertNewline => self.insert_char('\n'),
            Command::Backspace => self.backspace(),
            Command::Submit | Command::Confirm if self.mention.is_open() => {
                if let Some(text) = self.mention.accept(&self.text) {
                    self.text = text;
                }
            }
            Command::Submit => {
                return match self.submit() {
                    Some(text) => ComposeAction::Submit(text),
                    None => ComposeAction::Handled,
                };
            }
            Command::MoveDown if self.mention.is_open() => self.mention.move_down(),
            Command::MoveUp if self.mention.is_open() => self.mention.move_up(),
            Command::Dismiss if self.mention.is_open() => self.mention.dismiss(),
            _ => return ComposeAction::Unhandled,
        }
        ComposeAction::Handled
    }

    fn refresh(&mut self) {
        self.mention.update(&self.text, &self.names);
    }
}
