//! Command definitions for keyboard input handling.
//!
//! Keys are translated to a [`Command`] by the keybinding table, then applied
//! to the palette, the compose box or the session, in that order.

/// Everything a key press can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Global
    /// Quit the application (Ctrl+C)
    Quit,
    /// Open the command palette (Ctrl+K, Cmd+K)
    OpenPalette,
    /// Start a new chat (Ctrl+N)
    NewChat,
    /// Regenerate the last reply (Ctrl+R)
    Regenerate,
    /// Stop the reply streaming into the active chat
    CancelStream,

    // Editing
    InsertChar(char),
    /// Shift+Enter, Alt+Enter
    InsertNewline,
    Backspace,
    /// Send the compose text (Enter with no list open)
    Submit,

    // Lists (mention suggestions, palette)
    MoveUp,
    MoveDown,
    /// Confirm the highlighted entry (Enter, Tab)
    Confirm,
    /// Close the list (Esc)
    Dismiss,

    /// Key with no effect
    Noop,
}

impl Command {
    /// Whether this command edits the compose text.
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            Command::InsertChar(_) | Command::InsertNewline | Command::Backspace
        )
    }

    /// Whether this command applies to the session rather than the input.
    pub fn is_session_command(&self) -> bool {
        matches!(
            self,
            Command::NewChat | Command::Regenerate | Command::CancelStream
        )
    }
}
