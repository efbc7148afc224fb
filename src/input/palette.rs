//! Command palette opened with Ctrl/Cmd+K.

use super::command::Command;

/// Entries offered by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteAction {
    NewChat,
    ClearHistory,
    /// Placeholder; there is nothing to configure yet
    Settings,
}

impl PaletteAction {
    pub const ALL: [PaletteAction; 3] = [
        PaletteAction::NewChat,
        PaletteAction::ClearHistory,
        PaletteAction::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaletteAction::NewChat => "New Chat",
            PaletteAction::ClearHistory => "Clear History",
            PaletteAction::Settings => "Settings",
        }
    }
}

/// Result of feeding a command to the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// The palette is closed and did not look at the command
    Ignored,
    /// The palette consumed the command
    Handled,
    /// An entry was chosen; the palette has closed
    Chosen(PaletteAction),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPalette {
    visible: bool,
    selected: usize,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> PaletteAction {
        PaletteAction::ALL[self.selected]
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.selected = 0;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Apply a command while the palette is showing.
    ///
    /// Every command is consumed while visible so keys never leak into the
    /// compose box behind it.
    pub fn apply(&mut self, cmd: &Command) -> PaletteOutcome {
        if !self.visible {
            if *cmd == Command::OpenPalette {
                self.open();
                return PaletteOutcome::Handled;
            }
            return PaletteOutcome::Ignored;
        }

        let n = PaletteAction::ALL.len();
        match cmd {
            Command::MoveDown => self.selected = (self.selected + 1) % n,
            Command::MoveUp => self.selected = (self.selected + n - 1) % n,
            Command::Confirm => {
                self.close();
                return PaletteOutcome::Chosen(self.selected());
            }
            Command::Dismiss | Command::OpenPalette => self.close(),
            _ => {}
        }
        PaletteOutcome::Handled
    }
}
