//! Slash command definitions and parsing.
//!
//! The line-oriented driver has no key chords, so palette entries and session
//! operations are reached by typing `/name` on a line of its own.

/// Represents all available slash commands.
///
/// Each command has a primary name and may have aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// Start a new chat
    /// Primary: /new
    New,

    /// Delete every chat
    /// Primary: /clear
    Clear,

    /// Regenerate the last reply
    /// Primary: /regen
    /// Aliases: /retry
    Regen,

    /// Copy the last reply to the clipboard
    /// Primary: /copy
    Copy,

    /// List chats
    /// Primary: /chats
    /// Aliases: /history
    Chats,

    /// Switch to chat number `n` as listed by /chats (1-based)
    /// Primary: /open
    Open(usize),

    /// Stop the streaming reply
    /// Primary: /cancel
    /// Aliases: /stop
    Cancel,

    /// Open settings (placeholder)
    /// Primary: /settings
    Settings,

    /// Show help
    /// Primary: /help
    Help,

    /// Exit
    /// Primary: /quit
    /// Aliases: /exit
    Quit,
}

impl SlashCommand {
    /// Commands shown by /help, in order.
    pub fn all() -> Vec<Self> {
        vec![
            SlashCommand::New,
            SlashCommand::Clear,
            SlashCommand::Regen,
            SlashCommand::Copy,
            SlashCommand::Chats,
            SlashCommand::Open(1),
            SlashCommand::Cancel,
            SlashCommand::Settings,
            SlashCommand::Help,
            SlashCommand::Quit,
        ]
    }

    /// Parse a slash command line.
    ///
    /// Returns `None` for lines that do not start with `/`, unknown names,
    /// and `/open` without a positive number.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatloom::input::SlashCommand;
    ///
    /// assert_eq!(SlashCommand::parse("/new"), Some(SlashCommand::New));
    /// assert_eq!(SlashCommand::parse("/open 2"), Some(SlashCommand::Open(2)));
    /// assert_eq!(SlashCommand::parse("/STOP"), Some(SlashCommand::Cancel));
    /// assert_eq!(SlashCommand::parse("hello"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.trim().strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_lowercase();
        let arg = parts.next();

        match name.as_str() {
            "new" => Some(SlashCommand::New),
            "clear" => Some(SlashCommand::Clear),
            "regen" | "retry" => Some(SlashCommand::Regen),
            "copy" => Some(SlashCommand::Copy),
            "chats" | "history" => Some(SlashCommand::Chats),
            "open" => arg
                .and_then(|a| a.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .map(SlashCommand::Open),
            "cancel" | "stop" => Some(SlashCommand::Cancel),
            "settings" => Some(SlashCommand::Settings),
            "help" => Some(SlashCommand::Help),
            "quit" | "exit" => Some(SlashCommand::Quit),
            _ => None,
        }
    }

    /// Usage string, with the leading `/`.
    pub fn name(&self) -> &'static str {
        match self {
            SlashCommand::New => "/new",
            SlashCommand::Clear => "/clear",
            SlashCommand::Regen => "/regen",
            SlashCommand::Copy => "/copy",
            SlashCommand::Chats => "/chats",
            SlashCommand::Open(_) => "/open <n>",
            SlashCommand::Cancel => "/cancel",
            SlashCommand::Settings => "/settings",
            SlashCommand::Help => "/help",
            SlashCommand::Quit => "/quit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SlashCommand::New => "Start a new chat",
            SlashCommand::Clear => "Delete all chats",
            SlashCommand::Regen => "Regenerate the last reply",
            SlashCommand::Copy => "Copy the last reply",
            SlashCommand::Chats => "List chats",
            SlashCommand::Open(_) => "Switch to a chat from /chats",
            SlashCommand::Cancel => "Stop the streaming reply",
            SlashCommand::Settings => "Open settings",
            SlashCommand::Help => "Show this help",
            SlashCommand::Quit => "Exit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!(SlashCommand::parse("/new"), Some(SlashCommand::New));
        assert_eq!(SlashCommand::parse("/clear"), Some(SlashCommand::Clear));
        assert_eq!(SlashCommand::parse("/retry"), Some(SlashCommand::Regen));
        assert_eq!(SlashCommand::parse("/history"), Some(SlashCommand::Chats));
        assert_eq!(SlashCommand::parse("/exit"), Some(SlashCommand::Quit));
        assert_eq!(SlashCommand::parse("  /copy  "), Some(SlashCommand::Copy));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(SlashCommand::parse("/REGEN"), Some(SlashCommand::Regen));
        assert_eq!(SlashCommand::parse("/Cancel"), Some(SlashCommand::Cancel));
    }

    #[test]
    fn test_parse_open() {
        assert_eq!(SlashCommand::parse("/open 3"), Some(SlashCommand::Open(3)));
        assert_eq!(SlashCommand::parse("/open"), None);
        assert_eq!(SlashCommand::parse("/open 0"), None);
        assert_eq!(SlashCommand::parse("/open x"), None);
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(SlashCommand::parse("new"), None);
        assert_eq!(SlashCommand::parse("/unknown"), None);
        assert_eq!(SlashCommand::parse("/"), None);
        assert_eq!(SlashCommand::parse(""), None);
    }

    #[test]
    fn test_all_have_descriptions() {
        for cmd in SlashCommand::all() {
            assert!(cmd.name().starts_with('/'));
            assert!(!cmd.description().is_empty());
        }
    }
}
