//! `@mention` autocomplete.
//!
//! The suggestion list is derived from the compose text alone: whatever
//! follows the last `@` is the query. The list opens when that query is
//! non-empty and matches at least one name, and closes on anything else.

use crate::names::{NameIndex, INLINE_SUGGESTION_LIMIT};

/// The query after the last `@` in `text`, or `None` if there is no `@`.
///
/// The query may be empty (`"hi @"`).
pub fn mention_query(text: &str) -> Option<&str> {
    text.rfind('@').map(|at| &text[at + 1..])
}

/// Replace the text from the last `@` onwards with `@<name> `.
///
/// Text without an `@` is returned unchanged.
pub fn apply_mention(text: &str, name: &str) -> String {
    match text.rfind('@') {
        Some(at) => format!("{}@{} ", &text[..at], name),
        None => text.to_string(),
    }
}

/// Autocomplete list state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MentionState {
    #[default]
    Closed,
    Open {
        suggestions: Vec<String>,
        selected: usize,
    },
}

/// Suggestion list driven by compose-text changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionAutocomplete {
    state: MentionState,
    limit: usize,
}

impl Default for MentionAutocomplete {
    fn default() -> Self {
        Self::new()
    }
}

impl MentionAutocomplete {
    pub fn new() -> Self {
        Self::with_limit(INLINE_SUGGESTION_LIMIT)
    }

    /// Show at most `limit` suggestions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            state: MentionState::Closed,
            limit,
        }
    }

    pub fn state(&self) -> &MentionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MentionState::Open { .. })
    }

    /// Current suggestions; empty while closed.
    pub fn suggestions(&self) -> &[String] {
        match &self.state {
            MentionState::Open { suggestions, .. } => suggestions,
            MentionState::Closed => &[],
        }
    }

    /// Index of the highlighted suggestion.
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            MentionState::Open { selected, .. } => Some(selected),
            MentionState::Closed => None,
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        match &self.state {
            MentionState::Open {
                suggestions,
                selected,
            } => suggestions.get(*selected).map(String::as_str),
            MentionState::Closed => None,
        }
    }

    /// Recompute the list for new compose text.
    pub fn update(&mut self, text: &str, names: &NameIndex) {
        let query = match mention_query(text) {
            Some(q) if !q.is_empty() => q,
            _ => {
                self.state = MentionState::Closed;
                return;
            }
        };

        let suggestions = names.query_owned(query, self.limit);
        self.state = if suggestions.is_empty() {
            MentionState::Closed
        } else {
            MentionState::Open {
                suggestions,
                selected: 0,
            }
        };
    }

    /// Highlight the next suggestion, wrapping to the first.
    pub fn move_down(&mut self) {
        if let MentionState::Open {
            suggestions,
            selected,
        } = &mut self.state
        {
            *selected = (*selected + 1) % suggestions.len();
        }
    }

    /// Highlight the previous suggestion, wrapping to the last.
    pub fn move_up(&mut self) {
        if let MentionState::Open {
            suggestions,
            selected,
        } = &mut self.state
        {
            let n = suggestions.len();
            *selected = (*selected + n - 1) % n;
        }
    }

    /// Confirm the highlighted suggestion. Returns the rewritten text and
    /// closes the list, or `None` if the list was closed.
    pub fn accept(&mut self, text: &str) -> Option<String> {
        let index = self.selected()?;
        self.select(index, text)
    }

    /// Confirm suggestion `index` (a pointer selection).
    pub fn select(&mut self, index: usize, text: &str) -> Option<String> {
        let name = self.suggestions().get(index)?.clone();
        self.state = MentionState::Closed;
        Some(apply_mention(text, &name))
    }

    /// Close the list, leaving the text alone.
    pub fn dismiss(&mut self) {
        self.state = MentionState::Closed;
    }
}
