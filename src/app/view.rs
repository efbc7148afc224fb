//! Plain-text rendering for the terminal driver.

use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::input::{mention_query, ComposeBox, SlashCommand};
use crate::models::{Artifact, Chat, MessageRole, MessageStatus};
use crate::names::match_range;

/// Numbered suggestion list, highlighted entry marked with `>`.
pub(super) fn print_suggestions<W: Write>(
    out: &mut W,
    compose: &ComposeBox,
    styled: bool,
) -> io::Result<()> {
    let mention = compose.mention();
    let query = mention_query(compose.text()).unwrap_or_default();
    let selected = mention.selected();

    for (i, name) in mention.suggestions().iter().enumerate() {
        let marker = if selected == Some(i) { '>' } else { ' ' };
        writeln!(out, "{} {}. {}", marker, i + 1, highlight(name, query, styled))?;
    }
    writeln!(out, "(number to pick, empty line for the highlighted one)")
}

/// `name` with the matched part in bold when `styled`.
pub(super) fn highlight(name: &str, query: &str, styled: bool) -> String {
    match match_range(name, query) {
        Some(range) if styled => format!(
            "{}{}{}",
            &name[..range.start],
            (&name[range.clone()]).bold(),
            &name[range.end..]
        ),
        _ => name.to_string(),
    }
}

pub(super) fn print_artifact<W: Write>(out: &mut W, artifact: &Artifact) -> io::Result<()> {
    writeln!(out, "--- {} ---", artifact.kind)?;
    writeln!(out, "{}", artifact.code)?;
    writeln!(out, "---")
}

pub(super) fn print_transcript<W: Write>(out: &mut W, chat: &Chat) -> io::Result<()> {
    writeln!(out, "== {} ==", chat.title)?;
    for message in &chat.messages {
        let who = match message.role {
            MessageRole::User => "you",
            MessageRole::Assistant => "assistant",
        };
        let suffix = match &message.status {
            MessageStatus::Complete => String::new(),
            MessageStatus::Streaming => " [streaming]".to_string(),
            MessageStatus::Aborted => " [stopped]".to_string(),
            MessageStatus::Failed { error } => format!(" [failed: {}]", error),
        };
        writeln!(out, "{}> {}{}", who, message.content.trim_end(), suffix)?;
        if let Some(artifact) = &message.artifact {
            print_artifact(out, artifact)?;
        }
    }
    Ok(())
}

pub(super) fn print_chat_list<W: Write>(out: &mut W, chats: &[Chat], active_id: &str) -> io::Result<()> {
    for (i, chat) in chats.iter().enumerate() {
        let marker = if chat.id == active_id { '*' } else { ' ' };
        writeln!(
            out,
            "{} {}. {} ({} messages)",
            marker,
            i + 1,
            chat.title,
            chat.messages.len()
        )?;
    }
    Ok(())
}

pub(super) fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    for cmd in SlashCommand::all() {
        writeln!(out, "  {:<12} {}", cmd.name(), cmd.description())?;
    }
    Ok(())
}
