//! Input line handling: compose text, mention picks and slash commands.

use std::io::{self, Write};

use super::{view, App, Flow};
use crate::input::{Command, ComposeAction, PaletteAction, SlashCommand};
use crate::models::MessageRole;
use crate::session::{IgnoreReason, SendOutcome};

impl<W: Write> App<W> {
    /// Handle one line of input.
    ///
    /// While suggestions are showing, an empty line confirms the highlighted
    /// one and a number picks by position. Otherwise the line is appended to
    /// the compose text; if that opens suggestions they are shown, else the
    /// text is sent. Slash commands are only recognised on an empty draft.
    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let line = line.trim_end_matches(['\r', '\n']);

        if self.compose.mention().is_open() {
            if line.is_empty() {
                self.compose.apply(&Command::Confirm);
                return self.show_draft();
            }
            if let Ok(pick) = line.trim().parse::<usize>() {
                if pick >= 1 && self.compose.select_suggestion(pick - 1) {
                    return self.show_draft();
                }
            }
        }

        if self.compose.text().is_empty() && line.trim_start().starts_with('/') {
            return match SlashCommand::parse(line) {
                Some(cmd) => self.run_slash(cmd),
                None => {
                    writeln!(self.out, "Unknown command: {} (try /help)", line.trim())?;
                    Ok(Flow::Continue)
                }
            };
        }

        let text = format!("{}{}", self.compose.text(), line);
        self.compose.set_text(text);

        if self.compose.mention().is_open() {
            view::print_suggestions(&mut self.out, &self.compose, self.styled)?;
            return Ok(Flow::Continue);
        }

        match self.compose.apply(&Command::Submit) {
            ComposeAction::Submit(text) => self.send(text)?,
            // Whitespace only
            _ => self.compose.clear(),
        }
        Ok(Flow::Continue)
    }

    fn show_draft(&mut self) -> io::Result<Flow> {
        writeln!(
            self.out,
            "draft: {}  (continue typing, or an empty line to send)",
            self.compose.text()
        )?;
        Ok(Flow::Continue)
    }

    fn send(&mut self, text: String) -> io::Result<()> {
        let outcome = self.session.begin_send(&text);
        if outcome == SendOutcome::Ignored(IgnoreReason::InFlight) {
            // Keep the draft so it can be sent once the reply finishes
            self.compose.set_text(text);
            writeln!(self.out, "({})", IgnoreReason::InFlight)?;
            return self.show_draft().map(|_| ());
        }
        self.report(outcome)
    }

    fn report(&mut self, outcome: SendOutcome) -> io::Result<()> {
        match outcome {
            SendOutcome::Started(_) => write!(self.out, "assistant> ")?,
            SendOutcome::Ignored(reason) => writeln!(self.out, "({})", reason)?,
        }
        self.out.flush()
    }

    fn run_slash(&mut self, cmd: SlashCommand) -> io::Result<Flow> {
        match cmd {
            SlashCommand::New => self.run_palette(PaletteAction::NewChat)?,
            SlashCommand::Clear => self.run_palette(PaletteAction::ClearHistory)?,
            SlashCommand::Settings => self.run_palette(PaletteAction::Settings)?,
            SlashCommand::Regen => {
                let outcome = self.session.begin_regenerate();
                self.report(outcome)?;
            }
            SlashCommand::Copy => self.copy_last_reply()?,
            SlashCommand::Chats => {
                view::print_chat_list(&mut self.out, self.session.chats(), self.session.active_id())?;
            }
            SlashCommand::Open(n) => {
                let Some(id) = self.session.chats().get(n - 1).map(|c| c.id.clone()) else {
                    writeln!(self.out, "No chat {} (see /chats)", n)?;
                    return Ok(Flow::Continue);
                };
                self.session.select_chat(&id);
                view::print_transcript(&mut self.out, self.session.active_chat())?;
                if let Some(question) = self.session.sticky_question() {
                    writeln!(self.out, "last question: {}", question)?;
                }
            }
            SlashCommand::Cancel => {
                let chat_id = self.session.active_id().to_string();
                if self.session.cancel(&chat_id) {
                    writeln!(self.out)?;
                    writeln!(self.out, "(stopped)")?;
                } else {
                    writeln!(self.out, "(nothing streaming)")?;
                }
            }
            SlashCommand::Help => view::print_help(&mut self.out)?,
            SlashCommand::Quit => return Ok(Flow::Quit),
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    /// Carry out a palette entry.
    pub fn run_palette(&mut self, action: PaletteAction) -> io::Result<()> {
        match action {
            PaletteAction::NewChat => {
                self.session.new_chat();
                self.compose.clear();
                writeln!(self.out, "Started a new chat.")
            }
            PaletteAction::ClearHistory => {
                self.session.clear_history();
                self.compose.clear();
                writeln!(self.out, "History cleared.")
            }
            PaletteAction::Settings => writeln!(self.out, "Settings are not available yet."),
        }
    }

    fn copy_last_reply(&mut self) -> io::Result<()> {
        let reply = self
            .session
            .active_chat()
            .messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant && !m.content.is_empty())
            .map(|m| m.content.clone());

        let Some(reply) = reply else {
            return writeln!(self.out, "(nothing to copy)");
        };
        match self.session.copy(&reply) {
            Ok(()) => writeln!(self.out, "Copied {} characters.", reply.chars().count()),
            Err(e) => writeln!(self.out, "Copy failed: {}", e),
        }
    }
}
