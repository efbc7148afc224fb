//! Line-oriented terminal driver.
//!
//! Reads stdin a line at a time into the compose box and prints streamed
//! replies as they arrive. One task owns the [`ChatSession`]; it selects
//! between the next input line and the next session event, so typing never
//! blocks streaming and vice versa.

mod actions;
mod view;

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::input::ComposeBox;
use crate::session::{ChatSession, SessionEvent};

/// Whether the driver should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The terminal driver.
pub struct App<W: Write> {
    session: ChatSession,
    compose: ComposeBox,
    out: W,
    /// Emit ANSI styling (bold match highlights)
    styled: bool,
}

impl<W: Write> App<W> {
    pub fn new(session: ChatSession, compose: ComposeBox, out: W) -> Self {
        Self {
            session,
            compose,
            out,
            styled: false,
        }
    }

    /// Enable ANSI styling, typically when stdout is a terminal.
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn compose(&self) -> &ComposeBox {
        &self.compose
    }

    /// Consume the driver, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `/quit` or end of input.
    ///
    /// At end of input, replies still streaming are allowed to finish so
    /// piped scripts see complete answers.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.print_welcome()?;

        loop {
            tokio::select! {
                // Input first: a /cancel typed during a reply must not queue
                // behind that reply's fragments
                biased;
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if self.handle_line(&line)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Some(event) = self.session.next_event() => {
                    self.on_event(event)?;
                }
            }
        }

        while self.session.has_turns_in_flight() {
            let Some(event) = self.session.next_event().await else {
                break;
            };
            self.on_event(event)?;
        }
        self.out.flush()
    }

    /// Apply a session event and echo it if it belongs to the visible chat.
    pub fn on_event(&mut self, event: SessionEvent) -> io::Result<()> {
        let visible = event.turn().chat_id == self.session.active_id();
        let message_id = event.turn().message_id.clone();
        let shown = event.clone();

        if !self.session.handle_event(event) || !visible {
            return Ok(());
        }

        match shown {
            SessionEvent::Fragment { text, .. } => {
                write!(self.out, "{}", text)?;
                self.out.flush()
            }
            SessionEvent::Artifact { .. } => Ok(()),
            SessionEvent::Completed { .. } => {
                writeln!(self.out)?;
                let artifact = self
                    .session
                    .active_message(&message_id)
                    .and_then(|m| m.artifact.clone());
                if let Some(artifact) = artifact {
                    view::print_artifact(&mut self.out, &artifact)?;
                }
                self.out.flush()
            }
            SessionEvent::Failed { error, .. } => {
                writeln!(self.out)?;
                writeln!(self.out, "[reply failed: {}] /regen to retry", error)?;
                self.out.flush()
            }
        }
    }

    fn print_welcome(&mut self) -> io::Result<()> {
        let chat = self.session.active_chat();
        writeln!(
            self.out,
            "chatloom: {} chat(s). Type a message, @ to mention, /help for commands.",
            self.session.chats().len()
        )?;
        if !chat.is_empty() {
            view::print_transcript(&mut self.out, chat)?;
        }
        self.out.flush()
    }
}
