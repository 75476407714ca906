//! Line-oriented chat surface.
//!
//! DESIGN
//! ======
//! Each line is either a query or a `/command`. Queries go through the same
//! client state the web surfaces use, so history, notices and export behave
//! identically. In eager mode a testimony query only loads suggestions; the
//! user adjusts them and runs `/search`. In submit mode the query searches
//! straight away and `/search` re-runs it with the adjusted selection.

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use client::config::{ClientConfig, SuggestMode};
use client::net::api::SearchApi;
use client::state::bible::{BibleSearch, BibleSearchSettings};
use client::state::chat::{ChatSession, ExportError, Role};
use client::state::testimony::{InputEffect, TestimonySearch};
use client::util::debounce::Debouncer;
use tracing::debug;

use crate::CliError;
use crate::render;

pub const HELP: &str = "\
commands:
  /export [dir]        write the chat history as JSON
  /clear               forget every message
  /collapse <n>        hide or show the results of message n
  /history             print every message
  /ai on|off           use AI-suggested terms (testimony)
  /derivatives on|off  include word forms (testimony)
  /toggle <n>          tick or untick suggestion n (testimony)
  /remove <n>          drop suggestion n (testimony)
  /search              search with the current terms (testimony)
  /help                show this list
  /quit                leave";

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Query(String),
    Export(Option<PathBuf>),
    Clear,
    Collapse(usize),
    History,
    Ai(bool),
    Derivatives(bool),
    Toggle(usize),
    Remove(usize),
    Search,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line.
///
/// # Errors
///
/// Returns [`ParseError`] for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<ReplCommand, ParseError> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Ok(if line.is_empty() { ReplCommand::Empty } else { ReplCommand::Query(line.to_owned()) });
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "export" => Ok(ReplCommand::Export((!arg.is_empty()).then(|| PathBuf::from(arg)))),
        "clear" => Ok(ReplCommand::Clear),
        "collapse" => position(arg, "/collapse <n>").map(ReplCommand::Collapse),
        "history" => Ok(ReplCommand::History),
        "ai" => switch(arg, "/ai on|off").map(ReplCommand::Ai),
        "derivatives" => switch(arg, "/derivatives on|off").map(ReplCommand::Derivatives),
        "toggle" => position(arg, "/toggle <n>").map(ReplCommand::Toggle),
        "remove" => position(arg, "/remove <n>").map(ReplCommand::Remove),
        "search" => Ok(ReplCommand::Search),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(ParseError::Unknown(other.to_owned())),
    }
}

/// One-based list position.
fn position(arg: &str, usage: &'static str) -> Result<usize, ParseError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn switch(arg: &str, usage: &'static str) -> Result<bool, ParseError> {
    match arg {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(ParseError::Usage(usage)),
    }
}

// =============================================================================
// SURFACES
// =============================================================================

pub enum ChatSurface {
    Bible(BibleSearch),
    Testimony { search: TestimonySearch, debouncer: Debouncer },
}

impl ChatSurface {
    #[must_use]
    pub fn bible(settings: BibleSearchSettings) -> Self {
        let mut search = BibleSearch::new();
        search.settings = settings;
        Self::Bible(search)
    }

    #[must_use]
    pub fn testimony(config: &ClientConfig) -> Self {
        Self::Testimony {
            search: TestimonySearch::new(config.suggest_mode),
            debouncer: Debouncer::new(config.suggest_debounce),
        }
    }

    fn session(&self) -> &ChatSession {
        match self {
            Self::Bible(search) => &search.session,
            Self::Testimony { search, .. } => &search.session,
        }
    }

    fn session_mut(&mut self) -> &mut ChatSession {
        match self {
            Self::Bible(search) => &mut search.session,
            Self::Testimony { search, .. } => &mut search.session,
        }
    }
}

// =============================================================================
// LOOP
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    surface: ChatSurface,
    export_dir: PathBuf,
}

impl Repl {
    #[must_use]
    pub fn new(surface: ChatSurface, export_dir: PathBuf) -> Self {
        Self { surface, export_dir }
    }

    /// Read lines until `/quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] if reading input, writing output or serializing
    /// an export fails. Search failures are chat messages, not errors.
    pub async fn run<A, R, W>(&mut self, api: &A, mut input: R, out: &mut W) -> Result<(), CliError>
    where
        A: SearchApi + ?Sized,
        R: BufRead,
        W: Write,
    {
        let slug = self.surface.session().surface().slug();
        writeln!(out, "{slug} search chat; /help lists commands")?;
        let mut line = String::new();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let command = match parse_line(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{e}")?;
                    continue;
                }
            };
            if self.handle(api, command, out).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Apply one command and print its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] on output or export failures.
    pub async fn handle<A, W>(&mut self, api: &A, command: ReplCommand, out: &mut W) -> Result<Flow, CliError>
    where
        A: SearchApi + ?Sized,
        W: Write,
    {
        debug!(?command, "repl: command");
        let before = self.surface.session().len();
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => return Ok(Flow::Quit),
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Query(text) => self.query(api, &text, out).await?,
            ReplCommand::Export(dir) => self.export(dir, out)?,
            ReplCommand::Clear => {
                self.surface.session_mut().clear();
                writeln!(out, "history cleared")?;
            }
            ReplCommand::Collapse(n) => self.collapse(n, out)?,
            ReplCommand::History => {
                let lines = render::history_lines(self.surface.session());
                if lines.is_empty() {
                    writeln!(out, "no messages yet")?;
                }
                for line in lines {
                    writeln!(out, "{line}")?;
                }
            }
            ReplCommand::Ai(_)
            | ReplCommand::Derivatives(_)
            | ReplCommand::Toggle(_)
            | ReplCommand::Remove(_)
            | ReplCommand::Search => self.testimony_command(api, command, out).await?,
        }
        self.print_new_messages(before, out)?;
        if let Some(notice) = self.surface.session().notice() {
            writeln!(out, "! {notice}")?;
            self.surface.session_mut().dismiss_notice();
        }
        Ok(Flow::Continue)
    }

    async fn query<A, W>(&mut self, api: &A, text: &str, out: &mut W) -> Result<(), CliError>
    where
        A: SearchApi + ?Sized,
        W: Write,
    {
        match &mut self.surface {
            ChatSurface::Bible(search) => search.submit(api, text).await,
            ChatSurface::Testimony { search, debouncer } => {
                let effect = search.set_input(text);
                match search.mode() {
                    SuggestMode::Eager => {
                        if effect == InputEffect::ScheduleSuggest {
                            let ticket = debouncer.schedule();
                            search.refresh_when_settled(api, debouncer, ticket).await;
                        }
                        print_suggestions(search, out)?;
                        writeln!(out, "/search to run, /toggle <n> or /remove <n> to adjust")?;
                    }
                    SuggestMode::OnSubmit => {
                        search.submit(api).await;
                        if !search.suggestions().is_empty() {
                            print_suggestions(search, out)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn testimony_command<A, W>(&mut self, api: &A, command: ReplCommand, out: &mut W) -> Result<(), CliError>
    where
        A: SearchApi + ?Sized,
        W: Write,
    {
        let ChatSurface::Testimony { search, .. } = &mut self.surface else {
            writeln!(out, "only available in testimony chat")?;
            return Ok(());
        };
        match command {
            ReplCommand::Ai(enabled) => {
                search.set_ai_enabled(enabled);
                print_suggestions(search, out)?;
            }
            ReplCommand::Derivatives(include) => {
                search.set_include_derivatives(include);
                print_suggestions(search, out)?;
            }
            ReplCommand::Toggle(n) => {
                let Some(term) = suggestion_at(search, n) else {
                    writeln!(out, "no suggestion {n}")?;
                    return Ok(());
                };
                if !search.ai_enabled() {
                    writeln!(out, "AI suggestions are off (/ai on)")?;
                    return Ok(());
                }
                search.toggle_suggestion(&term);
                print_suggestions(search, out)?;
            }
            ReplCommand::Remove(n) => {
                let Some(term) = suggestion_at(search, n) else {
                    writeln!(out, "no suggestion {n}")?;
                    return Ok(());
                };
                search.remove_suggestion(&term);
                print_suggestions(search, out)?;
            }
            ReplCommand::Search => {
                if let Some(terms) = search.begin_search() {
                    let outcome = api.search_testimonies(&terms).await;
                    search.finish_search(outcome);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn export<W: Write>(&mut self, dir: Option<PathBuf>, out: &mut W) -> Result<(), CliError> {
        let dir = dir.unwrap_or_else(|| self.export_dir.clone());
        match self.surface.session_mut().export_history() {
            Ok(export) => {
                let path = export.write_to(&dir)?;
                writeln!(out, "exported to {}", path.display())?;
                Ok(())
            }
            // The session has already set a notice.
            Err(ExportError::EmptyHistory) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn collapse<W: Write>(&mut self, n: usize, out: &mut W) -> Result<(), CliError> {
        let index = n.saturating_sub(1);
        let Some(id) = self.surface.session().messages().get(index).map(|m| m.id.clone()) else {
            writeln!(out, "no message {n}")?;
            return Ok(());
        };
        self.surface.session_mut().toggle_collapse(&id);
        let session = self.surface.session();
        let message = &session.messages()[index];
        writeln!(out, "{}", render::message_heading(index, message))?;
        for line in render::message_details(session.surface(), message) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// Print assistant turns added since `before`, plus the terms line of
    /// any testimony user turn.
    fn print_new_messages<W: Write>(&self, before: usize, out: &mut W) -> Result<(), CliError> {
        let session = self.surface.session();
        for (index, message) in session.messages().iter().enumerate().skip(before) {
            if message.role == Role::Assistant {
                writeln!(out, "{}", render::message_heading(index, message))?;
            }
            for line in render::message_details(session.surface(), message) {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }
}

fn suggestion_at(search: &TestimonySearch, n: usize) -> Option<String> {
    search.suggestions().get(n.checked_sub(1)?).map(|s| s.term.clone())
}

fn print_suggestions<W: Write>(search: &TestimonySearch, out: &mut W) -> Result<(), CliError> {
    let lines = render::suggestion_lines(search);
    if lines.is_empty() {
        writeln!(out, "no suggested terms")?;
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
