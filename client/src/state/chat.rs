//! Chat session store: one ordered message log per search surface.
//!
//! DESIGN
//! ======
//! A `ChatSession` is created per surface and owned by that surface's
//! controller. The log is append-only apart from `collapsed` toggles and a
//! bulk `clear`. Export pairs messages positionally (user at even index,
//! assistant at the following odd index); pairs that do not match that shape
//! are skipped rather than reported.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::bible::BibleSearchSettings;
use super::testimony::TestimonySearchSettings;
use crate::util::clock;

pub const EMPTY_EXPORT_NOTICE: &str = "No chat history to export.";

/// An independent chat-style feature with its own session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Bible,
    Testimony,
}

impl Surface {
    /// Prefix used in export filenames.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Bible => "bible",
            Self::Testimony => "testimony",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Snapshot of the controls in effect when a query was sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchSettings {
    Bible(BibleSearchSettings),
    Testimony(TestimonySearchSettings),
}

impl From<BibleSearchSettings> for SearchSettings {
    fn from(settings: BibleSearchSettings) -> Self {
        Self::Bible(settings)
    }
}

impl From<TestimonySearchSettings> for SearchSettings {
    fn from(settings: TestimonySearchSettings) -> Self {
        Self::Testimony(settings)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Raw search-response payload, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SearchSettings>,
    #[serde(default)]
    pub collapsed: bool,
}

/// The caller-supplied part of a message; id, timestamp and `collapsed`
/// are filled in by the session.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMessage {
    pub role: Role,
    pub text: String,
    pub result: Option<Value>,
    pub settings: Option<SearchSettings>,
}

impl NewMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into(), result: None, settings: None }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into(), result: None, settings: None }
    }

    #[must_use]
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: impl Into<SearchSettings>) -> Self {
        self.settings = Some(settings.into());
        self
    }
}

/// One exported (query, settings, results) triplet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SearchSettings>,
    /// `null` when the assistant turn carried no payload (e.g. an error reply).
    pub results: Option<Value>,
}

/// A serialized transcript ready to be saved or downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryExport {
    pub filename: String,
    pub content: String,
}

impl HistoryExport {
    /// Write the transcript into `dir` under its own filename.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no chat history to export")]
    EmptyHistory,
    #[error("failed to serialize chat history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct ChatSession {
    surface: Surface,
    messages: Vec<ChatMessage>,
    notice: Option<String>,
}

impl ChatSession {
    #[must_use]
    pub fn new(surface: Surface) -> Self {
        Self { surface, messages: Vec::new(), notice: None }
    }

    #[must_use]
    pub fn surface(&self) -> Surface {
        self.surface
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Append a message stamped with a fresh id and the current time.
    pub fn add_message(&mut self, partial: NewMessage) -> &ChatMessage {
        self.add_message_at(partial, clock::now_millis())
    }

    /// Append a message with an explicit creation time.
    pub fn add_message_at(&mut self, partial: NewMessage, created_at: i64) -> &ChatMessage {
        let NewMessage { role, text, result, settings } = partial;
        let id = uuid::Uuid::new_v4().to_string();
        debug!(surface = self.surface.slug(), %id, ?role, "chat: message added");
        let index = self.messages.len();
        self.messages.push(ChatMessage { id, role, text, created_at, result, settings, collapsed: false });
        &self.messages[index]
    }

    /// Flip `collapsed` on the message with `id`. Returns `false` if absent.
    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.collapsed = !message.collapsed;
                true
            }
            None => false,
        }
    }

    /// Drop every message. Irreversible.
    pub fn clear(&mut self) {
        info!(surface = self.surface.slug(), count = self.messages.len(), "chat: history cleared");
        self.messages.clear();
    }

    /// Inline, dismissible message shown on this surface.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Positional (user, assistant) pairs as export triplets.
    #[must_use]
    pub fn export_records(&self) -> Vec<ExportRecord> {
        self.messages
            .chunks_exact(2)
            .filter_map(|pair| match pair {
                [user, assistant] if user.role == Role::User && assistant.role == Role::Assistant => {
                    Some(ExportRecord {
                        query: user.text.clone(),
                        settings: user.settings.clone(),
                        results: assistant.result.clone(),
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Serialize the history as a downloadable JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EmptyHistory`] (and sets the surface notice)
    /// when there is nothing to export.
    pub fn export_history(&mut self) -> Result<HistoryExport, ExportError> {
        self.export_history_at(OffsetDateTime::now_utc())
    }

    /// [`Self::export_history`] with an explicit timestamp for the filename.
    ///
    /// # Errors
    ///
    /// See [`Self::export_history`].
    pub fn export_history_at(&mut self, at: OffsetDateTime) -> Result<HistoryExport, ExportError> {
        if self.messages.is_empty() {
            self.set_notice(EMPTY_EXPORT_NOTICE);
            return Err(ExportError::EmptyHistory);
        }
        let records = self.export_records();
        let content = serde_json::to_string_pretty(&records)?;
        let filename = format!("{}-search-chat-{}.json", self.surface.slug(), clock::filename_stamp(at));
        info!(surface = self.surface.slug(), records = records.len(), %filename, "chat: history exported");
        Ok(HistoryExport { filename, content })
    }
}
