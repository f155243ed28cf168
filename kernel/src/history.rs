//! Persistent chat history.
//!
//! Sessions live in a single `sessions.json` file, ordered by most recent
//! activity. The store keeps at most [`MAX_SESSIONS`] sessions and
//! [`MAX_MESSAGES_PER_SESSION`] messages per session; the oldest are dropped.

use chrono::Utc;
use codemate_sdk::Role;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Sessions kept by the store.
pub const MAX_SESSIONS: usize = 50;
/// Messages kept per session.
pub const MAX_MESSAGES_PER_SESSION: usize = 100;

const HISTORY_FILE: &str = "sessions.json";

/// Errors raised by the session store.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// No session has this id.
    #[error("Session {0} not found")]
    NotFound(String),

    /// Imported data has the wrong shape.
    #[error("Failed to import history: {0}")]
    InvalidImport(String),

    /// Reading or writing the history file failed.
    #[error("History I/O error at {path}: {source}")]
    Io {
        /// The history file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The history file is not valid JSON.
    #[error("History file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// One stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message id.
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Who wrote it.
    pub role: Role,
    /// Message text.
    pub content: String,
}

/// One conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique session id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last activity in epoch milliseconds.
    pub updated_at: i64,
    /// Messages, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// JSON-file backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Opens the store in `directory`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory).map_err(|source| HistoryError::Io {
            path: directory.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: directory.join(HISTORY_FILE),
        })
    }

    /// All sessions, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read.
    pub fn list_sessions(&self) -> Result<Vec<ChatSession>, HistoryError> {
        self.load()
    }

    /// The session with `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read.
    pub fn get_session(&self, id: &str) -> Result<Option<ChatSession>, HistoryError> {
        Ok(self.load()?.into_iter().find(|s| s.id == id))
    }

    /// Creates an empty session. Without a title one is derived from today's
    /// date.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read or written.
    pub fn create_session(&self, title: Option<&str>) -> Result<ChatSession, HistoryError> {
        let now = now_millis();
        let session = ChatSession {
            id: generate_id(),
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map_or_else(
                    || format!("Chat {}", Utc::now().format("%Y-%m-%d")),
                    str::to_string,
                ),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        };

        let mut sessions = self.load()?;
        sessions.insert(0, session.clone());
        sessions.truncate(MAX_SESSIONS);
        self.save(&sessions)?;

        debug!(session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Appends a message and moves the session to the front.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NotFound`] for an unknown session.
    pub fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: impl Into<String>,
    ) -> Result<ChatMessage, HistoryError> {
        let message = ChatMessage {
            id: generate_id(),
            timestamp: now_millis(),
            role,
            content: content.into(),
        };

        let stored = message.clone();
        self.touch(session_id, move |session| {
            session.messages.push(stored);
            let excess = session
                .messages
                .len()
                .saturating_sub(MAX_MESSAGES_PER_SESSION);
            session.messages.drain(..excess);
        })?;
        Ok(message)
    }

    /// Renames a session.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NotFound`] for an unknown session.
    pub fn rename_session(&self, session_id: &str, title: &str) -> Result<(), HistoryError> {
        let title = title.to_string();
        self.touch(session_id, move |session| session.title = title)
    }

    /// Deletes a session. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read or written.
    pub fn delete_session(&self, session_id: &str) -> Result<(), HistoryError> {
        let mut sessions = self.load()?;
        sessions.retain(|s| s.id != session_id);
        self.save(&sessions)
    }

    /// Deletes every session.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be written.
    pub fn clear(&self) -> Result<(), HistoryError> {
        self.save(&[])
    }

    /// All sessions as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be read.
    pub fn export_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string_pretty(&self.load()?)?)
    }

    /// Replaces the stored sessions with `json`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidImport`] unless `json` is an array of
    /// sessions, each with an id, a title and a message list.
    pub fn import_json(&self, json: &str) -> Result<usize, HistoryError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| HistoryError::InvalidImport(e.to_string()))?;
        if !value.is_array() {
            return Err(HistoryError::InvalidImport(
                "Invalid format: Expected an array of sessions".to_string(),
            ));
        }

        let mut sessions: Vec<ChatSession> = serde_json::from_value(value)
            .map_err(|e| HistoryError::InvalidImport(format!("Invalid session format: {e}")))?;
        if sessions
            .iter()
            .any(|s| s.id.is_empty() || s.title.is_empty())
        {
            return Err(HistoryError::InvalidImport(
                "Invalid session format".to_string(),
            ));
        }

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions.truncate(MAX_SESSIONS);
        self.save(&sessions)?;
        Ok(sessions.len())
    }

    fn touch(
        &self,
        session_id: &str,
        update: impl FnOnce(&mut ChatSession),
    ) -> Result<(), HistoryError> {
        let mut sessions = self.load()?;
        let index = sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(|| HistoryError::NotFound(session_id.to_string()))?;

        let mut session = sessions.remove(index);
        update(&mut session);
        session.updated_at = now_millis();
        sessions.insert(0, session);
        self.save(&sessions)
    }

    fn load(&self) -> Result<Vec<ChatSession>, HistoryError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(HistoryError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, sessions: &[ChatSession]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(sessions)?;
        std::fs::write(&self.path, json).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
