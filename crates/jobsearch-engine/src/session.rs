//! Session persistence.
//!
//! A session is one conversation's transcript with identity and timestamps,
//! stored as a JSONL file: a metadata line followed by one message per line.

use crate::conversation::{Message, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Maximum length of a title derived from the first user message.
const TITLE_LEN: usize = 50;

/// A persisted conversation session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session ID.
    pub id: String,
    /// Session title (derived from the first user message).
    pub title: String,
    /// Transcript messages.
    pub messages: Vec<Message>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: "New Session".into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored transcript with the conversation's current one.
    ///
    /// Updates the title from the first user message and bumps the
    /// updated-at timestamp.
    pub fn sync_messages(&mut self, messages: &[Message]) {
        self.messages = messages.to_vec();
        if let Some(first) = self.messages.iter().find(|m| m.role == Role::User) {
            self.title = first.text.chars().take(TITLE_LEN).collect();
            if first.text.chars().count() > TITLE_LEN {
                self.title.push_str("...");
            }
        }
        self.updated_at = Utc::now();
    }

    /// Save the session to a JSONL file under `sessions_dir`.
    pub fn save(&self, sessions_dir: &Path) -> Result<(), SessionError> {
        use std::io::Write;

        std::fs::create_dir_all(sessions_dir).map_err(SessionError::Io)?;

        let path = sessions_dir.join(format!("{}.jsonl", self.id));
        let mut file = std::fs::File::create(&path).map_err(SessionError::Io)?;

        let metadata = SessionMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        let meta_json = serde_json::to_string(&metadata).map_err(SessionError::Serialize)?;
        writeln!(file, "{meta_json}").map_err(SessionError::Io)?;

        for msg in &self.messages {
            let json = serde_json::to_string(msg).map_err(SessionError::Serialize)?;
            writeln!(file, "{json}").map_err(SessionError::Io)?;
        }

        Ok(())
    }

    /// Load a session from a JSONL file.
    pub fn load(sessions_dir: &Path, session_id: &str) -> Result<Self, SessionError> {
        let path = sessions_dir.join(format!("{session_id}.jsonl"));
        let content = std::fs::read_to_string(&path).map_err(SessionError::Io)?;

        let mut lines = content.lines();

        let meta_line = lines.next().ok_or(SessionError::EmptySession)?;
        let metadata: SessionMetadata =
            serde_json::from_str(meta_line).map_err(SessionError::Parse)?;

        let mut messages = Vec::new();
        for line in lines {
            if !line.trim().is_empty() {
                let msg: Message = serde_json::from_str(line).map_err(SessionError::Parse)?;
                messages.push(msg);
            }
        }

        Ok(Self {
            id: metadata.id,
            title: metadata.title,
            messages,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
        })
    }

    /// List all session IDs under `sessions_dir`.
    pub fn list_sessions(sessions_dir: &Path) -> Result<Vec<String>, SessionError> {
        if !sessions_dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(sessions_dir).map_err(SessionError::Io)? {
            let entry = entry.map_err(SessionError::Io)?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "jsonl") {
                if let Some(stem) = path.file_stem() {
                    ids.push(stem.to_string_lossy().to_string());
                }
            }
        }

        Ok(ids)
    }

    /// Render the transcript as markdown for export.
    pub fn to_markdown(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        out.push_str("# Job Search Assistant Transcript\n\n");
        let _ = writeln!(out, "Session: {}", self.title);
        let _ = writeln!(out, "Session ID: {}\n", self.id);
        out.push_str("---\n\n");

        for msg in &self.messages {
            let label = match msg.role {
                Role::User => "**You**",
                Role::Agent => "**Assistant**",
                Role::Error => "**Error**",
            };
            let _ = writeln!(out, "### {label}\n");
            out.push_str(&msg.text);
            out.push_str("\n\n");
        }

        out
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Session metadata (stored as first line of JSONL).
#[derive(Debug, Serialize, Deserialize)]
struct SessionMetadata {
    id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// JSON parse error.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Empty session file.
    #[error("Session file is empty")]
    EmptySession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_first_user_message() {
        let mut session = Session::new();
        assert_eq!(session.title, "New Session");

        session.sync_messages(&[
            Message::user("remote rust jobs with visa sponsorship"),
            Message::agent("Here are some options"),
        ]);
        assert!(session.title.starts_with("remote rust jobs"));
    }

    #[test]
    fn test_long_title_is_truncated() {
        let mut session = Session::new();
        let long = "x".repeat(80);
        session.sync_messages(&[Message::user(long)]);
        assert!(session.title.ends_with("..."));
        assert_eq!(session.title.chars().count(), TITLE_LEN + 3);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let mut session = Session::new();
        session.sync_messages(&[
            Message::user("engineer jobs in SF"),
            Message::agent("Found 3 jobs"),
            Message::error("invalid query"),
        ]);
        session.save(dir.path()).unwrap();

        let loaded = Session::load(dir.path(), &session.id).unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.title, session.title);
        assert_eq!(loaded.messages.len(), 3);
        assert_eq!(loaded.messages[0].role, Role::User);
        assert_eq!(loaded.messages[2].role, Role::Error);
        assert_eq!(loaded.messages[1].text, "Found 3 jobs");
    }

    #[test]
    fn test_list_sessions() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::list_sessions(dir.path()).unwrap().is_empty());

        let a = Session::new();
        a.save(dir.path()).unwrap();
        let b = Session::new();
        b.save(dir.path()).unwrap();

        let mut ids = Session::list_sessions(dir.path()).unwrap();
        ids.sort();
        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_markdown_export_labels_roles() {
        let mut session = Session::new();
        session.sync_messages(&[
            Message::user("hello"),
            Message::agent("hi there"),
            Message::error("oops"),
        ]);

        let md = session.to_markdown();
        assert!(md.contains("### **You**"));
        assert!(md.contains("### **Assistant**"));
        assert!(md.contains("### **Error**"));
        assert!(md.contains("hi there"));
    }
}
