//! crates/docqa_client_core/src/domain.rs
//!
//! Defines the pure, core data structures for the client.
//! These structs are independent of any wire or rendering format.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;

/// Who authored a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single line of the conversation log. Never edited once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    pub role: Role,
    pub text: String,
    pub sources: Vec<String>,
}

impl ConversationEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn assistant(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            sources,
        }
    }
}

/// The backend's answer to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// One stored question/answer pair from the backend's chat history.
/// Read-only: it is displayed, never merged into the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
    pub sources: Vec<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Metadata for an indexed document, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub num_chunks: u64,
    pub file_size: u64,
    pub status: Option<String>,
}

/// Aggregate figures over every indexed document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStats {
    pub total_documents: u64,
    pub total_size_mb: f64,
    pub total_chunks: u64,
}

/// A file picked by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// What the backend reports after indexing an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub filename: String,
    pub num_chunks: u64,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

/// A transient notification. At most one is live at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub text: String,
    pub severity: Severity,
}

/// An HTML fragment produced by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
