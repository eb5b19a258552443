//! crates/docqa_client_core/src/ports.rs
//!
//! Defines the service contracts (traits) the controllers depend on.
//! These traits form the boundary of the hexagonal architecture: the backend
//! client, the render targets and the confirmation dialog are all injected,
//! so the controllers never reach for a concrete HTTP client or page.

use async_trait::async_trait;

use crate::domain::{
    Answer, Document, DocumentStats, HistoryRecord, Markup, UploadFile, UploadReceipt,
};
use crate::error::ErrorKind;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The two ways a backend call can fail once it has been issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The request never completed (connection refused, reset, DNS...).
    #[error("Network error: {0}")]
    Network(String),
    /// The request completed but the backend reported a failure, either
    /// through its status code or through its payload.
    #[error("Server error (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },
}

impl PortError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortError::Network(_) => ErrorKind::Network,
            PortError::Server { .. } => ErrorKind::Server,
        }
    }

    /// The message the backend supplied alongside a failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            PortError::Server { message, .. } => message.as_deref(),
            PortError::Network(_) => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Backend Port
//=========================================================================================

#[async_trait]
pub trait BackendApi: Send + Sync {
    // --- Chat ---
    async fn ask_question(&self, question: &str) -> PortResult<Answer>;

    /// The most recent stored exchanges, newest first, at most `limit`.
    async fn chat_history(&self, limit: u32) -> PortResult<Vec<HistoryRecord>>;

    // --- Documents ---
    /// Sends one file as a multipart upload. A `success: false` payload is
    /// reported as `PortError::Server` carrying the server's message.
    async fn upload_document(&self, file: &UploadFile) -> PortResult<UploadReceipt>;

    async fn list_documents(&self) -> PortResult<Vec<Document>>;

    async fn delete_document(&self, document_id: &str) -> PortResult<()>;

    async fn document_stats(&self) -> PortResult<DocumentStats>;

    // --- Liveness ---
    async fn health(&self) -> PortResult<()>;
}

//=========================================================================================
// Render Target Ports
//=========================================================================================

/// The conversation panel: log, pending indicator and question input.
pub trait ChatView: Send + Sync {
    fn append_entry(&self, markup: Markup);
    fn show_pending(&self, markup: Markup);
    fn remove_pending(&self);
    fn scroll_to_latest(&self);
    fn clear_input(&self);
    fn focus_input(&self);
    fn set_submit_enabled(&self, enabled: bool);
}

/// The upload form controls.
pub trait UploadForm: Send + Sync {
    fn set_submit_enabled(&self, enabled: bool);
    fn set_progress_visible(&self, visible: bool);
    fn clear_file_input(&self);
}

/// The document list panel. Every call replaces the whole panel.
pub trait DocumentListView: Send + Sync {
    fn replace(&self, markup: Markup);
}

/// The single alert slot. `None` empties it.
pub trait AlertSurface: Send + Sync {
    fn replace(&self, markup: Option<Markup>);
}

//=========================================================================================
// Interaction Ports
//=========================================================================================

#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Asks the user to confirm a destructive action.
    async fn confirm(&self, prompt: &str) -> bool;
}
