//! crates/docqa_client_core/src/documents.rs
//!
//! Fetches, renders and deletes documents. Every refresh replaces the whole
//! panel, so calling it again is always safe.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use crate::domain::{Document, DocumentStats};
use crate::notifier::Notifier;
use crate::ports::{BackendApi, ConfirmationPrompt, DocumentListView, PortError, PortResult};
use crate::render::{render_document_list, render_documents_error, render_empty_documents};

pub const DELETE_FAILURE_TEXT: &str = "Error deleting document";

/// The result of one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Listed(usize),
    Empty,
    Unavailable(PortError),
}

/// The result of one delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Failed(PortError),
}

pub struct DocumentListController {
    backend: Arc<dyn BackendApi>,
    view: Arc<dyn DocumentListView>,
    notifier: Arc<Notifier>,
    confirm: Arc<dyn ConfirmationPrompt>,
    // Last successful fetch. Not authoritative; replaced wholesale.
    cache: Mutex<Vec<Document>>,
}

impl DocumentListController {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        view: Arc<dyn DocumentListView>,
        notifier: Arc<Notifier>,
        confirm: Arc<dyn ConfirmationPrompt>,
    ) -> Self {
        Self {
            backend,
            view,
            notifier,
            confirm,
            cache: Mutex::new(Vec::new()),
        }
    }

    pub async fn refresh(&self) -> ListOutcome {
        match self.backend.list_documents().await {
            Ok(documents) => {
                let outcome = if documents.is_empty() {
                    self.view.replace(render_empty_documents());
                    ListOutcome::Empty
                } else {
                    self.view.replace(render_document_list(&documents));
                    ListOutcome::Listed(documents.len())
                };
                info!("Document list refreshed ({} documents).", documents.len());
                *self.lock_cache() = documents;
                outcome
            }
            Err(e) => {
                error!(kind = %e.kind(), "Error loading documents: {}", e);
                self.view.replace(render_documents_error());
                ListOutcome::Unavailable(e)
            }
        }
    }

    /// Deletes a document after the user confirms. Declining issues no call.
    pub async fn delete(&self, document_id: &str, filename: &str) -> DeleteOutcome {
        let prompt = format!("Are you sure you want to delete \"{}\"?", filename);
        if !self.confirm.confirm(&prompt).await {
            info!("Deletion of '{}' declined.", filename);
            return DeleteOutcome::Declined;
        }

        match self.backend.delete_document(document_id).await {
            Ok(()) => {
                info!("Deleted document {} ('{}').", document_id, filename);
                self.notifier
                    .success(format!("Document \"{}\" deleted successfully", filename));
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!(kind = %e.kind(), "Delete error for {}: {}", document_id, e);
                self.notifier.danger(DELETE_FAILURE_TEXT);
                DeleteOutcome::Failed(e)
            }
        }
    }

    pub async fn stats(&self) -> PortResult<DocumentStats> {
        self.backend.document_stats().await
    }

    pub fn cached(&self) -> Vec<Document> {
        self.lock_cache().clone()
    }

    pub fn find(&self, document_id: &str) -> Option<Document> {
        self.lock_cache()
            .iter()
            .find(|doc| doc.id == document_id)
            .cloned()
    }

    fn lock_cache(&self) -> MutexGuard<'_, Vec<Document>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
