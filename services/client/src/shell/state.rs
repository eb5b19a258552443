//! services/client/src/shell/state.rs
//!
//! Defines the application state shared by every shell command: the wired
//! controllers and the adapters they render into.

use std::sync::Arc;

use docqa_client_core::ports::BackendApi;
use docqa_client_core::{ChatController, DocumentListController, Notifier, UploadController};

use crate::adapters::{ConsoleConfirm, HtmlPage};
use crate::config::Config;

/// The shared application state, created once at startup and passed to all
/// command tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn BackendApi>,
    pub page: Arc<HtmlPage>,
    pub confirm: Arc<ConsoleConfirm>,
    pub notifier: Arc<Notifier>,
    pub chat: Arc<ChatController>,
    pub documents: Arc<DocumentListController>,
    pub upload: Arc<UploadController>,
}

impl AppState {
    /// Wires the controllers onto the given backend and page. The page
    /// serves as every render target.
    pub fn new(
        config: Arc<Config>,
        backend: Arc<dyn BackendApi>,
        page: Arc<HtmlPage>,
        confirm: Arc<ConsoleConfirm>,
    ) -> Self {
        let notifier = Arc::new(Notifier::new(page.clone()));
        let documents = Arc::new(DocumentListController::new(
            backend.clone(),
            page.clone(),
            notifier.clone(),
            confirm.clone(),
        ));
        let upload = Arc::new(UploadController::new(
            backend.clone(),
            page.clone(),
            notifier.clone(),
            documents.clone(),
        ));
        let chat = Arc::new(ChatController::new(backend.clone(), page.clone()));

        Self {
            config,
            backend,
            page,
            confirm,
            notifier,
            chat,
            documents,
            upload,
        }
    }
}
