//! services/client/src/adapters/page.rs
//!
//! An in-memory page that implements every render-target port. It keeps the
//! same regions the browser page has (conversation, alert slot, document
//! list, upload controls) and can write the whole page to disk after each
//! change so it can be opened in a browser.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use docqa_client_core::domain::Markup;
use docqa_client_core::ports::{AlertSurface, ChatView, DocumentListView, UploadForm};
use tracing::warn;

const WELCOME: &str = r#"<div class="welcome-message"><p>Upload a PDF, then ask a question about it.</p></div>"#;

#[derive(Debug)]
struct PageState {
    welcome_visible: bool,
    chat_log: Vec<Markup>,
    pending: Option<Markup>,
    scroll_requests: usize,
    question_input_cleared: usize,
    question_input_focused: bool,
    chat_submit_enabled: bool,
    alert: Option<Markup>,
    documents: Markup,
    upload_submit_enabled: bool,
    upload_progress_visible: bool,
    file_input_cleared: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            welcome_visible: true,
            chat_log: Vec::new(),
            pending: None,
            scroll_requests: 0,
            question_input_cleared: 0,
            question_input_focused: true,
            chat_submit_enabled: true,
            alert: None,
            documents: Markup::default(),
            upload_submit_enabled: true,
            upload_progress_visible: false,
            file_input_cleared: 0,
        }
    }
}

/// A read-only copy of the page regions, for callers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub welcome_visible: bool,
    pub chat_log: Vec<Markup>,
    pub pending: Option<Markup>,
    pub scroll_requests: usize,
    pub question_input_cleared: usize,
    pub question_input_focused: bool,
    pub chat_submit_enabled: bool,
    pub alert: Option<Markup>,
    pub documents: Markup,
    pub upload_submit_enabled: bool,
    pub upload_progress_visible: bool,
    pub file_input_cleared: usize,
}

#[derive(Debug, Default)]
pub struct HtmlPage {
    state: Mutex<PageState>,
    snapshot_path: Option<PathBuf>,
}

impl HtmlPage {
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            state: Mutex::new(PageState::default()),
            snapshot_path,
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let state = self.lock();
        PageSnapshot {
            welcome_visible: state.welcome_visible,
            chat_log: state.chat_log.clone(),
            pending: state.pending.clone(),
            scroll_requests: state.scroll_requests,
            question_input_cleared: state.question_input_cleared,
            question_input_focused: state.question_input_focused,
            chat_submit_enabled: state.chat_submit_enabled,
            alert: state.alert.clone(),
            documents: state.documents.clone(),
            upload_submit_enabled: state.upload_submit_enabled,
            upload_progress_visible: state.upload_progress_visible,
            file_input_cleared: state.file_input_cleared,
        }
    }

    /// The whole page as a standalone HTML document.
    pub fn render_document(&self) -> String {
        let state = self.lock();
        let mut chat = String::new();
        if state.welcome_visible {
            chat.push_str(WELCOME);
        }
        for entry in &state.chat_log {
            chat.push_str(entry.as_str());
        }
        if let Some(pending) = &state.pending {
            chat.push_str(pending.as_str());
        }
        let disabled = |enabled: bool| if enabled { "" } else { " disabled" };
        format!(
            concat!(
                "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Document Search Assistant</title></head>\n<body>\n",
                "<section id=\"upload\"><div id=\"alertContainer\">{alert}</div>",
                "<form id=\"uploadForm\"><input type=\"file\" id=\"fileInput\" accept=\".pdf\"><button id=\"uploadBtn\"{upload_disabled}>Upload</button></form>",
                "<div id=\"progressContainer\" class=\"{progress_class}\">Processing...</div>",
                "<div id=\"documentsList\">{documents}</div></section>\n",
                "<section id=\"chat\"><div id=\"chatMessages\">{chat}</div>",
                "<form id=\"chatForm\"><textarea id=\"questionInput\"></textarea><button id=\"sendBtn\"{send_disabled}>Send</button></form></section>\n",
                "</body>\n</html>\n",
            ),
            alert = state.alert.as_ref().map(Markup::as_str).unwrap_or(""),
            upload_disabled = disabled(state.upload_submit_enabled),
            progress_class = if state.upload_progress_visible { "" } else { "d-none" },
            documents = state.documents,
            chat = chat,
            send_disabled = disabled(state.chat_submit_enabled),
        )
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update(&self, change: impl FnOnce(&mut PageState)) {
        {
            let mut state = self.lock();
            change(&mut *state);
        }
        self.write_snapshot();
    }

    fn write_snapshot(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        let html = self.render_document();
        if let Err(e) = std::fs::write(path, html) {
            warn!("Failed to write page snapshot to {}: {}", path.display(), e);
        }
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

impl ChatView for HtmlPage {
    fn append_entry(&self, markup: Markup) {
        self.update(|page| {
            page.welcome_visible = false;
            page.chat_log.push(markup);
        });
    }

    fn show_pending(&self, markup: Markup) {
        self.update(|page| page.pending = Some(markup));
    }

    fn remove_pending(&self) {
        self.update(|page| page.pending = None);
    }

    fn scroll_to_latest(&self) {
        self.lock().scroll_requests += 1;
    }

    fn clear_input(&self) {
        self.lock().question_input_cleared += 1;
    }

    fn focus_input(&self) {
        self.lock().question_input_focused = true;
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.update(|page| {
            page.chat_submit_enabled = enabled;
            if !enabled {
                page.question_input_focused = false;
            }
        });
    }
}

impl UploadForm for HtmlPage {
    fn set_submit_enabled(&self, enabled: bool) {
        self.update(|page| page.upload_submit_enabled = enabled);
    }

    fn set_progress_visible(&self, visible: bool) {
        self.update(|page| page.upload_progress_visible = visible);
    }

    fn clear_file_input(&self) {
        self.lock().file_input_cleared += 1;
    }
}

impl DocumentListView for HtmlPage {
    fn replace(&self, markup: Markup) {
        self.update(|page| page.documents = markup);
    }
}

impl AlertSurface for HtmlPage {
    fn replace(&self, markup: Option<Markup>) {
        self.update(|page| page.alert = markup);
    }
}
