//! crates/docqa_client_core/src/chat.rs
//!
//! The question/answer flow. Owns the conversation log and guarantees that at
//! most one question is in flight at a time.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use crate::domain::{ConversationEntry, HistoryRecord};
use crate::error::ValidationError;
use crate::flight::FlightGate;
use crate::ports::{BackendApi, ChatView, PortError, PortResult};
use crate::render::{render_entry, render_pending};

/// Shown in place of an answer for every network or server failure.
pub const CHAT_FAILURE_TEXT: &str =
    "Sorry, I encountered an error processing your question. Please try again.";

/// Why a submission was ignored without touching the log or the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRejection {
    Busy,
    Invalid(ValidationError),
}

/// The result of one call to `ChatController::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Rejected(ChatRejection),
    Answered,
    Failed(PortError),
}

pub struct ChatController {
    backend: Arc<dyn BackendApi>,
    view: Arc<dyn ChatView>,
    flight: FlightGate,
    log: Mutex<Vec<ConversationEntry>>,
}

impl ChatController {
    pub fn new(backend: Arc<dyn BackendApi>, view: Arc<dyn ChatView>) -> Self {
        Self {
            backend,
            view,
            flight: FlightGate::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    /// A snapshot of the conversation so far, oldest first.
    pub fn entries(&self) -> Vec<ConversationEntry> {
        self.lock_log().clone()
    }

    /// Submits a question. The user's entry is appended before the pending
    /// indicator, which is always replaced by exactly one assistant entry.
    pub async fn submit(&self, question: &str) -> ChatOutcome {
        let question = question.trim();
        let Some(flight) = self.flight.try_begin() else {
            debug!("Question submitted while another is in flight; ignoring.");
            return ChatOutcome::Rejected(ChatRejection::Busy);
        };
        if question.is_empty() {
            return ChatOutcome::Rejected(ChatRejection::Invalid(ValidationError::EmptyQuestion));
        }

        self.view.set_submit_enabled(false);
        self.append(ConversationEntry::user(question));
        self.view.clear_input();
        self.view.show_pending(render_pending());
        self.view.scroll_to_latest();

        info!("Asking question: '{}'", question);
        let result = self.backend.ask_question(question).await;
        self.view.remove_pending();

        let outcome = match result {
            Ok(answer) => {
                info!(sources = answer.sources.len(), "Answer received.");
                self.append(ConversationEntry::assistant(answer.answer, answer.sources));
                ChatOutcome::Answered
            }
            Err(e) => {
                match &e {
                    PortError::Network(_) => error!(kind = %e.kind(), "Query failed: {}", e),
                    PortError::Server { .. } => warn!(kind = %e.kind(), "Query failed: {}", e),
                }
                self.append(ConversationEntry::assistant(CHAT_FAILURE_TEXT, Vec::new()));
                ChatOutcome::Failed(e)
            }
        };

        drop(flight);
        self.view.set_submit_enabled(true);
        self.view.focus_input();
        outcome
    }

    /// Fetches stored exchanges for display. Does not take the flight and
    /// never touches the log or the view.
    pub async fn history(&self, limit: u32) -> PortResult<Vec<HistoryRecord>> {
        self.backend.chat_history(limit).await
    }

    fn append(&self, entry: ConversationEntry) {
        let markup = render_entry(&entry);
        self.lock_log().push(entry);
        self.view.append_entry(markup);
        self.view.scroll_to_latest();
    }

    fn lock_log(&self) -> MutexGuard<'_, Vec<ConversationEntry>> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
