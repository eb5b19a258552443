//! Hand-written port doubles shared by the controller tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use crate::domain::{
    Answer, Document, DocumentStats, HistoryRecord, Markup, UploadFile, UploadReceipt,
};
use crate::ports::{
    AlertSurface, BackendApi, ChatView, ConfirmationPrompt, DocumentListView, PortError,
    PortResult, UploadForm,
};

pub fn document(id: &str, filename: &str) -> Document {
    Document {
        id: id.to_string(),
        filename: filename.to_string(),
        upload_date: Utc.with_ymd_and_hms(2024, 5, 2, 14, 0, 0).unwrap(),
        num_chunks: 8,
        file_size: 2048,
        status: Some("processed".to_string()),
    }
}

pub fn server_error(message: Option<&str>) -> PortError {
    PortError::Server {
        status: Some(500),
        message: message.map(str::to_string),
    }
}

//=========================================================================================
// Backend
//=========================================================================================

/// A scripted backend. Each operation replays its configured reply and
/// records the call. When `hold` is set, every call parks until notified.
pub struct FakeBackend {
    pub ask_reply: Mutex<PortResult<Answer>>,
    pub history_reply: Mutex<PortResult<Vec<HistoryRecord>>>,
    pub upload_reply: Mutex<PortResult<UploadReceipt>>,
    pub list_reply: Mutex<PortResult<Vec<Document>>>,
    pub delete_reply: Mutex<PortResult<()>>,
    pub calls: Mutex<Vec<String>>,
    pub hold: Option<Arc<Notify>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            ask_reply: Mutex::new(Ok(Answer {
                answer: "answer".to_string(),
                sources: Vec::new(),
            })),
            history_reply: Mutex::new(Ok(Vec::new())),
            upload_reply: Mutex::new(Ok(UploadReceipt {
                filename: "report.pdf".to_string(),
                num_chunks: 4,
                document_id: Some("doc-1".to_string()),
            })),
            list_reply: Mutex::new(Ok(Vec::new())),
            delete_reply: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
            hold: None,
        }
    }
}

impl FakeBackend {
    pub fn held(gate: Arc<Notify>) -> Self {
        Self {
            hold: Some(gate),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_list(&self, reply: PortResult<Vec<Document>>) {
        *self.list_reply.lock().unwrap() = reply;
    }

    async fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.hold {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn ask_question(&self, question: &str) -> PortResult<Answer> {
        self.record(format!("ask:{question}")).await;
        self.ask_reply.lock().unwrap().clone()
    }

    async fn chat_history(&self, limit: u32) -> PortResult<Vec<HistoryRecord>> {
        self.calls.lock().unwrap().push(format!("history:{limit}"));
        self.history_reply.lock().unwrap().clone()
    }

    async fn upload_document(&self, file: &UploadFile) -> PortResult<UploadReceipt> {
        self.record(format!("upload:{}", file.name)).await;
        self.upload_reply.lock().unwrap().clone()
    }

    async fn list_documents(&self) -> PortResult<Vec<Document>> {
        self.calls.lock().unwrap().push("list".to_string());
        self.list_reply.lock().unwrap().clone()
    }

    async fn delete_document(&self, document_id: &str) -> PortResult<()> {
        self.record(format!("delete:{document_id}")).await;
        self.delete_reply.lock().unwrap().clone()
    }

    async fn document_stats(&self) -> PortResult<DocumentStats> {
        self.calls.lock().unwrap().push("stats".to_string());
        Ok(DocumentStats {
            total_documents: 1,
            total_size_mb: 0.5,
            total_chunks: 8,
        })
    }

    async fn health(&self) -> PortResult<()> {
        Ok(())
    }
}

//=========================================================================================
// Views
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Append(Markup),
    ShowPending,
    RemovePending,
    Scroll,
    ClearInput,
    Focus,
    SubmitEnabled(bool),
    Progress(bool),
    ClearFile,
}

#[derive(Default)]
pub struct RecordingChatView {
    pub events: Mutex<Vec<ViewEvent>>,
}

impl RecordingChatView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn appended(&self) -> Vec<Markup> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Append(markup) => Some(markup),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ChatView for RecordingChatView {
    fn append_entry(&self, markup: Markup) {
        self.push(ViewEvent::Append(markup));
    }
    fn show_pending(&self, _markup: Markup) {
        self.push(ViewEvent::ShowPending);
    }
    fn remove_pending(&self) {
        self.push(ViewEvent::RemovePending);
    }
    fn scroll_to_latest(&self) {
        self.push(ViewEvent::Scroll);
    }
    fn clear_input(&self) {
        self.push(ViewEvent::ClearInput);
    }
    fn focus_input(&self) {
        self.push(ViewEvent::Focus);
    }
    fn set_submit_enabled(&self, enabled: bool) {
        self.push(ViewEvent::SubmitEnabled(enabled));
    }
}

#[derive(Default)]
pub struct RecordingUploadForm {
    pub events: Mutex<Vec<ViewEvent>>,
}

impl RecordingUploadForm {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl UploadForm for RecordingUploadForm {
    fn set_submit_enabled(&self, enabled: bool) {
        self.events.lock().unwrap().push(ViewEvent::SubmitEnabled(enabled));
    }
    fn set_progress_visible(&self, visible: bool) {
        self.events.lock().unwrap().push(ViewEvent::Progress(visible));
    }
    fn clear_file_input(&self) {
        self.events.lock().unwrap().push(ViewEvent::ClearFile);
    }
}

#[derive(Default)]
pub struct RecordingListView {
    pub renders: Mutex<Vec<Markup>>,
}

impl RecordingListView {
    pub fn renders(&self) -> Vec<Markup> {
        self.renders.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Markup> {
        self.renders.lock().unwrap().last().cloned()
    }
}

impl DocumentListView for RecordingListView {
    fn replace(&self, markup: Markup) {
        self.renders.lock().unwrap().push(markup);
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub slot: Mutex<Option<Markup>>,
    pub replacements: Mutex<usize>,
}

impl RecordingAlerts {
    pub fn shown(&self) -> Option<Markup> {
        self.slot.lock().unwrap().clone()
    }
}

impl AlertSurface for RecordingAlerts {
    fn replace(&self, markup: Option<Markup>) {
        *self.slot.lock().unwrap() = markup;
        *self.replacements.lock().unwrap() += 1;
    }
}

//=========================================================================================
// Confirmation
//=========================================================================================

pub struct ScriptedConfirm {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationPrompt for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
