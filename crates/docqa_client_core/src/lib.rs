pub mod chat;
pub mod documents;
pub mod domain;
pub mod error;
pub mod flight;
pub mod notifier;
pub mod ports;
pub mod render;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use chat::{ChatController, ChatOutcome, ChatRejection};
pub use documents::{DeleteOutcome, DocumentListController, ListOutcome};
pub use domain::{
    AlertMessage, Answer, ConversationEntry, Document, DocumentStats, HistoryRecord, Markup, Role,
    Severity, UploadFile, UploadReceipt,
};
pub use error::{ErrorKind, ValidationError};
pub use flight::{Flight, FlightGate, FlightState};
pub use notifier::Notifier;
pub use ports::{
    AlertSurface, BackendApi, ChatView, ConfirmationPrompt, DocumentListView, PortError,
    PortResult, UploadForm,
};
pub use upload::{UploadController, UploadOutcome, UploadRejection};
