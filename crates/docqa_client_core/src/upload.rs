//! crates/docqa_client_core/src/upload.rs
//!
//! The single-file upload flow. Validates locally, sends one multipart
//! request, reports the result through the notifier and refreshes the
//! document list on success.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::documents::DocumentListController;
use crate::domain::UploadFile;
use crate::error::ValidationError;
use crate::flight::FlightGate;
use crate::notifier::Notifier;
use crate::ports::{BackendApi, PortError, UploadForm};

pub const MISSING_FILE_TEXT: &str = "Please select a file";
pub const INVALID_TYPE_TEXT: &str = "Only PDF files are allowed";
pub const UPLOAD_FAILED_TEXT: &str = "Upload failed";
pub const UPLOAD_NETWORK_TEXT: &str =
    "Network error uploading document. Please check if the server is running.";

// Case-sensitive: "report.PDF" is rejected.
const PDF_SUFFIX: &str = ".pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    Busy,
    Invalid(ValidationError),
}

/// The result of one call to `UploadController::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Rejected(UploadRejection),
    Uploaded { filename: String, num_chunks: u64 },
    Failed(PortError),
}

/// Checks a selection before anything is sent.
pub fn validate(file: Option<&UploadFile>) -> Result<&UploadFile, ValidationError> {
    let file = file.ok_or(ValidationError::MissingFile)?;
    if !file.name.ends_with(PDF_SUFFIX) {
        return Err(ValidationError::InvalidType(file.name.clone()));
    }
    Ok(file)
}

pub struct UploadController {
    backend: Arc<dyn BackendApi>,
    form: Arc<dyn UploadForm>,
    notifier: Arc<Notifier>,
    documents: Arc<DocumentListController>,
    flight: FlightGate,
}

impl UploadController {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        form: Arc<dyn UploadForm>,
        notifier: Arc<Notifier>,
        documents: Arc<DocumentListController>,
    ) -> Self {
        Self {
            backend,
            form,
            notifier,
            documents,
            flight: FlightGate::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    /// Uploads the first selected file; any further selections are ignored.
    pub async fn submit_selection(&self, files: Vec<UploadFile>) -> UploadOutcome {
        self.submit(files.into_iter().next()).await
    }

    pub async fn submit(&self, file: Option<UploadFile>) -> UploadOutcome {
        if self.flight.is_busy() {
            debug!("Upload submitted while another is in flight; ignoring.");
            return UploadOutcome::Rejected(UploadRejection::Busy);
        }
        let file = match validate(file.as_ref()) {
            Ok(file) => file,
            Err(e) => {
                let text = match e {
                    ValidationError::InvalidType(_) => INVALID_TYPE_TEXT,
                    _ => MISSING_FILE_TEXT,
                };
                info!("Upload rejected before sending: {}", e);
                self.notifier.danger(text);
                return UploadOutcome::Rejected(UploadRejection::Invalid(e));
            }
        };
        let Some(flight) = self.flight.try_begin() else {
            return UploadOutcome::Rejected(UploadRejection::Busy);
        };

        self.form.set_submit_enabled(false);
        self.form.set_progress_visible(true);
        self.notifier.clear();

        info!("Uploading '{}' ({} bytes).", file.name, file.bytes.len());
        let outcome = match self.backend.upload_document(file).await {
            Ok(receipt) => {
                info!(
                    "Uploaded '{}' as {} chunks.",
                    receipt.filename, receipt.num_chunks
                );
                self.notifier.success(format!(
                    "Success! {} uploaded and processed. Created {} chunks.",
                    receipt.filename, receipt.num_chunks
                ));
                self.form.clear_file_input();
                UploadOutcome::Uploaded {
                    filename: receipt.filename,
                    num_chunks: receipt.num_chunks,
                }
            }
            Err(e) => {
                match &e {
                    PortError::Server { message, .. } => {
                        warn!(kind = %e.kind(), "Upload refused: {}", e);
                        let text = message.as_deref().unwrap_or(UPLOAD_FAILED_TEXT);
                        self.notifier.danger(text);
                    }
                    PortError::Network(_) => {
                        error!(kind = %e.kind(), "Upload error: {}", e);
                        self.notifier.danger(UPLOAD_NETWORK_TEXT);
                    }
                }
                UploadOutcome::Failed(e)
            }
        };

        drop(flight);
        self.form.set_progress_visible(false);
        self.form.set_submit_enabled(true);

        if matches!(outcome, UploadOutcome::Uploaded { .. }) {
            self.documents.refresh().await;
        }
        outcome
    }
}
