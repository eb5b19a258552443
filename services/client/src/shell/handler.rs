//! services/client/src/shell/handler.rs
//!
//! The control loop of the interactive shell. Each command runs as its own
//! task so a slow question never blocks typing the next command. The
//! controllers themselves reject overlapping operations of the same kind.
//! A command that has started is always awaited before the loop returns.

use std::path::Path;
use std::sync::Arc;

use docqa_client_core::chat::CHAT_FAILURE_TEXT;
use docqa_client_core::domain::{Role, UploadFile};
use docqa_client_core::render::{format_file_size, DOCUMENTS_ERROR_TEXT, EMPTY_DOCUMENTS_TEXT};
use docqa_client_core::{
    ChatOutcome, ChatRejection, DeleteOutcome, ListOutcome, UploadOutcome, UploadRejection,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::shell::protocol::{Command, HELP};
use crate::shell::state::AppState;

/// Runs one command to completion and returns the line to show the user.
pub async fn dispatch(state: Arc<AppState>, command: Command) -> String {
    match command {
        Command::Ask(question) => ask(&state, &question).await,
        Command::History(limit) => history(&state, limit).await,
        Command::Upload(path) => upload(&state, path.as_deref()).await,
        Command::List => list(&state).await,
        Command::Delete(id) => delete(&state, &id).await,
        Command::Stats => match state.documents.stats().await {
            Ok(stats) => format!(
                "{} documents, {} MB, {} chunks",
                stats.total_documents, stats.total_size_mb, stats.total_chunks
            ),
            Err(e) => format!("Could not load statistics ({})", e.kind()),
        },
        Command::Dismiss => {
            state.notifier.dismiss();
            "Alert dismissed.".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => "Bye.".to_string(),
    }
}

async fn ask(state: &AppState, question: &str) -> String {
    match state.chat.submit(question).await {
        ChatOutcome::Answered => {
            let entries = state.chat.entries();
            let Some(answer) = entries.iter().rev().find(|e| e.role == Role::Assistant) else {
                return String::new();
            };
            let mut report = answer.text.clone();
            if !answer.sources.is_empty() {
                report.push_str("\nSources:");
                for (i, source) in answer.sources.iter().enumerate() {
                    report.push_str(&format!("\n  {}. {}", i + 1, source));
                }
            }
            report
        }
        ChatOutcome::Failed(e) => format!("{} ({})", CHAT_FAILURE_TEXT, e.kind()),
        ChatOutcome::Rejected(ChatRejection::Busy) => {
            "Still waiting for the previous answer.".to_string()
        }
        ChatOutcome::Rejected(ChatRejection::Invalid(_)) => "Nothing to ask.".to_string(),
    }
}

async fn history(state: &AppState, limit: u32) -> String {
    let records = match state.chat.history(limit).await {
        Ok(records) => records,
        Err(e) => return format!("Could not load chat history ({})", e.kind()),
    };
    if records.is_empty() {
        return "No stored conversations yet.".to_string();
    }
    records
        .iter()
        .map(|record| {
            let when = record
                .timestamp
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "unknown time".to_string());
            let mut line = format!("[{}] Q: {}\n  A: {}", when, record.question, record.answer);
            if !record.sources.is_empty() {
                line.push_str(&format!("\n  Sources: {}", record.sources.join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn upload(state: &AppState, path: Option<&Path>) -> String {
    let file = match path {
        Some(path) => match read_upload(path).await {
            Ok(file) => Some(file),
            Err(e) => {
                error!("Could not read {}: {}", path.display(), e);
                return format!("Could not read {}: {}", path.display(), e);
            }
        },
        None => None,
    };
    match state.upload.submit(file).await {
        UploadOutcome::Rejected(UploadRejection::Busy) => {
            "An upload is already in progress.".to_string()
        }
        UploadOutcome::Uploaded { .. }
        | UploadOutcome::Failed(_)
        | UploadOutcome::Rejected(UploadRejection::Invalid(_)) => current_alert(state),
    }
}

async fn read_upload(path: &Path) -> Result<UploadFile, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadFile::new(name, bytes))
}

async fn list(state: &AppState) -> String {
    match state.documents.refresh().await {
        ListOutcome::Listed(_) => state
            .documents
            .cached()
            .iter()
            .map(|doc| {
                format!(
                    "{}  {}  ({} chunks, {}, uploaded {})",
                    doc.id,
                    doc.filename,
                    doc.num_chunks,
                    format_file_size(doc.file_size),
                    doc.upload_date.format("%Y-%m-%d %H:%M")
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        ListOutcome::Empty => EMPTY_DOCUMENTS_TEXT.to_string(),
        ListOutcome::Unavailable(_) => DOCUMENTS_ERROR_TEXT.to_string(),
    }
}

async fn delete(state: &AppState, id: &str) -> String {
    let filename = state
        .documents
        .find(id)
        .map(|doc| doc.filename)
        .unwrap_or_else(|| id.to_string());
    match state.documents.delete(id, &filename).await {
        DeleteOutcome::Declined => "Deletion cancelled.".to_string(),
        DeleteOutcome::Deleted | DeleteOutcome::Failed(_) => current_alert(state),
    }
}

fn current_alert(state: &AppState) -> String {
    state
        .notifier
        .current()
        .map(|alert| alert.text)
        .unwrap_or_default()
}

/// Reads commands line by line until `quit` or end of input, then waits for
/// every command still running.
///
/// A line typed while a confirmation is open answers it instead of being
/// parsed as a command.
pub async fn run<R>(state: Arc<AppState>, input: R) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut tasks = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if state.confirm.answer(&line) {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            info!("Shell closed by user.");
            break;
        }
        let state = state.clone();
        tasks.spawn(async move {
            let report = dispatch(state, command).await;
            if !report.is_empty() {
                println!("{}", report);
            }
        });
        // Reap finished commands as we go.
        while let Some(done) = tasks.try_join_next() {
            if let Err(e) = done {
                warn!("Command task failed: {}", e);
            }
        }
    }

    // No more answers can arrive: open and future confirmations read as "no".
    state.confirm.close();
    if !tasks.is_empty() {
        info!("Waiting for {} running command(s) to finish.", tasks.len());
    }
    while let Some(done) = tasks.join_next().await {
        if let Err(e) = done {
            warn!("Command task failed: {}", e);
        }
    }
    Ok(())
}
