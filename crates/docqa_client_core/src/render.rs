//! crates/docqa_client_core/src/render.rs
//!
//! Pure HTML rendering for conversation entries, alerts and the document list.
//!
//! Only the chrome (icons, list scaffolding, buttons) is trusted markup. Every
//! string that came from the user or the backend goes through `escape_html`
//! before it is spliced in.

use crate::domain::{AlertMessage, ConversationEntry, Document, Markup, Role};

const USER_ICON: &str = r#"<i class="bi bi-person-circle message-icon"></i>"#;
const ASSISTANT_ICON: &str = r#"<i class="bi bi-robot message-icon"></i>"#;

pub const EMPTY_DOCUMENTS_TEXT: &str = "No documents uploaded yet.";
pub const DOCUMENTS_ERROR_TEXT: &str = "Error loading documents.";

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

//=========================================================================================
// Conversation
//=========================================================================================

pub fn render_entry(entry: &ConversationEntry) -> Markup {
    let text = escape_html(&entry.text);
    let html = match entry.role {
        Role::User => format!(
            r#"<div class="message user"><div class="message-bubble">{text}</div>{USER_ICON}</div>"#
        ),
        Role::Assistant => format!(
            r#"<div class="message assistant">{ASSISTANT_ICON}<div class="message-bubble">{text}{sources}</div></div>"#,
            sources = render_sources(&entry.sources),
        ),
    };
    Markup::new(html)
}

fn render_sources(sources: &[String]) -> String {
    if sources.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<div class="sources"><strong>Sources:</strong><ol>"#);
    for source in sources {
        html.push_str(&format!(
            r#"<li><i class="bi bi-file-earmark-text"></i> {}</li>"#,
            escape_html(source)
        ));
    }
    html.push_str("</ol></div>");
    html
}

/// The transient "thinking" indicator shown while a question is in flight.
pub fn render_pending() -> Markup {
    Markup::new(format!(
        r#"<div class="message assistant" id="loadingMessage">{ASSISTANT_ICON}<div class="loading-spinner"><div class="spinner-border spinner-border-sm text-primary" role="status"><span class="visually-hidden">Loading...</span></div><span>Thinking...</span></div></div>"#
    ))
}

//=========================================================================================
// Alerts
//=========================================================================================

pub fn render_alert(alert: &AlertMessage) -> Markup {
    Markup::new(format!(
        r#"<div class="alert alert-{severity} alert-dismissible fade show" role="alert">{text}<button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
        severity = alert.severity.as_str(),
        text = escape_html(&alert.text),
    ))
}

//=========================================================================================
// Document list
//=========================================================================================

pub fn render_document_list(documents: &[Document]) -> Markup {
    let mut html = String::new();
    for doc in documents {
        html.push_str(&render_document(doc));
    }
    Markup::new(html)
}

fn render_document(doc: &Document) -> String {
    let id = escape_html(&doc.id);
    let filename = escape_html(&doc.filename);
    format!(
        concat!(
            r#"<div class="document-item"><div class="d-flex justify-content-between align-items-center"><div>"#,
            r#"<h6 class="mb-1"><i class="bi bi-file-earmark-pdf text-danger"></i> {filename}</h6>"#,
            r#"<small class="text-muted">Uploaded: {uploaded} | Chunks: {chunks} | Size: {size}</small>"#,
            r#"</div><button class="btn btn-sm btn-outline-danger" data-document-id="{id}" data-filename="{filename}">"#,
            r#"<i class="bi bi-trash"></i></button></div></div>"#,
        ),
        filename = filename,
        uploaded = doc.upload_date.format("%Y-%m-%d %H:%M:%S UTC"),
        chunks = doc.num_chunks,
        size = format_file_size(doc.file_size),
        id = id,
    )
}

pub fn render_empty_documents() -> Markup {
    Markup::new(format!(r#"<p class="text-muted">{EMPTY_DOCUMENTS_TEXT}</p>"#))
}

pub fn render_documents_error() -> Markup {
    Markup::new(format!(r#"<p class="text-danger">{DOCUMENTS_ERROR_TEXT}</p>"#))
}

/// Human-readable size using base-1024 units, rounded to two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
