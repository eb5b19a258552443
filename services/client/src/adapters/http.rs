//! services/client/src/adapters/http.rs
//!
//! This module contains the adapter for the document Q&A backend's REST API.
//! It implements the `BackendApi` port from the `core` crate.
//!
//! Every response is turned into a typed result right here: transport
//! failures become `PortError::Network`, while non-2xx statuses, failure
//! payloads and undecodable bodies become `PortError::Server`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use docqa_client_core::domain::{
    Answer, Document, DocumentStats, HistoryRecord, UploadFile, UploadReceipt,
};
use docqa_client_core::ports::{BackendApi, PortError, PortResult};
use reqwest::{multipart, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::AppError;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    answer: String,
    #[serde(default)]
    sources: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

#[derive(Deserialize)]
struct HistoryEntry {
    #[serde(default)]
    id: Option<String>,
    question: String,
    answer: String,
    #[serde(default)]
    sources: Option<Vec<String>>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<HistoryEntry> for HistoryRecord {
    fn from(entry: HistoryEntry) -> Self {
        HistoryRecord {
            id: entry.id,
            question: entry.question,
            answer: entry.answer,
            sources: entry.sources.unwrap_or_default(),
            timestamp: entry.timestamp.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Deserialize, Default)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    num_chunks: Option<u64>,
}

#[derive(Deserialize)]
struct DocumentListResponse {
    #[serde(default)]
    documents: Option<Vec<DocumentRecord>>,
}

#[derive(Deserialize)]
struct DocumentRecord {
    id: String,
    filename: String,
    #[serde(deserialize_with = "lenient_datetime")]
    upload_date: DateTime<Utc>,
    #[serde(default)]
    num_chunks: u64,
    #[serde(default)]
    file_size: u64,
    #[serde(default)]
    status: Option<String>,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Document {
            id: record.id,
            filename: record.filename,
            upload_date: record.upload_date,
            num_chunks: record.num_chunks,
            file_size: record.file_size,
            status: record.status,
        }
    }
}

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(default)]
    total_documents: u64,
    #[serde(default)]
    total_size_mb: f64,
    #[serde(default)]
    total_chunks: u64,
}

/// Error bodies: our own `message`, or FastAPI's `detail`. Only string
/// values are shown to the user; validation arrays and objects are dropped.
#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        let text = |value: Option<serde_json::Value>| match value {
            Some(serde_json::Value::String(text)) if !text.is_empty() => Some(text),
            _ => None,
        };
        text(self.message).or_else(|| text(self.detail))
    }
}

/// Accepts RFC 3339 timestamps as well as the naive ISO timestamps the
/// backend emits for its stored documents (taken as UTC).
fn lenient_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("unrecognised timestamp '{}'", raw))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `BackendApi` over HTTP with `reqwest`.
///
/// No timeout is configured: a request that never answers keeps its
/// controller busy until it resolves.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
    api_root: Url,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` for the configured backend.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Self::with_client(client, &config.base_url, &config.api_root())
    }

    pub fn with_client(client: Client, base_url: &str, api_root: &str) -> Result<Self, AppError> {
        let parse = |raw: &str| {
            Url::parse(raw).map_err(|e| {
                AppError::Config(crate::config::ConfigError::InvalidValue(
                    "DOCQA_BASE_URL".to_string(),
                    format!("'{}': {}", raw, e),
                ))
            })
        };
        Ok(Self {
            client,
            base: parse(base_url)?,
            api_root: parse(api_root)?,
        })
    }

    fn api_url(&self, segments: &[&str]) -> PortResult<Url> {
        join_segments(&self.api_root, segments)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> PortResult<Response> {
        request
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))
    }

    /// Reads the body of a successful response and decodes it.
    async fn decode<T: DeserializeOwned>(response: Response) -> PortResult<T> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| PortError::Server {
            status: Some(status.as_u16()),
            message: Some(format!("Malformed response: {}", e)),
        })
    }

    /// Turns a non-2xx response into a `PortError::Server`.
    async fn failure(response: Response) -> PortError {
        let status = response.status();
        let message = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message),
            Err(_) => None,
        };
        server_error(status, message)
    }
}

fn server_error(status: StatusCode, message: Option<String>) -> PortError {
    PortError::Server {
        status: Some(status.as_u16()),
        message,
    }
}

fn join_segments(root: &Url, segments: &[&str]) -> PortResult<Url> {
    let mut url = root.clone();
    url.path_segments_mut()
        .map_err(|_| PortError::Network(format!("'{}' cannot be a base URL", root)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

//=========================================================================================
// `BackendApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl BackendApi for HttpBackend {
    async fn ask_question(&self, question: &str) -> PortResult<Answer> {
        let url = self.api_url(&["chat", "query"])?;
        debug!("POST {}", url);
        let response = self
            .send(self.client.post(url).json(&QueryRequest { question }))
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        let body: QueryResponse = Self::decode(response).await?;
        Ok(Answer {
            answer: body.answer,
            sources: body.sources.unwrap_or_default(),
        })
    }

    async fn chat_history(&self, limit: u32) -> PortResult<Vec<HistoryRecord>> {
        let url = self.api_url(&["chat", "history"])?;
        debug!("GET {} (limit {})", url, limit);
        let response = self
            .send(self.client.get(url).query(&[("limit", limit)]))
            .await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        let body: HistoryResponse = Self::decode(response).await?;
        Ok(body.history.into_iter().map(HistoryRecord::from).collect())
    }

    async fn upload_document(&self, file: &UploadFile) -> PortResult<UploadReceipt> {
        let url = self.api_url(&["documents", "upload"])?;
        debug!("POST {} ({})", url, file.name);
        let form = multipart::Form::new().part(
            "file",
            multipart::Part::bytes(file.bytes.to_vec()).file_name(file.name.clone()),
        );
        let response = self.send(self.client.post(url).multipart(form)).await?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message);
            return Err(server_error(status, message));
        }
        let payload: UploadResponse =
            serde_json::from_slice(&body).map_err(|e| PortError::Server {
                status: Some(status.as_u16()),
                message: Some(format!("Malformed response: {}", e)),
            })?;
        if !payload.success {
            return Err(server_error(status, payload.message));
        }
        Ok(UploadReceipt {
            filename: payload.filename.unwrap_or_else(|| file.name.clone()),
            num_chunks: payload.num_chunks.unwrap_or(0),
            document_id: payload.document_id,
        })
    }

    async fn list_documents(&self) -> PortResult<Vec<Document>> {
        let url = self.api_url(&["documents", ""])?;
        debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        let body: DocumentListResponse = Self::decode(response).await?;
        Ok(body
            .documents
            .unwrap_or_default()
            .into_iter()
            .map(Document::from)
            .collect())
    }

    async fn delete_document(&self, document_id: &str) -> PortResult<()> {
        let url = self.api_url(&["documents", document_id])?;
        debug!("DELETE {}", url);
        let response = self.send(self.client.delete(url)).await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Ok(())
    }

    async fn document_stats(&self) -> PortResult<DocumentStats> {
        let url = self.api_url(&["documents", "stats"])?;
        debug!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        let body: StatsResponse = Self::decode(response).await?;
        Ok(DocumentStats {
            total_documents: body.total_documents,
            total_size_mb: body.total_size_mb,
            total_chunks: body.total_chunks,
        })
    }

    async fn health(&self) -> PortResult<()> {
        let url = join_segments(&self.base, &["health"])?;
        let response = self.send(self.client.get(url)).await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }
        Ok(())
    }
}
