//! Tests for the HTTP adapter against a mocked backend.

use chrono::{TimeZone, Utc};
use docqa_client_core::{BackendApi, ErrorKind, PortError, UploadFile};
use docqa_client_lib::adapters::HttpBackend;
use docqa_client_lib::config::Config;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(base_url: &str) -> HttpBackend {
    let config = Config::from_lookup(|key| match key {
        "DOCQA_BASE_URL" => Some(base_url.to_string()),
        _ => None,
    })
    .unwrap();
    HttpBackend::new(&config).unwrap()
}

/// A URL nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_ask_question_posts_json_and_reads_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .and(body_json(json!({ "question": "What is X?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "X is Y.",
            "sources": ["a.pdf p1", "a.pdf p3"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = backend_for(&server.uri())
        .ask_question("What is X?")
        .await
        .unwrap();

    assert_eq!(answer.answer, "X is Y.");
    assert_eq!(answer.sources, vec!["a.pdf p1", "a.pdf p3"]);
}

#[tokio::test]
async fn test_ask_question_without_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "No idea." })))
        .mount(&server)
        .await;

    let answer = backend_for(&server.uri()).ask_question("?").await.unwrap();
    assert_eq!(answer.answer, "No idea.");
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn test_server_failure_carries_status_and_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "Vector store offline" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server.uri()).ask_question("q").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(
        err,
        PortError::Server {
            status: Some(500),
            message: Some("Vector store offline".to_string()),
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy page</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server.uri()).ask_question("q").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let backend = backend_for(&closed_port_url());

    let err = backend.ask_question("q").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);

    let err = backend.list_documents().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_upload_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"report.pdf\""))
        .and(body_string_contains("%PDF-1.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Document processed",
            "document_id": "65f0c2",
            "filename": "report.pdf",
            "num_chunks": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = backend_for(&server.uri())
        .upload_document(&UploadFile::new("report.pdf", b"%PDF-1.7 body".to_vec()))
        .await
        .unwrap();

    assert_eq!(receipt.filename, "report.pdf");
    assert_eq!(receipt.num_chunks, 12);
    assert_eq!(receipt.document_id.as_deref(), Some("65f0c2"));
}

#[tokio::test]
async fn test_upload_refused_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "PDF contains no extractable text"
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server.uri())
        .upload_document(&UploadFile::new("scan.pdf", b"%PDF".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.server_message(), Some("PDF contains no extractable text"));
}

#[tokio::test]
async fn test_upload_rejected_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Only PDF files are supported" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server.uri())
        .upload_document(&UploadFile::new("x.pdf", b"%PDF".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.server_message(), Some("Only PDF files are supported"));
}

#[tokio::test]
async fn test_upload_validation_error_has_no_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/upload"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{
                "loc": ["body", "file"],
                "msg": "field required",
                "type": "value_error.missing"
            }]
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server.uri())
        .upload_document(&UploadFile::new("x.pdf", b"%PDF".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PortError::Server {
            status: Some(422),
            message: None,
        }
    );
}

#[tokio::test]
async fn test_chat_history_sends_limit_and_reads_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/history"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                {
                    "id": "h2",
                    "question": "Second?",
                    "answer": "Two.",
                    "sources": ["b.pdf"],
                    "timestamp": "2024-05-03T10:30:00"
                },
                {
                    "id": "h1",
                    "question": "First?",
                    "answer": "One.",
                    "sources": null,
                    "timestamp": "2024-05-02T09:00:00.5"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = backend_for(&server.uri()).chat_history(5).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id.as_deref(), Some("h2"));
    assert_eq!(history[0].question, "Second?");
    assert_eq!(history[0].sources, vec!["b.pdf"]);
    assert_eq!(
        history[0].timestamp,
        Some(Utc.with_ymd_and_hms(2024, 5, 3, 10, 30, 0).unwrap())
    );
    assert!(history[1].sources.is_empty());
    assert!(history[1].timestamp.is_some());
}

#[tokio::test]
async fn test_chat_history_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "db down" })))
        .mount(&server)
        .await;

    let err = backend_for(&server.uri()).chat_history(50).await.unwrap_err();
    assert_eq!(err.server_message(), Some("db down"));
}

#[tokio::test]
async fn test_list_documents_accepts_naive_and_offset_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [
                {
                    "id": "1",
                    "filename": "a.pdf",
                    "upload_date": "2024-05-02T14:00:00.123456",
                    "num_chunks": 4,
                    "file_size": 2048,
                    "status": "processed"
                },
                {
                    "id": "2",
                    "filename": "b.pdf",
                    "upload_date": "2024-05-03T10:30:00Z",
                    "num_chunks": 1,
                    "file_size": 100
                }
            ],
            "total": 2
        })))
        .mount(&server)
        .await;

    let documents = backend_for(&server.uri()).list_documents().await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].filename, "a.pdf");
    assert_eq!(documents[0].file_size, 2048);
    assert_eq!(documents[0].status.as_deref(), Some("processed"));
    assert_eq!(
        documents[1].upload_date,
        Utc.with_ymd_and_hms(2024, 5, 3, 10, 30, 0).unwrap()
    );
    assert_eq!(documents[1].status, None);
}

#[tokio::test]
async fn test_list_without_documents_field_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0 })))
        .mount(&server)
        .await;

    let documents = backend_for(&server.uri()).list_documents().await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn test_delete_unknown_document() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Document not found" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = backend_for(&server.uri())
        .delete_document("gone")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        PortError::Server {
            status: Some(404),
            message: Some("Document not found".to_string()),
        }
    );
}

#[tokio::test]
async fn test_delete_document() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/65f0c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    backend_for(&server.uri())
        .delete_document("65f0c2")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_document_stats_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_documents": 3,
            "total_size_mb": 1.5,
            "total_chunks": 42
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server.uri());
    let stats = backend.document_stats().await.unwrap();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.total_size_mb, 1.5);
    assert_eq!(stats.total_chunks, 42);

    backend.health().await.unwrap();
}
