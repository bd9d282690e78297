//! Integration tests for embeddings service.

use gemini_sdk::error::RequestError;
use gemini_sdk::mocks::MockHttpTransport;
use gemini_sdk::services::{EmbeddingsService, EmbeddingsServiceImpl, DEFAULT_EMBEDDING_MODEL};
use gemini_sdk::transport::HttpMethod;
use gemini_sdk::types::{EmbedContentRequest, TaskType};
use gemini_sdk::GeminiError;
use pretty_assertions::assert_eq;
use serde_json::json;

fn create_test_service(transport: &MockHttpTransport) -> EmbeddingsServiceImpl {
    EmbeddingsServiceImpl::new(transport.context())
}

fn validation_fields(result: Result<impl std::fmt::Debug, GeminiError>) -> Vec<String> {
    match result {
        Err(GeminiError::Request(RequestError::ValidationError { details, .. })) => {
            details.into_iter().map(|d| d.field).collect()
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_embed_content_success() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json(200, &json!({"embedding": {"values": [0.25, -0.5, 0.75]}}));
    let service = create_test_service(&transport);
    let mut request =
        EmbedContentRequest::from_text("What is the meaning of life?").with_task_type(TaskType::RetrievalQuery);
    request.output_dimensionality = Some(768);

    // Act
    let response = service
        .embed_content(DEFAULT_EMBEDDING_MODEL, request)
        .await
        .unwrap();

    // Assert
    assert_eq!(response.embedding.values, vec![0.25, -0.5, 0.75]);
    transport.verify_request(
        0,
        HttpMethod::Post,
        "/v1beta/models/gemini-embedding-001:embedContent",
    );
    let body = transport.last_request().unwrap().json_body().unwrap();
    assert_eq!(body["taskType"], "RETRIEVAL_QUERY");
    assert_eq!(body["outputDimensionality"], 768);
    assert_eq!(body["content"]["parts"][0]["text"], "What is the meaning of life?");
}

#[tokio::test]
async fn test_title_requires_retrieval_document() {
    let transport = MockHttpTransport::new();
    let service = create_test_service(&transport);
    let mut request = EmbedContentRequest::from_text("doc").with_task_type(TaskType::Clustering);
    request.title = Some("Title".to_string());

    let result = service.embed_content(DEFAULT_EMBEDDING_MODEL, request).await;

    assert_eq!(validation_fields(result), vec!["title"]);
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_dimensionality_out_of_range() {
    let transport = MockHttpTransport::new();
    let service = create_test_service(&transport);
    let mut request = EmbedContentRequest::from_text("x");
    request.output_dimensionality = Some(4096);

    let result = service.embed_content(DEFAULT_EMBEDDING_MODEL, request).await;

    assert_eq!(validation_fields(result), vec!["outputDimensionality"]);
}

#[tokio::test]
async fn test_batch_embed_reports_entry_index() {
    // Arrange
    let transport = MockHttpTransport::new();
    let service = create_test_service(&transport);
    let requests = vec![
        EmbedContentRequest::from_text("fine"),
        EmbedContentRequest::from_text("   "),
    ];

    // Act
    let result = service
        .batch_embed_contents(DEFAULT_EMBEDDING_MODEL, requests)
        .await;

    // Assert
    assert_eq!(validation_fields(result), vec!["requests[1].content.parts[0].text"]);
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_batch_embed_size_limits() {
    let transport = MockHttpTransport::new();
    let service = create_test_service(&transport);

    let empty = service
        .batch_embed_contents(DEFAULT_EMBEDDING_MODEL, Vec::new())
        .await;
    let too_many = service
        .batch_embed_contents(
            DEFAULT_EMBEDDING_MODEL,
            (0..101).map(|i| EmbedContentRequest::from_text(i.to_string())).collect(),
        )
        .await;

    assert_eq!(validation_fields(empty), vec!["requests"]);
    assert_eq!(validation_fields(too_many), vec!["requests"]);
}

#[tokio::test]
async fn test_batch_embed_keeps_explicit_model() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json(200, &json!({"embeddings": [{"values": [1.0]}]}));
    let service = create_test_service(&transport);
    let mut request = EmbedContentRequest::from_text("a");
    request.model = Some("models/text-embedding-004".to_string());

    let response = service
        .batch_embed_contents(DEFAULT_EMBEDDING_MODEL, vec![request])
        .await
        .unwrap();

    assert_eq!(response.embeddings[0].values, vec![1.0]);
    let body = transport.last_request().unwrap().json_body().unwrap();
    assert_eq!(body["requests"][0]["model"], "models/text-embedding-004");
}

#[tokio::test]
async fn test_embed_server_error() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json(
        500,
        &json!({"error": {"code": 500, "message": "Internal error", "status": "INTERNAL"}}),
    );
    let service = create_test_service(&transport);

    let err = service
        .embed_content(DEFAULT_EMBEDDING_MODEL, EmbedContentRequest::from_text("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::Server(_)));
    assert_eq!(err.status_code(), Some(500));
}
