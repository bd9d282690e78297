//! Integration tests for models service.

use gemini_sdk::error::ResourceError;
use gemini_sdk::fixtures::load_fixture;
use gemini_sdk::mocks::MockHttpTransport;
use gemini_sdk::services::{ModelsService, ModelsServiceImpl};
use gemini_sdk::support::GenerationMethod;
use gemini_sdk::transport::HttpMethod;
use gemini_sdk::types::{ListModelsParams, PredictRequest};
use gemini_sdk::GeminiError;
use pretty_assertions::assert_eq;
use serde_json::json;

fn model_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "displayName": "Test Model",
        "inputTokenLimit": 1000,
        "outputTokenLimit": 100,
        "supportedGenerationMethods": ["generateContent"]
    })
}

#[tokio::test]
async fn test_list_models_success() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("models/list_models.json"));
    let service = ModelsServiceImpl::new(transport.context());

    // Act
    let page = service.list(None).await.unwrap();

    // Assert
    assert_eq!(page.models.len(), 2);
    assert_eq!(page.models[0].short_name(), "gemini-2.5-flash");
    assert_eq!(page.models[0].input_token_limit, Some(1_048_576));
    assert_eq!(page.models[0].thinking, Some(true));
    assert_eq!(page.next_page_token.as_deref(), Some("page-2"));

    let url = transport.last_request().unwrap().url;
    assert!(url.ends_with("/v1beta/models"), "{url}");
}

#[tokio::test]
async fn test_list_models_with_paging_params() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, r#"{"models": []}"#);
    let service = ModelsServiceImpl::new(transport.context());

    service
        .list(Some(ListModelsParams {
            page_size: Some(10),
            page_token: Some("abc".to_string()),
        }))
        .await
        .unwrap();

    transport.verify_request(0, HttpMethod::Get, "models?pageSize=10&pageToken=abc");
}

#[tokio::test]
async fn test_list_all_follows_page_tokens() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json(
        200,
        &json!({"models": [model_json("models/a")], "nextPageToken": "t1"}),
    );
    transport.enqueue_json(
        200,
        &json!({"models": [model_json("models/b")], "nextPageToken": ""}),
    );
    let service = ModelsServiceImpl::new(transport.context());

    // Act
    let models = service.list_all().await.unwrap();

    // Assert
    let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["models/a", "models/b"]);
    transport.verify_request_count(2);
    transport.verify_request(1, HttpMethod::Get, "pageToken=t1");
}

#[tokio::test]
async fn test_get_model_uses_cache() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json(200, &model_json("models/gemini-2.5-pro"));
    let service = ModelsServiceImpl::new(transport.context());

    // Act
    let first = service.get("gemini-2.5-pro").await.unwrap();
    let second = service.get("models/gemini-2.5-pro").await.unwrap();

    // Assert
    assert_eq!(first, second);
    assert!(first.supports(GenerationMethod::GENERATE_CONTENT));
    assert!(!first.supports(GenerationMethod::EMBED_CONTENT));
    transport.verify_request_count(1);
    transport.verify_request(0, HttpMethod::Get, "/v1beta/models/gemini-2.5-pro");
}

#[tokio::test]
async fn test_get_model_without_cache() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json(200, &model_json("models/gemini-2.5-pro"));
    transport.enqueue_json(200, &model_json("models/gemini-2.5-pro"));
    let service = ModelsServiceImpl::without_cache(transport.context());

    service.get("gemini-2.5-pro").await.unwrap();
    service.get("gemini-2.5-pro").await.unwrap();

    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json(200, &model_json("models/gemini-2.5-pro"));
    transport.enqueue_json(200, &model_json("models/gemini-2.5-pro"));
    let service = ModelsServiceImpl::new(transport.context());

    service.get("gemini-2.5-pro").await.unwrap();
    service.clear_cache();
    service.get("gemini-2.5-pro").await.unwrap();

    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_get_model_not_found() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(404, &load_fixture("errors/not_found.json"));
    let service = ModelsServiceImpl::new(transport.context());

    // Act
    let result = service.get("gemini-0.1-nope").await;

    // Assert
    assert_eq!(
        result.unwrap_err(),
        GeminiError::Resource(ResourceError::ModelNotFound {
            model: "models/gemini-0.1-nope".to_string()
        })
    );
}

#[tokio::test]
async fn test_get_model_rejects_empty_name() {
    let transport = MockHttpTransport::new();
    let service = ModelsServiceImpl::new(transport.context());

    let result = service.get("").await;

    assert!(matches!(result, Err(GeminiError::Request(_))));
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_predict() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json(200, &json!({"predictions": [{"bytesBase64Encoded": "AAA="}]}));
    let service = ModelsServiceImpl::new(transport.context());

    let response = service
        .predict(
            "imagen-4.0-generate-001",
            PredictRequest {
                instances: vec![json!({"prompt": "a lighthouse"})],
                parameters: Some(json!({"sampleCount": 1})),
            },
        )
        .await
        .unwrap();

    assert_eq!(response.predictions.len(), 1);
    transport.verify_request(0, HttpMethod::Post, "models/imagen-4.0-generate-001:predict");
    let body = transport.last_request().unwrap().json_body().unwrap();
    assert_eq!(body["instances"][0]["prompt"], "a lighthouse");
}

#[tokio::test]
async fn test_predict_long_running_returns_operation() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json(
        200,
        &json!({"name": "models/veo-3.0-generate-001/operations/op-1", "done": false}),
    );
    let service = ModelsServiceImpl::new(transport.context());

    let operation = service
        .predict_long_running(
            "veo-3.0-generate-001",
            PredictRequest {
                instances: vec![json!({"prompt": "waves"})],
                parameters: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(operation.name, "models/veo-3.0-generate-001/operations/op-1");
    assert!(!operation.done);
    transport.verify_request(
        0,
        HttpMethod::Post,
        "models/veo-3.0-generate-001:predictLongRunning",
    );
}
