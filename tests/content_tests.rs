//! Integration tests for content generation service.

use bytes::Bytes;
use futures::StreamExt;
use gemini_sdk::chat::GenerationResult;
use gemini_sdk::error::{ContentError, RequestError};
use gemini_sdk::fixtures::load_fixture;
use gemini_sdk::mocks::{MockHttpTransport, MOCK_API_KEY};
use gemini_sdk::services::{ContentService, ContentServiceImpl};
use gemini_sdk::transport::HttpMethod;
use gemini_sdk::types::{
    Content, CountTokensRequest, FinishReason, GenerateContentRequest, GenerationConfig,
    HarmBlockThreshold, HarmCategory, SafetySetting,
};
use gemini_sdk::GeminiError;
use pretty_assertions::assert_eq;
use serde_json::json;

/// Helper to create a test content service with mock transport.
fn create_test_service(transport: &MockHttpTransport) -> ContentServiceImpl {
    ContentServiceImpl::new(transport.context())
}

#[tokio::test]
async fn test_generate_content_success() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/success_response.json"));
    let service = create_test_service(&transport);
    let request = GenerateContentRequest::from_text("Why is the sky blue?");

    // Act
    let response = service.generate_content("gemini-2.5-flash", request).await.unwrap();

    // Assert
    assert_eq!(response.candidates.len(), 1);
    assert_eq!(response.candidates[0].finish_reason, Some(FinishReason::Stop));
    assert!(response.text().starts_with("The sky looks blue"));

    let usage = response.usage_metadata.unwrap();
    assert_eq!(usage.prompt_token_count, 8);
    assert_eq!(usage.candidates_token_count, Some(15));
    assert_eq!(usage.total_token_count, 27);

    transport.verify_request_count(1);
    transport.verify_request(
        0,
        HttpMethod::Post,
        "/v1beta/models/gemini-2.5-flash:generateContent",
    );
    transport.verify_header(0, "x-goog-api-key", MOCK_API_KEY);
}

#[tokio::test]
async fn test_qualified_model_name_is_not_prefixed_twice() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/success_response.json"));
    let service = create_test_service(&transport);

    service
        .generate_content("models/gemini-2.5-pro", GenerateContentRequest::from_text("hi"))
        .await
        .unwrap();

    let url = transport.last_request().unwrap().url;
    assert!(url.contains("/models/gemini-2.5-pro:generateContent"), "{url}");
    assert!(!url.contains("models/models/"), "{url}");
}

#[tokio::test]
async fn test_generation_config_and_safety_serialized_in_camel_case() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/success_response.json"));
    let service = create_test_service(&transport);
    let mut request = GenerateContentRequest::from_text("Hello");
    request.system_instruction = Some(Content::system_text("Be terse."));
    request.generation_config = Some(GenerationConfig {
        temperature: Some(0.7),
        top_p: Some(0.9),
        top_k: Some(40),
        max_output_tokens: Some(2048),
        stop_sequences: vec!["END".to_string()],
        ..GenerationConfig::default()
    });
    request.safety_settings = vec![SafetySetting::new(
        HarmCategory::HarmCategoryDangerousContent,
        HarmBlockThreshold::BlockLowAndAbove,
    )];

    // Act
    service.generate_content("gemini-2.5-flash", request).await.unwrap();

    // Assert
    let body = transport.last_request().unwrap().json_body().unwrap();
    assert_eq!(body["contents"][0], json!({"role": "user", "parts": [{"text": "Hello"}]}));
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be terse.");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    assert_eq!(body["generationConfig"]["topK"], 40);
    assert_eq!(body["generationConfig"]["stopSequences"], json!(["END"]));
    assert_eq!(
        body["safetySettings"][0],
        json!({"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_LOW_AND_ABOVE"})
    );
}

#[tokio::test]
async fn test_default_generation_config_applies_only_when_absent() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/success_response.json"));
    transport.enqueue_json_response(200, &load_fixture("content/success_response.json"));
    let service = create_test_service(&transport).with_default_generation_config(GenerationConfig {
        temperature: Some(0.1),
        ..GenerationConfig::default()
    });

    service
        .generate_content("gemini-2.5-flash", GenerateContentRequest::from_text("a"))
        .await
        .unwrap();
    let mut explicit = GenerateContentRequest::from_text("b");
    explicit.generation_config = Some(GenerationConfig {
        temperature: Some(1.5),
        ..GenerationConfig::default()
    });
    service.generate_content("gemini-2.5-flash", explicit).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].json_body().unwrap()["generationConfig"]["temperature"], 0.1);
    assert_eq!(requests[1].json_body().unwrap()["generationConfig"]["temperature"], 1.5);
}

#[tokio::test]
async fn test_validation_failure_sends_nothing() {
    // Arrange
    let transport = MockHttpTransport::new();
    let service = create_test_service(&transport);
    let mut request = GenerateContentRequest::new(vec![]);
    request.generation_config = Some(GenerationConfig {
        temperature: Some(5.0),
        ..GenerationConfig::default()
    });

    // Act
    let result = service.generate_content("gemini-2.5-flash", request).await;

    // Assert
    match result {
        Err(GeminiError::Request(RequestError::ValidationError { details, .. })) => {
            let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
            assert_eq!(fields, vec!["contents", "generationConfig.temperature"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_invalid_model_name_rejected() {
    let transport = MockHttpTransport::new();
    let service = create_test_service(&transport);

    let result = service
        .generate_content("tunedModels/x/y", GenerateContentRequest::from_text("hi"))
        .await;

    assert!(matches!(result, Err(GeminiError::Request(_))));
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_prompt_blocked_for_safety() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/safety_blocked.json"));
    let service = create_test_service(&transport);

    // Act
    let result = service
        .generate_content("gemini-2.5-flash", GenerateContentRequest::from_text("..."))
        .await;

    // Assert
    match result {
        Err(GeminiError::Content(ContentError::SafetyBlocked { reason, .. })) => {
            assert_eq!(reason, "HARM_CATEGORY_DANGEROUS_CONTENT (HIGH)");
        }
        other => panic!("expected safety block, got {other:?}"),
    }
}

#[tokio::test]
async fn test_safety_block_reads_as_failed_generation_result() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/safety_blocked.json"));
    let service = create_test_service(&transport);

    let outcome = service
        .generate_content("gemini-2.5-flash", GenerateContentRequest::from_text("..."))
        .await;
    let result = GenerationResult::from_outcome(outcome);

    assert!(!result.success);
    assert_eq!(result.status_code, 200);
    assert!(result.error_message.starts_with("Blocked by Safety Filter"));
}

#[tokio::test]
async fn test_candidate_recitation_is_reported() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json(
        200,
        &json!({"candidates": [{"finishReason": "RECITATION", "index": 0}]}),
    );
    let service = create_test_service(&transport);

    let result = service
        .generate_content("gemini-2.5-flash", GenerateContentRequest::from_text("sing"))
        .await;

    assert!(matches!(
        result,
        Err(GeminiError::Content(ContentError::RecitationBlocked { .. }))
    ));
}

#[tokio::test]
async fn test_rate_limit_error() {
    let transport = MockHttpTransport::new();
    transport.enqueue_with_headers(
        429,
        &load_fixture("errors/rate_limit.json"),
        &[("Retry-After", "7")],
    );
    let service = create_test_service(&transport);

    let err = service
        .generate_content("gemini-2.5-flash", GenerateContentRequest::from_text("hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiError::RateLimit(_)));
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(7)));
    assert_eq!(err.status_code(), Some(429));
}

#[tokio::test]
async fn test_count_tokens() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/count_tokens.json"));
    let service = create_test_service(&transport);

    // Act
    let response = service
        .count_tokens("gemini-2.5-flash", CountTokensRequest::from_text("How many tokens?"))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.total_tokens, 31);
    transport.verify_request(0, HttpMethod::Post, "models/gemini-2.5-flash:countTokens");
    let body = transport.last_request().unwrap().json_body().unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "How many tokens?");
}

#[tokio::test]
async fn test_count_tokens_requires_input() {
    let transport = MockHttpTransport::new();
    let service = create_test_service(&transport);

    let result = service
        .count_tokens("gemini-2.5-flash", CountTokensRequest::default())
        .await;

    assert!(matches!(result, Err(GeminiError::Request(_))));
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_generate_content_stream() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_streaming_response(vec![
        Bytes::from_static(b"[{\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"One \"}]}}]}"),
        Bytes::from_static(b",\r\n{\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"two\"}]},\"finishReason\":\"STOP\"}],"),
        Bytes::from_static(b"\"usageMetadata\":{\"promptTokenCount\":2,\"totalTokenCount\":4}}]"),
    ]);
    let service = create_test_service(&transport);

    // Act
    let stream = service
        .generate_content_stream("gemini-2.5-flash", GenerateContentRequest::from_text("count"))
        .await
        .unwrap();
    let chunks: Vec<_> = stream.collect().await;

    // Assert
    assert_eq!(chunks.len(), 2);
    let texts: Vec<String> = chunks.iter().map(|c| c.as_ref().unwrap().text()).collect();
    assert_eq!(texts, vec!["One ", "two"]);
    transport.verify_request(
        0,
        HttpMethod::Post,
        "models/gemini-2.5-flash:streamGenerateContent",
    );
}

#[tokio::test]
async fn test_generation_result_from_fixture() {
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, &load_fixture("content/success_response.json"));
    let service = create_test_service(&transport);

    let outcome = service
        .generate_content("gemini-2.5-flash", GenerateContentRequest::from_text("hi"))
        .await;
    let result = GenerationResult::from_outcome(outcome);

    assert!(result.success);
    assert_eq!(result.input_tokens, 8);
    assert_eq!(result.output_tokens, 19);
    assert_eq!(result.total_tokens, 27);
    assert_eq!(result.finish_reason, Some(FinishReason::Stop));
}
