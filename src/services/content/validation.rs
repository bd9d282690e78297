//! Local checks run before content requests leave the process.

use crate::error::{GeminiResult, ValidationDetail};
use crate::services::context::validation_failure;
use crate::types::{
    Content, CountTokensRequest, GenerateContentRequest, GenerationConfig, Part, PartData,
};

/// Validates a `generateContent` body.
pub fn validate_generate_request(request: &GenerateContentRequest) -> GeminiResult<()> {
    let mut details = Vec::new();
    if request.contents.is_empty() && request.cached_content.is_none() {
        details.push(ValidationDetail::new("contents", "Contents array cannot be empty"));
    }
    for (i, content) in request.contents.iter().enumerate() {
        check_content(content, &format!("contents[{i}]"), &mut details);
    }
    if let Some(system) = &request.system_instruction {
        check_content(system, "systemInstruction", &mut details);
    }
    if let Some(config) = &request.generation_config {
        check_generation_config(config, &mut details);
    }
    validation_failure("Invalid generate content request", details)
}

/// Validates a `countTokens` body: exactly one of `contents` and
/// `generateContentRequest`.
pub fn validate_count_tokens_request(request: &CountTokensRequest) -> GeminiResult<()> {
    let mut details = Vec::new();
    match (request.contents.is_empty(), &request.generate_content_request) {
        (true, None) => details.push(ValidationDetail::new(
            "contents",
            "Either contents or generateContentRequest must be provided",
        )),
        (false, Some(_)) => details.push(ValidationDetail::new(
            "contents",
            "Only one of contents or generateContentRequest may be provided",
        )),
        _ => {}
    }
    for (i, content) in request.contents.iter().enumerate() {
        check_content(content, &format!("contents[{i}]"), &mut details);
    }
    validation_failure("Invalid count tokens request", details)
}

/// Model ids are `name` or `models/name`.
pub fn validate_model_name(model: &str) -> GeminiResult<()> {
    let id = model.strip_prefix("models/").unwrap_or(model);
    let mut details = Vec::new();
    if id.trim().is_empty() {
        details.push(ValidationDetail::new("model", "Model name must not be empty"));
    } else if id.contains('/') {
        details.push(ValidationDetail::new(
            "model",
            "Model name must be a bare id or start with 'models/'",
        ));
    }
    validation_failure("Invalid model name", details)
}

fn check_content(content: &Content, field: &str, details: &mut Vec<ValidationDetail>) {
    if content.parts.is_empty() {
        details.push(ValidationDetail::new(
            format!("{field}.parts"),
            "Content must have at least one part",
        ));
    }
    for (i, part) in content.parts.iter().enumerate() {
        check_part(part, &format!("{field}.parts[{i}]"), details);
    }
}

fn check_part(part: &Part, field: &str, details: &mut Vec<ValidationDetail>) {
    let problem = match &part.data {
        PartData::Text(text) if text.is_empty() && !part.is_thought() => Some("Text cannot be empty"),
        PartData::InlineData(blob) if blob.mime_type.is_empty() => Some("MIME type is required"),
        PartData::InlineData(blob) if blob.data.is_empty() => Some("Data cannot be empty"),
        PartData::FileData(file) if file.file_uri.is_empty() => Some("File URI is required"),
        PartData::FunctionCall(call) if call.name.is_empty() => Some("Function name is required"),
        PartData::FunctionResponse(response) if response.name.is_empty() => {
            Some("Function name is required")
        }
        PartData::ExecutableCode(code) if code.code.is_empty() => Some("Code cannot be empty"),
        _ => None,
    };
    if let Some(problem) = problem {
        details.push(ValidationDetail::new(field, problem));
    }
}

fn check_generation_config(config: &GenerationConfig, details: &mut Vec<ValidationDetail>) {
    let field = |name: &str| format!("generationConfig.{name}");
    if let Some(t) = config.temperature {
        if !(0.0..=2.0).contains(&t) {
            details.push(ValidationDetail::new(field("temperature"), "Temperature must be between 0.0 and 2.0"));
        }
    }
    if let Some(p) = config.top_p {
        if !(0.0..=1.0).contains(&p) {
            details.push(ValidationDetail::new(field("topP"), "topP must be between 0.0 and 1.0"));
        }
    }
    if config.top_k.is_some_and(|k| k < 1) {
        details.push(ValidationDetail::new(field("topK"), "topK must be at least 1"));
    }
    if config.max_output_tokens.is_some_and(|n| n < 1) {
        details.push(ValidationDetail::new(field("maxOutputTokens"), "maxOutputTokens must be at least 1"));
    }
    if config.candidate_count.is_some_and(|n| !(1..=8).contains(&n)) {
        details.push(ValidationDetail::new(field("candidateCount"), "candidateCount must be between 1 and 8"));
    }
    if config.response_schema.is_some() && config.response_json_schema.is_some() {
        details.push(ValidationDetail::new(
            field("responseSchema"),
            "responseSchema and responseJsonSchema are mutually exclusive",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeminiError, RequestError};
    use crate::types::Content;

    fn details(result: GeminiResult<()>) -> Vec<String> {
        match result {
            Err(GeminiError::Request(RequestError::ValidationError { details, .. })) => {
                details.into_iter().map(|d| d.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = GenerateContentRequest::from_text("hi");
        assert!(validate_generate_request(&request).is_ok());
    }

    #[test]
    fn test_collects_every_problem() {
        let mut request = GenerateContentRequest::new(vec![Content::user(), Content::user_text("")]);
        request.generation_config = Some(GenerationConfig {
            temperature: Some(3.0),
            candidate_count: Some(9),
            ..GenerationConfig::default()
        });

        let fields = details(validate_generate_request(&request));

        assert_eq!(
            fields,
            vec![
                "contents[0].parts",
                "contents[1].parts[0]",
                "generationConfig.temperature",
                "generationConfig.candidateCount",
            ]
        );
    }

    #[test]
    fn test_count_tokens_needs_exactly_one_source() {
        assert!(validate_count_tokens_request(&CountTokensRequest::from_text("x")).is_ok());
        assert_eq!(
            details(validate_count_tokens_request(&CountTokensRequest::default())),
            vec!["contents"]
        );
    }

    #[test]
    fn test_model_names() {
        assert!(validate_model_name("gemini-2.5-flash").is_ok());
        assert!(validate_model_name("models/gemini-2.5-flash").is_ok());
        assert!(validate_model_name("models/").is_err());
        assert!(validate_model_name("tunedModels/x/y").is_err());
    }
}
