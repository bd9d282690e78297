use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use super::validation::{validate_count_tokens_request, validate_generate_request, validate_model_name};
use super::{ContentService, ContentStream};
use crate::error::{ContentError, GeminiResult, SafetyRatingInfo};
use crate::services::context::ServiceContext;
use crate::streaming::GeminiChunkParser;
use crate::transport::{endpoints, HttpMethod};
use crate::types::{
    BlockReason, CountTokensRequest, CountTokensResponse, FinishReason, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, SafetyRating, SafetySetting,
};

/// [`ContentService`] over the REST API.
#[derive(Clone)]
pub struct ContentServiceImpl {
    context: ServiceContext,
    default_generation_config: Option<GenerationConfig>,
    default_safety_settings: Vec<SafetySetting>,
}

impl ContentServiceImpl {
    /// Service using `context`.
    pub fn new(context: ServiceContext) -> Self {
        Self {
            context,
            default_generation_config: None,
            default_safety_settings: Vec::new(),
        }
    }

    /// Generation config applied when a request carries none.
    #[must_use]
    pub fn with_default_generation_config(mut self, config: GenerationConfig) -> Self {
        self.default_generation_config = Some(config);
        self
    }

    /// Safety settings applied when a request carries none.
    #[must_use]
    pub fn with_default_safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.default_safety_settings = settings;
        self
    }

    fn apply_defaults(&self, mut request: GenerateContentRequest) -> GenerateContentRequest {
        if request.generation_config.is_none() {
            request.generation_config = self.default_generation_config.clone();
        }
        if request.safety_settings.is_empty() {
            request.safety_settings = self.default_safety_settings.clone();
        }
        request
    }

    fn log_usage(&self, model: &str, response: &GenerateContentResponse, started: Instant) {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &response.usage_metadata {
            Some(usage) => self.context.logger().info(
                "content generated",
                json!({
                    "model": model,
                    "duration_ms": elapsed_ms,
                    "prompt_tokens": usage.prompt_token_count,
                    "output_tokens": usage.candidates_token_count.unwrap_or(0),
                    "total_tokens": usage.total_token_count,
                    "cached_tokens": usage.cached_content_token_count.unwrap_or(0),
                    "candidates": response.candidates.len(),
                }),
            ),
            None => self.context.logger().info(
                "content generated",
                json!({"model": model, "duration_ms": elapsed_ms, "candidates": response.candidates.len()}),
            ),
        }
    }
}

fn rating_info(ratings: &[SafetyRating]) -> Vec<SafetyRatingInfo> {
    ratings
        .iter()
        .map(|r| SafetyRatingInfo {
            category: r.category.to_string(),
            probability: r.probability.to_string(),
        })
        .collect()
}

fn describe(ratings: &[SafetyRating], fallback: &str) -> String {
    ratings
        .iter()
        .max_by_key(|r| r.probability)
        .map_or_else(|| fallback.to_string(), |r| format!("{} ({})", r.category, r.probability))
}

/// Fails when the prompt or any candidate was stopped by a content filter.
pub fn check_safety(response: &GenerateContentResponse) -> GeminiResult<()> {
    if let Some(feedback) = &response.prompt_feedback {
        match feedback.block_reason {
            Some(BlockReason::Safety | BlockReason::ImageSafety) => {
                return Err(ContentError::SafetyBlocked {
                    reason: describe(&feedback.safety_ratings, "prompt blocked"),
                    safety_ratings: rating_info(&feedback.safety_ratings),
                }
                .into());
            }
            Some(BlockReason::Blocklist | BlockReason::ProhibitedContent) => {
                return Err(ContentError::ProhibitedContent.into());
            }
            Some(BlockReason::Other | BlockReason::BlockReasonUnspecified) => {
                return Err(ContentError::SafetyBlocked {
                    reason: "prompt blocked".to_string(),
                    safety_ratings: rating_info(&feedback.safety_ratings),
                }
                .into());
            }
            None => {}
        }
    }

    for candidate in &response.candidates {
        match candidate.finish_reason {
            Some(FinishReason::Safety | FinishReason::ImageSafety) => {
                return Err(ContentError::SafetyBlocked {
                    reason: describe(&candidate.safety_ratings, "candidate blocked"),
                    safety_ratings: rating_info(&candidate.safety_ratings),
                }
                .into());
            }
            Some(FinishReason::Recitation) => {
                return Err(ContentError::RecitationBlocked {
                    safety_ratings: rating_info(&candidate.safety_ratings),
                }
                .into());
            }
            Some(FinishReason::Blocklist | FinishReason::ProhibitedContent | FinishReason::Spii) => {
                return Err(ContentError::ProhibitedContent.into());
            }
            _ => {}
        }
    }
    Ok(())
}

#[async_trait]
impl ContentService for ContentServiceImpl {
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        validate_model_name(model)?;
        validate_generate_request(&request)?;
        let started = Instant::now();
        let request = self.apply_defaults(request);

        let http = self.context.builder().json_request(
            HttpMethod::Post,
            &endpoints::generate_content(model),
            Some(&request),
        )?;
        let response: GenerateContentResponse = self.context.execute(http).await?;

        if let Err(err) = check_safety(&response) {
            tracing::warn!(model, error = %err, "generation blocked");
            self.context
                .logger()
                .warn("generation blocked", json!({"model": model, "error": err.to_string()}));
            return Err(err);
        }
        self.log_usage(model, &response, started);
        Ok(response)
    }

    async fn generate_content_stream(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> GeminiResult<ContentStream> {
        validate_model_name(model)?;
        validate_generate_request(&request)?;
        let request = self.apply_defaults(request);

        let http = self
            .context
            .builder()
            .build_streaming_request(&endpoints::stream_generate_content(model), &request)?;
        let bytes = self.context.open_stream(http).await?;
        self.context
            .logger()
            .debug("stream opened", json!({"model": model}));
        Ok(Box::pin(GeminiChunkParser::new(bytes)))
    }

    async fn count_tokens(
        &self,
        model: &str,
        request: CountTokensRequest,
    ) -> GeminiResult<CountTokensResponse> {
        validate_model_name(model)?;
        validate_count_tokens_request(&request)?;

        let http = self.context.builder().json_request(
            HttpMethod::Post,
            &endpoints::count_tokens(model),
            Some(&request),
        )?;
        let response: CountTokensResponse = self.context.execute(http).await?;
        self.context.logger().debug(
            "tokens counted",
            json!({"model": model, "total_tokens": response.total_tokens}),
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeminiError;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_prompt_block_reports_worst_rating() {
        let blocked = response(json!({
            "promptFeedback": {
                "blockReason": "SAFETY",
                "safetyRatings": [
                    {"category": "HARM_CATEGORY_HARASSMENT", "probability": "LOW"},
                    {"category": "HARM_CATEGORY_HATE_SPEECH", "probability": "HIGH"}
                ]
            }
        }));

        match check_safety(&blocked) {
            Err(GeminiError::Content(ContentError::SafetyBlocked { reason, safety_ratings })) => {
                assert_eq!(reason, "HARM_CATEGORY_HATE_SPEECH (HIGH)");
                assert_eq!(safety_ratings.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_candidate_finish_reasons() {
        let recited = response(json!({"candidates": [{"finishReason": "RECITATION"}]}));
        assert!(matches!(
            check_safety(&recited),
            Err(GeminiError::Content(ContentError::RecitationBlocked { .. }))
        ));

        let fine = response(json!({"candidates": [{"finishReason": "MAX_TOKENS"}]}));
        assert!(check_safety(&fine).is_ok());
    }
}
