//! Fluent construction of one-shot generation requests.

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;

use super::GenerationResult;
use crate::error::{GeminiError, GeminiResult};
use crate::services::content::check_safety;
use crate::services::ContentService;
use crate::streaming::StreamAccumulator;
use crate::support::{AspectRatio, ImageSize, ResourceName, ResourceType};
use crate::types::{
    Blob, Content, GenerateContentRequest, GenerationConfig, HarmBlockThreshold, HarmCategory,
    ImageConfig, LatLng, Part, PartData, RetrievalConfig, SafetySetting, ThinkingConfig,
    ThinkingLevel, Tool, ToolConfig,
};

/// Model used when none is given.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const JSON_MIME_TYPE: &str = "application/json";

/// Builds and sends a single `generateContent` request.
///
/// Errors from input helpers such as [`image`](Self::image) are held until
/// [`build`](Self::build), so the chain never breaks.
///
/// ```no_run
/// # async fn demo(client: &dyn gemini_sdk::GeminiClient) {
/// let result = client
///     .request()
///     .model("gemini-2.5-flash")
///     .system_instruction("Answer in one sentence.")
///     .text("Why is the sky blue?")
///     .temperature(0.2)
///     .generate()
///     .await;
/// println!("{}", result.text());
/// # }
/// ```
pub struct GenerateRequestBuilder {
    content: Arc<dyn ContentService>,
    model: String,
    request: GenerateContentRequest,
    prompt: Content,
    config: GenerationConfig,
    deferred: Option<GeminiError>,
}

impl GenerateRequestBuilder {
    /// Builder sending through `content`.
    pub fn new(content: Arc<dyn ContentService>) -> Self {
        Self {
            content,
            model: DEFAULT_MODEL.to_string(),
            request: GenerateContentRequest::default(),
            prompt: Content::user(),
            config: GenerationConfig::default(),
            deferred: None,
        }
    }

    /// Target model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// System instruction.
    #[must_use]
    pub fn system_instruction(mut self, text: impl Into<String>) -> Self {
        self.request.system_instruction = Some(Content::system_text(text));
        self
    }

    /// Appends a text part to the prompt.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.prompt.parts.push(Part::text(text));
        self
    }

    /// Appends a local image (or any media file) as inline data.
    #[must_use]
    pub fn image(mut self, path: impl AsRef<Path>) -> Self {
        match Blob::from_path(path) {
            Ok(blob) => self.prompt.parts.push(Part::new(PartData::InlineData(blob))),
            Err(err) => self.defer(err),
        }
        self
    }

    /// Appends a reference to an uploaded file.
    #[must_use]
    pub fn file_uri(mut self, uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        self.prompt = self.prompt.with_file_uri(uri, Some(mime_type.into()));
        self
    }

    /// Enables Google Search grounding.
    #[must_use]
    pub fn google_search(self) -> Self {
        self.tool(Tool::google_search())
    }

    /// Enables code execution.
    #[must_use]
    pub fn code_execution(self) -> Self {
        self.tool(Tool::code_execution())
    }

    /// Enables Google Maps grounding.
    #[must_use]
    pub fn google_maps(self, enable_widget: bool) -> Self {
        self.tool(Tool::google_maps(enable_widget))
    }

    /// Enables URL context.
    #[must_use]
    pub fn url_context(self) -> Self {
        self.tool(Tool::url_context())
    }

    /// Adds any tool.
    #[must_use]
    pub fn tool(mut self, tool: Tool) -> Self {
        self.request.tools.push(tool);
        self
    }

    /// Replaces the tool config.
    #[must_use]
    pub fn tool_config(mut self, config: ToolConfig) -> Self {
        self.request.tool_config = Some(config);
        self
    }

    /// Uses a cached context; bare ids are qualified.
    #[must_use]
    pub fn cached_content(mut self, id: &str) -> Self {
        self.request.cached_content = Some(ResourceName::new(ResourceType::CachedContents, id));
        self
    }

    /// User location for Maps and Search grounding.
    #[must_use]
    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        let config = self.request.tool_config.get_or_insert_with(ToolConfig::default);
        config
            .retrieval_config
            .get_or_insert_with(RetrievalConfig::default)
            .lat_lng = Some(LatLng {
            latitude,
            longitude,
        });
        self
    }

    /// Asks for a JSON response.
    #[must_use]
    pub fn json_mode(mut self) -> Self {
        self.config.response_mime_type = Some(JSON_MIME_TYPE.to_string());
        self
    }

    /// Structured output. Implies JSON unless a MIME type is already set.
    #[must_use]
    pub fn response_schema(mut self, schema: Value) -> Self {
        self.config.response_schema = Some(schema);
        if self.config.response_mime_type.is_none() {
            self.config.response_mime_type = Some(JSON_MIME_TYPE.to_string());
        }
        self
    }

    /// Sampling temperature.
    #[must_use]
    pub fn temperature(mut self, value: f32) -> Self {
        self.config.temperature = Some(value);
        self
    }

    /// Nucleus sampling threshold.
    #[must_use]
    pub fn top_p(mut self, value: f32) -> Self {
        self.config.top_p = Some(value);
        self
    }

    /// Top-k sampling.
    #[must_use]
    pub fn top_k(mut self, value: i32) -> Self {
        self.config.top_k = Some(value);
        self
    }

    /// Output token cap.
    #[must_use]
    pub fn max_tokens(mut self, value: i32) -> Self {
        self.config.max_output_tokens = Some(value);
        self
    }

    /// Number of candidates to generate.
    #[must_use]
    pub fn candidate_count(mut self, value: i32) -> Self {
        self.config.candidate_count = Some(value);
        self
    }

    /// Replaces the stop sequences.
    #[must_use]
    pub fn stop_sequences<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.stop_sequences = sequences.into_iter().map(Into::into).collect();
        self
    }

    /// Fixed decoding seed.
    #[must_use]
    pub fn seed(mut self, value: i32) -> Self {
        self.config.seed = Some(value);
        self
    }

    /// Thinking token budget; `0` disables thinking, `-1` lets the model decide.
    #[must_use]
    pub fn thinking_budget(mut self, budget: i32) -> Self {
        self.thinking().thinking_budget = Some(budget);
        self
    }

    /// Thinking depth for models that take a level instead of a budget.
    #[must_use]
    pub fn thinking_level(mut self, level: ThinkingLevel) -> Self {
        self.thinking().thinking_level = Some(level);
        self
    }

    /// Adds a block threshold for one category.
    #[must_use]
    pub fn safety(mut self, category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        self.request
            .safety_settings
            .push(SafetySetting::new(category, threshold));
        self
    }

    /// Image output shape.
    #[must_use]
    pub fn image_config(mut self, aspect_ratio: AspectRatio, image_size: ImageSize) -> Self {
        self.config.image_config = Some(ImageConfig {
            aspect_ratio: Some(aspect_ratio),
            image_size: Some(image_size),
        });
        self
    }

    /// Target model.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Assembles the request, failing with the first deferred input error.
    pub fn build(&self) -> GeminiResult<GenerateContentRequest> {
        if let Some(err) = &self.deferred {
            return Err(err.clone());
        }
        let mut request = self.request.clone();
        if !self.prompt.parts.is_empty() {
            request.contents.push(self.prompt.clone());
        }
        if self.config != GenerationConfig::default() {
            request.generation_config = Some(self.config.clone());
        }
        Ok(request)
    }

    /// Sends the request.
    pub async fn generate(self) -> GenerationResult {
        let request = match self.build() {
            Ok(request) => request,
            Err(err) => return GenerationResult::from_outcome(Err(err)),
        };
        let outcome = self.content.generate_content(&self.model, request).await;
        GenerationResult::from_outcome(outcome)
    }

    /// Streams the request, handing each text delta to `on_text`; the
    /// returned result holds the merged response.
    pub async fn stream<F>(self, mut on_text: F) -> GenerationResult
    where
        F: FnMut(&str) + Send,
    {
        let request = match self.build() {
            Ok(request) => request,
            Err(err) => return GenerationResult::from_outcome(Err(err)),
        };
        stream_to_result(self.content.as_ref(), &self.model, request, &mut on_text).await
    }

    fn thinking(&mut self) -> &mut ThinkingConfig {
        self.config
            .thinking_config
            .get_or_insert_with(ThinkingConfig::default)
    }

    fn defer(&mut self, err: GeminiError) {
        if self.deferred.is_none() {
            self.deferred = Some(err);
        }
    }
}

/// Drains a generation stream into a [`GenerationResult`].
pub(crate) async fn stream_to_result(
    content: &dyn ContentService,
    model: &str,
    request: GenerateContentRequest,
    on_text: &mut (dyn FnMut(&str) + Send + '_),
) -> GenerationResult {
    let mut stream = match content.generate_content_stream(model, request).await {
        Ok(stream) => stream,
        Err(err) => return GenerationResult::from_outcome(Err(err)),
    };

    let mut accumulator = StreamAccumulator::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                let delta = chunk.text();
                if !delta.is_empty() {
                    on_text(&delta);
                }
                accumulator.add_chunk(chunk);
            }
            Err(err) => {
                tracing::warn!(model, error = %err, "stream interrupted");
                return GenerationResult::from_outcome(Err(err));
            }
        }
    }

    let response = accumulator.finalize();
    GenerationResult::from_outcome(check_safety(&response).map(|()| response))
}
