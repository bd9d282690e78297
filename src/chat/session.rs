//! Multi-turn conversations with automatic function calling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::builder::{stream_to_result, DEFAULT_MODEL};
use super::{FunctionRegistry, GenerationResult};
use crate::error::{ChatError, GeminiResult};
use crate::services::ContentService;
use crate::storage::ChatStorage;
use crate::support::{ResourceName, ResourceType, Uuid};
use crate::types::{
    Content, CountTokensRequest, FunctionResponse, GenerateContentRequest, GenerationConfig,
    HarmBlockThreshold, HarmCategory, Part, PartData, Role, SafetySetting, Tool,
};

/// Turns allowed per `send` before giving up on a function-calling loop.
pub const DEFAULT_MAX_FUNCTION_CALL_TURNS: usize = 10;

const FUNCTION_NOT_FOUND: &str = "Function execution failed or not found";

/// A conversation with one model.
///
/// The session owns its history. Every [`send`](Self::send) appends the user
/// turn, then the model's reply; when the reply calls registered functions
/// and `auto_reply` is on, their results are sent back until the model
/// answers in plain content.
pub struct ChatSession {
    content: Arc<dyn ContentService>,
    id: String,
    name: String,
    model: String,
    system_instruction: String,
    cached_content: String,
    history: Vec<Content>,
    tools: Vec<Tool>,
    functions: FunctionRegistry,
    auto_reply: bool,
    max_function_call_turns: usize,
    config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

/// Persisted form of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default)]
    system_instruction: String,
    #[serde(default)]
    history: Vec<Content>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl ChatSession {
    /// New session with a random id.
    pub fn new(content: Arc<dyn ContentService>, model: impl Into<String>) -> Self {
        Self {
            content,
            id: Uuid::generate().to_string(),
            name: String::new(),
            model: model.into(),
            system_instruction: String::new(),
            cached_content: String::new(),
            history: Vec::new(),
            tools: Vec::new(),
            functions: FunctionRegistry::new(),
            auto_reply: true,
            max_function_call_turns: DEFAULT_MAX_FUNCTION_CALL_TURNS,
            config: GenerationConfig::default(),
            safety_settings: Vec::new(),
        }
    }

    /// Session id, also the storage key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Model used for every turn.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Switches the model; history is kept.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Current system instruction, empty when unset.
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Sent with every turn; empty disables it.
    pub fn set_system_instruction(&mut self, text: impl Into<String>) {
        self.system_instruction = text.into();
    }

    /// Cached context reference, empty when unset.
    pub fn cached_content(&self) -> &str {
        &self.cached_content
    }

    /// Cached context id or `cachedContents/...` name; empty disables it.
    pub fn set_cached_content(&mut self, name: impl Into<String>) {
        self.cached_content = name.into();
    }

    /// Generation settings sent with each turn.
    pub fn generation_config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Mutable generation settings.
    pub fn generation_config_mut(&mut self) -> &mut GenerationConfig {
        &mut self.config
    }

    /// Replaces the generation settings.
    pub fn set_generation_config(&mut self, config: GenerationConfig) {
        self.config = config;
    }

    /// Adds a tool to every turn.
    pub fn add_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    /// Replaces the tools.
    pub fn set_tools(&mut self, tools: Vec<Tool>) {
        self.tools = tools;
    }

    /// Removes all tools; registered functions stay.
    pub fn clear_tools(&mut self) {
        self.tools.clear();
    }

    /// Adds a block threshold for one category.
    pub fn add_safety_setting(&mut self, category: HarmCategory, threshold: HarmBlockThreshold) {
        self.safety_settings
            .push(SafetySetting::new(category, threshold));
    }

    /// Replaces the safety settings.
    pub fn set_safety_settings(&mut self, settings: Vec<SafetySetting>) {
        self.safety_settings = settings;
    }

    /// Removes all safety settings.
    pub fn clear_safety_settings(&mut self) {
        self.safety_settings.clear();
    }

    /// Whether function calls are answered automatically.
    pub fn auto_reply(&self) -> bool {
        self.auto_reply
    }

    /// When off, function calls are returned to the caller untouched.
    pub fn set_auto_reply(&mut self, enabled: bool) {
        self.auto_reply = enabled;
    }

    /// Turn limit for one `send`.
    pub fn max_function_call_turns(&self) -> usize {
        self.max_function_call_turns
    }

    /// Sets the turn limit for one `send`.
    pub fn set_max_function_call_turns(&mut self, turns: usize) {
        self.max_function_call_turns = turns;
    }

    /// Functions answered automatically.
    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Mutable function registry.
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Conversation so far.
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Forgets the conversation.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Drops the last exchange: the latest user message and everything after
    /// it. Returns `false` when there is no user message.
    pub fn rewind(&mut self) -> bool {
        let last_user = self
            .history
            .iter()
            .rposition(|content| content.role == Some(Role::User));
        match last_user {
            Some(index) => {
                self.history.truncate(index);
                true
            }
            None => false,
        }
    }

    /// Sends a user text turn.
    pub async fn send(&mut self, text: impl Into<String>) -> GenerationResult {
        self.send_content(Content::user_text(text)).await
    }

    /// Sends any content and runs the function-calling loop.
    pub async fn send_content(&mut self, content: Content) -> GenerationResult {
        self.history.push(content);

        for _ in 0..self.max_function_call_turns {
            let result = self.generate_turn().await;
            if !result.success || !self.auto_reply {
                return result;
            }

            let calls: Vec<_> = result.function_calls().into_iter().cloned().collect();
            if calls.is_empty() {
                return result;
            }

            let mut reply = Content::function();
            for call in calls {
                let response = self.functions.invoke(&call.name, &call.args).unwrap_or_else(|| {
                    tracing::error!(function = %call.name, "function invocation failed");
                    json!({"error": FUNCTION_NOT_FOUND})
                });
                reply.parts.push(Part::new(PartData::FunctionResponse(FunctionResponse {
                    id: call.id,
                    ..FunctionResponse::new(call.name, response)
                })));
            }
            self.history.push(reply);
        }

        let err = ChatError::MaxFunctionCallTurnsExceeded {
            limit: self.max_function_call_turns,
        };
        tracing::warn!(session = %self.id, error = %err, "function calling stopped");
        GenerationResult::failure(err.to_string(), 0)
    }

    /// Streams a user text turn. Function calls are not answered here.
    pub async fn send_stream<F>(&mut self, text: impl Into<String>, on_text: F) -> GenerationResult
    where
        F: FnMut(&str) + Send,
    {
        self.send_stream_content(Content::user_text(text), on_text).await
    }

    /// Streams any content.
    pub async fn send_stream_content<F>(&mut self, content: Content, mut on_text: F) -> GenerationResult
    where
        F: FnMut(&str) + Send,
    {
        self.history.push(content);
        let request = self.request();
        let result = stream_to_result(self.content.as_ref(), &self.model, request, &mut on_text).await;
        if result.success {
            self.history.push(result.content.clone());
        }
        result
    }

    /// Token count of `text` for this session's model.
    pub async fn count_text_tokens(&self, text: &str) -> GeminiResult<i32> {
        let response = self
            .content
            .count_tokens(&self.model, CountTokensRequest::from_text(text))
            .await?;
        Ok(response.total_tokens)
    }

    /// `{id, name, model, systemInstruction, history}`.
    pub fn to_json(&self) -> GeminiResult<Value> {
        let document = SessionDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            history: self.history.clone(),
        };
        Ok(serde_json::to_value(document)?)
    }

    /// Restores a session saved with [`to_json`](Self::to_json). A missing
    /// id gets a fresh one; a missing model falls back to `gemini-2.5-flash`.
    pub fn from_json(content: Arc<dyn ContentService>, value: &Value) -> GeminiResult<Self> {
        let document = SessionDocument::deserialize(value)?;
        let mut session = Self::new(content, document.model);
        if !document.id.is_empty() {
            session.id = document.id;
        }
        session.name = document.name;
        session.system_instruction = document.system_instruction;
        session.history = document.history;
        Ok(session)
    }

    /// Writes the session under its id.
    pub async fn save(&self, storage: &dyn ChatStorage) -> GeminiResult<()> {
        storage.save(&self.id, &self.to_json()?).await
    }

    /// Reads a session back; `None` when `id` is not stored.
    pub async fn load(
        content: Arc<dyn ContentService>,
        storage: &dyn ChatStorage,
        id: &str,
    ) -> GeminiResult<Option<Self>> {
        match storage.load(id).await? {
            Some(document) => Self::from_json(content, &document).map(Some),
            None => Ok(None),
        }
    }

    async fn generate_turn(&mut self) -> GenerationResult {
        let request = self.request();
        let outcome = self.content.generate_content(&self.model, request).await;
        let result = GenerationResult::from_outcome(outcome);
        if result.success {
            self.history.push(result.content.clone());
        }
        result
    }

    fn request(&self) -> GenerateContentRequest {
        let mut request = GenerateContentRequest::new(self.history.clone());
        if !self.system_instruction.is_empty() {
            request.system_instruction = Some(Content::system_text(&self.system_instruction));
        }
        if !self.cached_content.is_empty() {
            request.cached_content = Some(ResourceName::new(
                ResourceType::CachedContents,
                &self.cached_content,
            ));
        }
        if self.config != GenerationConfig::default() {
            request.generation_config = Some(self.config.clone());
        }
        request.safety_settings = self.safety_settings.clone();
        request.tools = self.tools.clone();
        request.tools.extend(self.functions.tool());
        request
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("model", &self.model)
            .field("history", &self.history.len())
            .field("functions", &self.functions)
            .finish_non_exhaustive()
    }
}
