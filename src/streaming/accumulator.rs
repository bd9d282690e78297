//! Folds streamed chunks into one response.

use crate::types::{Candidate, Content, GenerateContentResponse, Part, PartData};

/// Merges `streamGenerateContent` chunks.
///
/// Candidates are matched by `index` (or position when absent). Within a
/// candidate, text parts at the same position are concatenated as long as
/// they agree on being thoughts; other parts are appended. Metadata follows
/// last-wins.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    response: GenerateContentResponse,
    chunks: usize,
}

impl StreamAccumulator {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks added so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Merges one chunk.
    pub fn add_chunk(&mut self, chunk: GenerateContentResponse) {
        self.chunks += 1;
        let GenerateContentResponse {
            candidates,
            prompt_feedback,
            usage_metadata,
            model_version,
            response_id,
        } = chunk;

        replace_if_some(&mut self.response.prompt_feedback, prompt_feedback);
        replace_if_some(&mut self.response.usage_metadata, usage_metadata);
        replace_if_some(&mut self.response.model_version, model_version);
        replace_if_some(&mut self.response.response_id, response_id);

        for (position, candidate) in candidates.into_iter().enumerate() {
            let slot = self.response.candidates.iter().position(|existing| {
                match (existing.index, candidate.index) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            });
            let slot = slot.or_else(|| {
                (candidate.index.is_none() && position < self.response.candidates.len())
                    .then_some(position)
            });
            match slot {
                Some(i) => merge_candidate(&mut self.response.candidates[i], candidate),
                None => self.response.candidates.push(candidate),
            }
        }
    }

    /// Text accumulated so far for the first candidate.
    pub fn text(&self) -> String {
        self.response.text()
    }

    /// The merged response.
    pub fn finalize(self) -> GenerateContentResponse {
        self.response
    }
}

fn replace_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn merge_candidate(existing: &mut Candidate, incoming: Candidate) {
    if let Some(new) = incoming.content {
        match existing.content.as_mut() {
            Some(current) => merge_content(current, new),
            None => existing.content = Some(new),
        }
    }
    replace_if_some(&mut existing.finish_reason, incoming.finish_reason);
    replace_if_some(&mut existing.finish_message, incoming.finish_message);
    replace_if_some(&mut existing.citation_metadata, incoming.citation_metadata);
    replace_if_some(&mut existing.grounding_metadata, incoming.grounding_metadata);
    replace_if_some(&mut existing.url_context_metadata, incoming.url_context_metadata);
    replace_if_some(&mut existing.token_count, incoming.token_count);
    replace_if_some(&mut existing.avg_logprobs, incoming.avg_logprobs);
    replace_if_some(&mut existing.logprobs_result, incoming.logprobs_result);
    if !incoming.safety_ratings.is_empty() {
        existing.safety_ratings = incoming.safety_ratings;
    }
    if !incoming.grounding_attributions.is_empty() {
        existing.grounding_attributions = incoming.grounding_attributions;
    }
}

fn merge_content(existing: &mut Content, incoming: Content) {
    if incoming.role.is_some() {
        existing.role = incoming.role;
    }
    for (i, part) in incoming.parts.into_iter().enumerate() {
        match existing.parts.get_mut(i) {
            Some(current) if can_concatenate(current, &part) => append_text(current, part),
            _ => existing.parts.push(part),
        }
    }
}

fn can_concatenate(current: &Part, incoming: &Part) -> bool {
    matches!(
        (&current.data, &incoming.data),
        (PartData::Text(_), PartData::Text(_))
    ) && current.is_thought() == incoming.is_thought()
}

fn append_text(current: &mut Part, incoming: Part) {
    if let (PartData::Text(text), PartData::Text(more)) = (&mut current.data, incoming.data) {
        text.push_str(&more);
    }
    replace_if_some(&mut current.thought_signature, incoming.thought_signature);
}
