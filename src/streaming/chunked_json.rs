//! Incremental parser for `streamGenerateContent` bodies.
//!
//! The body is one JSON array, `[{...},\r\n{...}]`, delivered in arbitrary
//! slices. Bytes are buffered until a whole object is available, so
//! objects and multi-byte characters may be split anywhere.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::Stream;

use crate::error::{GeminiError, GeminiResult, ResponseError};
use crate::types::GenerateContentResponse;

/// Byte source for [`GeminiChunkParser`].
pub type ByteStream = Pin<Box<dyn Stream<Item = GeminiResult<Bytes>> + Send>>;

/// Stream of typed chunks decoded from a byte stream.
pub struct GeminiChunkParser {
    inner: ByteStream,
    buffer: Vec<u8>,
    ready: VecDeque<GeminiResult<GenerateContentResponse>>,
    terminated: bool,
}

impl GeminiChunkParser {
    /// Parser over `inner`.
    pub fn new(inner: ByteStream) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            ready: VecDeque::new(),
            terminated: false,
        }
    }

    /// Parser with no source, fed manually through [`feed`](Self::feed).
    pub fn detached() -> Self {
        Self::new(Box::pin(futures::stream::empty()))
    }

    /// Appends `data` and returns every object it completes.
    pub fn feed(&mut self, data: &[u8]) -> Vec<GeminiResult<GenerateContentResponse>> {
        self.buffer.extend_from_slice(data);
        self.extract_all();
        self.ready.drain(..).collect()
    }

    /// Reports bytes left over after the source ended.
    pub fn finish(&mut self) -> Option<GeminiResult<GenerateContentResponse>> {
        self.skip_separators();
        if self.buffer.is_empty() {
            return None;
        }
        let preview = String::from_utf8_lossy(&self.buffer[..self.buffer.len().min(64)]).into_owned();
        self.buffer.clear();
        Some(Err(ResponseError::StreamInterrupted {
            message: format!("stream ended inside a chunk: {preview}"),
        }
        .into()))
    }

    fn extract_all(&mut self) {
        loop {
            self.skip_separators();
            match self.buffer.first() {
                None => return,
                Some(b'{') => {}
                Some(_) => {
                    let preview = String::from_utf8_lossy(&self.buffer[..self.buffer.len().min(64)]).into_owned();
                    self.buffer.clear();
                    self.ready.push_back(Err(ResponseError::MalformedChunk {
                        message: format!("unexpected data in stream: {preview}"),
                    }
                    .into()));
                    return;
                }
            }
            let Some(end) = object_end(&self.buffer) else {
                return;
            };
            let object: Vec<u8> = self.buffer.drain(..=end).collect();
            let parsed = serde_json::from_slice::<GenerateContentResponse>(&object).map_err(|e| {
                GeminiError::from(ResponseError::MalformedChunk {
                    message: format!("failed to decode chunk: {e}"),
                })
            });
            self.ready.push_back(parsed);
        }
    }

    fn skip_separators(&mut self) {
        let skip = self
            .buffer
            .iter()
            .take_while(|b| b.is_ascii_whitespace() || matches!(b, b'[' | b']' | b','))
            .count();
        self.buffer.drain(..skip);
    }
}

/// Index of the brace closing the object that starts at `bytes[0]`.
///
/// Structural characters are ASCII, so scanning bytes is safe for UTF-8.
fn object_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl Stream for GeminiChunkParser {
    type Item = GeminiResult<GenerateContentResponse>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(item) = this.ready.pop_front() {
                if item.is_err() {
                    this.terminated = true;
                    this.ready.clear();
                }
                return Poll::Ready(Some(item));
            }
            if this.terminated {
                return Poll::Ready(None);
            }
            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.extend_from_slice(&bytes);
                    this.extract_all();
                }
                Poll::Ready(Some(Err(err))) => {
                    this.terminated = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    this.terminated = true;
                    return Poll::Ready(this.finish());
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn chunk(text: &str) -> String {
        format!(r#"{{"candidates":[{{"content":{{"role":"model","parts":[{{"text":"{text}"}}]}}}}]}}"#)
    }

    #[test]
    fn test_object_end_ignores_braces_in_strings() {
        let input = br#"{"a":"} \" {","b":[{}]} trailing"#;
        assert_eq!(object_end(input), Some(22));
        assert_eq!(object_end(br#"{"a":"#), None);
    }

    #[test]
    fn test_feed_across_arbitrary_splits() {
        let body = format!("[{},\r\n{}]", chunk("Hel"), chunk("lo"));
        let mut parser = GeminiChunkParser::detached();

        let mut texts = Vec::new();
        for piece in body.as_bytes().chunks(7) {
            for result in parser.feed(piece) {
                texts.push(result.unwrap().text());
            }
        }

        assert_eq!(texts, vec!["Hel".to_string(), "lo".to_string()]);
        assert!(parser.finish().is_none());
    }

    #[tokio::test]
    async fn test_split_multibyte_character() {
        let body = format!("[{}]", chunk("héllo ✓"));
        let bytes = body.into_bytes();
        let split = bytes.iter().position(|b| *b == 0xC3).unwrap() + 1;
        let parts: Vec<GeminiResult<Bytes>> = vec![
            Ok(Bytes::copy_from_slice(&bytes[..split])),
            Ok(Bytes::copy_from_slice(&bytes[split..])),
        ];

        let mut parser = GeminiChunkParser::new(Box::pin(futures::stream::iter(parts)));
        let first = parser.next().await.unwrap().unwrap();

        assert_eq!(first.text(), "héllo ✓");
        assert!(parser.next().await.is_none());
    }

    #[tokio::test]
    async fn test_truncated_stream_is_an_error() {
        let parts: Vec<GeminiResult<Bytes>> = vec![Ok(Bytes::from(format!("[{},{{\"cand", chunk("a"))))];
        let mut parser = GeminiChunkParser::new(Box::pin(futures::stream::iter(parts)));

        assert!(parser.next().await.unwrap().is_ok());
        let err = parser.next().await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            GeminiError::Response(ResponseError::StreamInterrupted { .. })
        ));
        assert!(parser.next().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_array() {
        let parts: Vec<GeminiResult<Bytes>> = vec![Ok(Bytes::from_static(b"[]"))];
        let mut parser = GeminiChunkParser::new(Box::pin(futures::stream::iter(parts)));
        assert!(parser.next().await.is_none());
    }
}
