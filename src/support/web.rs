use std::fmt;

use url::form_urlencoded;

/// Root endpoint families of the Generative Language API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointType {
    /// Regular JSON REST calls.
    Rest,
    /// Media uploads.
    Upload,
}

impl EndpointType {
    /// Base URL including the API version and a trailing slash.
    pub fn base(self) -> &'static str {
        match self {
            EndpointType::Rest => "https://generativelanguage.googleapis.com/v1beta/",
            EndpointType::Upload => "https://generativelanguage.googleapis.com/upload/v1beta/",
        }
    }
}

/// URL assembled from a base, path segments and query parameters.
///
/// ```
/// use gemini_sdk::support::Url;
///
/// let url = Url::new("https://example.com/v1beta")
///     .with_path("files")
///     .add_query("pageSize", "10")
///     .add_query("alt", "");
/// assert_eq!(url.as_str(), "https://example.com/v1beta/files?pageSize=10&alt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url {
    value: String,
}

impl Url {
    /// Wraps `base` verbatim.
    pub fn new(base: impl Into<String>) -> Self {
        Self { value: base.into() }
    }

    /// Starts from an endpoint family's base URL.
    pub fn endpoint(endpoint: EndpointType) -> Self {
        Self::new(endpoint.base())
    }

    /// Appends a path segment, keeping exactly one `/` at the joint.
    ///
    /// Existing query parameters are preserved after the path.
    #[must_use]
    pub fn with_path(mut self, segment: &str) -> Self {
        let (path, query) = match self.value.split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (self.value.clone(), None),
        };
        let segment = segment.trim_start_matches('/');
        let mut joined = path.trim_end_matches('/').to_string();
        if !segment.is_empty() {
            joined.push('/');
            joined.push_str(segment);
        }
        if let Some(query) = query {
            joined.push('?');
            joined.push_str(&query);
        }
        self.value = joined;
        self
    }

    /// Appends `key=value`; an empty value appends the bare key.
    #[must_use]
    pub fn add_query(mut self, key: &str, value: &str) -> Self {
        self.value.push(if self.value.contains('?') { '&' } else { '?' });
        self.value
            .extend(form_urlencoded::byte_serialize(key.as_bytes()));
        if !value.is_empty() {
            self.value.push('=');
            self.value
                .extend(form_urlencoded::byte_serialize(value.as_bytes()));
        }
        self
    }

    /// Appends `key=value` only when `value` is present.
    #[must_use]
    pub fn add_optional_query<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.add_query(key, &v.to_string()),
            None => self,
        }
    }

    /// The assembled URL.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Parses into a [`url::Url`].
    pub fn parse(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&self.value)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<Url> for String {
    fn from(url: Url) -> Self {
        url.value
    }
}
