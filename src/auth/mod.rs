//! API key authentication.

use secrecy::{ExposeSecret, SecretString};

use crate::config::{AuthMethod, GeminiConfig};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Query parameter carrying the API key.
pub const API_KEY_QUERY_PARAM: &str = "key";

/// Supplies credentials for outgoing requests.
pub trait AuthManager: Send + Sync {
    /// Header to attach, if the credential travels in a header.
    fn auth_header(&self) -> Option<(String, String)>;

    /// Query parameter to append, if the credential travels in the URL.
    fn auth_query_param(&self) -> Option<(String, String)>;
}

/// Attaches a static API key.
#[derive(Clone)]
pub struct ApiKeyAuthManager {
    api_key: SecretString,
    method: AuthMethod,
}

impl ApiKeyAuthManager {
    /// Manager for `api_key` using `method`.
    pub fn new(api_key: SecretString, method: AuthMethod) -> Self {
        Self { api_key, method }
    }

    /// Manager using the key and method of `config`.
    pub fn from_config(config: &GeminiConfig) -> Self {
        Self::new(config.api_key.clone(), config.auth_method)
    }
}

impl std::fmt::Debug for ApiKeyAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthManager")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl AuthManager for ApiKeyAuthManager {
    fn auth_header(&self) -> Option<(String, String)> {
        (self.method == AuthMethod::Header).then(|| {
            (
                API_KEY_HEADER.to_string(),
                self.api_key.expose_secret().clone(),
            )
        })
    }

    fn auth_query_param(&self) -> Option<(String, String)> {
        (self.method == AuthMethod::QueryParam).then(|| {
            (
                API_KEY_QUERY_PARAM.to_string(),
                self.api_key.expose_secret().clone(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_method() {
        let auth = ApiKeyAuthManager::new(SecretString::new("k1".into()), AuthMethod::Header);
        assert_eq!(
            auth.auth_header(),
            Some(("x-goog-api-key".to_string(), "k1".to_string()))
        );
        assert_eq!(auth.auth_query_param(), None);
    }

    #[test]
    fn test_query_method() {
        let auth = ApiKeyAuthManager::new(SecretString::new("k2".into()), AuthMethod::QueryParam);
        assert_eq!(auth.auth_header(), None);
        assert_eq!(
            auth.auth_query_param(),
            Some(("key".to_string(), "k2".to_string()))
        );
        assert!(!format!("{auth:?}").contains("k2"));
    }
}
