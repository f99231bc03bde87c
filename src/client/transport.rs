//! HTTP transport shared by the auth and API clients
//!
//! Every request goes through [`HttpTransport::execute`], which:
//!
//! - sends JSON with `Content-Type: application/json`
//! - attaches `Authorization: Bearer <token>` when a token is stored and the
//!   call is not anonymous
//! - on HTTP 401 clears the stored token and fails with
//!   [`SynapseError::Unauthorized`]
//! - on any other non-2xx fails with [`SynapseError::Api`], carrying the
//!   body's `message` or the per-operation fallback

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Result, SynapseError, SESSION_EXPIRED_MESSAGE};
use crate::session::token_store::TokenStore;

/// Whether a request carries the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Never attach a token (register, login)
    Anonymous,
    /// Attach the stored token when there is one
    Bearer,
}

/// Error body returned by the backend on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// JSON-over-HTTP transport with bearer authentication
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl HttpTransport {
    /// Create a transport for the configured backend
    ///
    /// # Errors
    ///
    /// Returns [`SynapseError::Config`] if the base URL cannot be parsed or
    /// the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            SynapseError::Config(format!("Invalid api.base_url {}: {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("synapse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SynapseError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized HTTP transport: base_url={}", base_url);

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token store shared with the auth client
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Build the URL for a list of path segments
    ///
    /// Segments are percent-encoded, so identifiers can be passed as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use synapse::client::HttpTransport;
    /// use synapse::config::ApiConfig;
    /// use synapse::session::token_store::MemoryTokenStore;
    ///
    /// let config = ApiConfig { base_url: "http://localhost:5000/".into(), timeout_seconds: 5 };
    /// let transport = HttpTransport::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();
    /// let url = transport.endpoint(&["api", "ai", "chat", "a b"]).unwrap();
    /// assert_eq!(url.as_str(), "http://localhost:5000/api/ai/chat/a%20b");
    /// ```
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                SynapseError::Config(format!("Base URL cannot carry a path: {}", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// GET with the session token attached
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str], fallback: &str) -> Result<T> {
        self.execute(Method::GET, segments, None, Auth::Bearer, fallback)
            .await
    }

    /// POST a JSON body
    pub async fn post<B, T>(
        &self,
        segments: &[&str],
        body: &B,
        auth: Auth,
        fallback: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, segments, Some(body), auth, fallback)
            .await
    }

    /// DELETE with the session token attached
    pub async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        fallback: &str,
    ) -> Result<T> {
        self.execute(Method::DELETE, segments, None, Auth::Bearer, fallback)
            .await
    }

    /// Send a request and decode the JSON response
    ///
    /// `fallback` is the message used when a failure response carries no
    /// `message` of its own.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
        auth: Auth,
        fallback: &str,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json");

        let mut sent_token = false;
        if auth == Auth::Bearer {
            match self.tokens.load() {
                Ok(Some(token)) => {
                    request = request.bearer_auth(token);
                    sent_token = true;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to read session token: {}", e),
            }
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", method, url, e);
            SynapseError::Network(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} {} returned 401, clearing session token", method, url);
            if let Err(e) = self.tokens.clear() {
                tracing::warn!("Failed to clear session token: {}", e);
            }
            let message = if sent_token {
                SESSION_EXPIRED_MESSAGE.to_string()
            } else {
                Self::error_message(response, fallback).await
            };
            return Err(SynapseError::Unauthorized(message).into());
        }

        if !status.is_success() {
            let message = Self::error_message(response, fallback).await;
            tracing::warn!("{} {} returned {}: {}", method, url, status, message);
            return Err(SynapseError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!("Failed to decode response from {}: {}", url, e);
            SynapseError::InvalidResponse(e.to_string()).into()
        })
    }

    async fn error_message(response: Response, fallback: &str) -> String {
        response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token_store::MemoryTokenStore;

    fn transport(base: &str) -> HttpTransport {
        let config = ApiConfig {
            base_url: base.to_string(),
            timeout_seconds: 5,
        };
        HttpTransport::new(&config, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let t = transport("http://localhost:5000");
        let url = t.endpoint(&["api", "auth", "login"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/auth/login");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let t = transport("https://example.com/backend/");
        let url = t.endpoint(&["api", "health"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/api/health");
    }

    #[test]
    fn test_endpoint_escapes_identifiers() {
        let t = transport("http://localhost:5000");
        let url = t.endpoint(&["api", "ai", "conversations", "../x"]).unwrap();
        assert!(!url.path().contains("/../"));
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            timeout_seconds: 5,
        };
        assert!(HttpTransport::new(&config, Arc::new(MemoryTokenStore::new())).is_err());
    }
}
