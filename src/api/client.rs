// SPDX-License-Identifier: MPL-2.0
//! Authenticated HTTP layer shared by every endpoint.

use super::error::ApiError;
use super::session::SessionStore;
use crate::error::{Error, Result};
use reqwest::Method;
use std::sync::Arc;

const USER_AGENT: &str = concat!("IcedGallery/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a shared [`reqwest::Client`] that knows the service's
/// base URL and attaches the bearer token from the session store when one is
/// present. Cloning is cheap; clones share the connection pool and session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Builds a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Api(ApiError::Transport(e.to_string())))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Whether a persisted session exists (not necessarily still valid).
    pub fn has_session(&self) -> bool {
        self.session.access().is_some()
    }

    /// Resolves an endpoint path (`/api/...`) against the base URL.
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolves a content URL from a record; the service may return either
    /// absolute URLs or server-relative media paths.
    pub fn content_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.endpoint_url(path));
        if let Some(token) = self.session.access() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Sends a prepared request and maps any non-success outcome onto
    /// [`ApiError`].
    pub(crate) async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> std::result::Result<reqwest::Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    /// Sends a request and deserializes a JSON success body.
    pub(crate) async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> std::result::Result<T, ApiError> {
        let response = self.execute(builder).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("invalid response body: {}", e)))
    }

    /// Downloads raw bytes from a (possibly server-relative) content URL.
    pub async fn fetch_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, ApiError> {
        let mut builder = self.http.get(self.content_url(url));
        if let Some(token) = self.session.access() {
            builder = builder.bearer_auth(token);
        }

        let response = self.execute(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_session", &self.has_session())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::MemorySessionStore;

    fn client_for(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(MemorySessionStore::new())).expect("failed to build client")
    }

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let client = client_for("http://localhost:8000///");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn content_url_passes_absolute_urls_through() {
        let client = client_for("http://localhost:8000");
        assert_eq!(
            client.content_url("https://cdn.example.org/media/1.jpg"),
            "https://cdn.example.org/media/1.jpg"
        );
    }

    #[test]
    fn content_url_resolves_relative_media_paths() {
        let client = client_for("http://localhost:8000");
        assert_eq!(
            client.content_url("/media/cat.jpg"),
            "http://localhost:8000/media/cat.jpg"
        );
        assert_eq!(
            client.content_url("media/cat.jpg"),
            "http://localhost:8000/media/cat.jpg"
        );
    }

    #[test]
    fn has_session_reflects_store_state() {
        use crate::api::session::{SessionStore, TokenPair};

        let store = Arc::new(MemorySessionStore::new());
        let client = ApiClient::new("http://localhost:8000", store.clone())
            .expect("failed to build client");
        assert!(!client.has_session());

        store
            .store(TokenPair {
                access: "a".into(),
                refresh: "r".into(),
            })
            .unwrap();
        assert!(client.has_session());
    }
}
