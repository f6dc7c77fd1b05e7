// # GitHub Gist Pointer Store
//
// This crate writes the pointer record: one file inside one gist whose
// content is the current tunnel address.
//
// ## Behaviour
//
// - One PATCH per publish, no retry (the publisher retries next cycle)
// - Bearer credential on every request, never logged
// - Non-2xx responses are returned as protocol errors carrying the body
//
// ## API Reference
//
// ```http
// PATCH /gists/:gist_id
// Authorization: Bearer <token>
// Accept: application/vnd.github.v3+json
//
// { "files": { "<filename>": { "content": "<address>" } } }
// ```

use async_trait::async_trait;
use beacon_core::traits::PointerWriter;
use beacon_core::{Error, PublisherConfig, Result};
use beacon_http::{build_client, protocol_error, transport_error};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Media type requested from the GitHub API
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Body of a gist update
#[derive(Debug, Serialize)]
struct GistUpdate<'a> {
    files: BTreeMap<&'a str, GistFileContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GistFileContent<'a> {
    content: &'a str,
}

/// Pointer writer backed by a GitHub Gist
pub struct GistPointerStore {
    /// API base URL (e.g. https://api.github.com)
    api_base: String,

    /// Gist holding the pointer record
    gist_id: String,

    /// File inside the gist
    filename: String,

    /// Bearer credential
    /// ⚠️ NEVER log this value
    token: String,

    /// HTTP client
    client: reqwest::Client,

    /// Bound on each write
    timeout: Duration,
}

// Custom Debug implementation that hides the token
impl fmt::Debug for GistPointerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GistPointerStore")
            .field("api_base", &self.api_base)
            .field("gist_id", &self.gist_id)
            .field("filename", &self.filename)
            .field("token", &"<REDACTED>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GistPointerStore {
    /// Create a writer for `filename` in gist `gist_id`
    pub fn new(
        api_base: impl Into<String>,
        gist_id: impl Into<String>,
        filename: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            gist_id: gist_id.into(),
            filename: filename.into(),
            token: token.into(),
            client: build_client(timeout),
            timeout,
        }
    }

    /// Reject a write that cannot possibly succeed
    fn check_target(&self) -> Result<()> {
        if self.gist_id.trim().is_empty() {
            return Err(Error::config("gist id is empty"));
        }
        if self.filename.trim().is_empty() {
            return Err(Error::config("gist filename is empty"));
        }
        if self.token.trim().is_empty() {
            return Err(Error::config("GitHub token is empty"));
        }
        Ok(())
    }

    /// URL of the gist resource
    fn gist_url(&self) -> String {
        format!("{}/gists/{}", self.api_base, self.gist_id)
    }

    /// Payload replacing the file content with `address`
    fn payload<'a>(&'a self, address: &'a str) -> GistUpdate<'a> {
        let mut files = BTreeMap::new();
        files.insert(self.filename.as_str(), GistFileContent { content: address });
        GistUpdate { files }
    }
}

#[async_trait]
impl PointerWriter for GistPointerStore {
    async fn publish(&self, address: &str) -> Result<()> {
        self.check_target()?;
        tracing::info!("Attempting to update gist {} with new address: {}", self.gist_id, address);

        let response = self
            .client
            .patch(self.gist_url())
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .json(&self.payload(address))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error("gist update", &e))?;

        if !response.status().is_success() {
            return Err(protocol_error("gist update", response).await);
        }

        tracing::debug!("Gist {} accepted the update", self.gist_id);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "GitHub Gist"
    }
}

impl From<&PublisherConfig> for GistPointerStore {
    fn from(config: &PublisherConfig) -> Self {
        Self::new(
            config.gist_api_base.clone(),
            config.gist_id.clone(),
            config.gist_filename.clone(),
            config.token.clone(),
            config.write_timeout(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> GistPointerStore {
        GistPointerStore::new(
            server.uri(),
            "abc123",
            "current_url.txt",
            "ghp_test_token",
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn publish_patches_the_file_content() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/gists/abc123"))
            .and(header("authorization", "Bearer ghp_test_token"))
            .and(header("accept", GITHUB_ACCEPT))
            .and(body_json(serde_json::json!({
                "files": { "current_url.txt": { "content": "https://abc.ngrok.io" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "abc123"})))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).publish("https://abc.ngrok.io").await.unwrap();
    }

    #[tokio::test]
    async fn rejected_write_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"Bad credentials"}"#),
            )
            .mount(&server)
            .await;

        let err = store(&server).publish("https://abc.ngrok.io").await.unwrap_err();
        match err {
            Error::Protocol { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Bad credentials"), "message: {}", message);
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_api_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let store = GistPointerStore::new(
            format!("http://127.0.0.1:{}", port),
            "abc123",
            "current_url.txt",
            "ghp_test_token",
            Duration::from_secs(2),
        );
        assert!(matches!(
            store.publish("https://abc.ngrok.io").await,
            Err(Error::Transport(_))
        ));
    }

    #[tokio::test]
    async fn missing_credentials_make_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = GistPointerStore::new(
            server.uri(),
            "abc123",
            "current_url.txt",
            "",
            Duration::from_secs(2),
        );
        let err = store.publish("https://abc.ngrok.io").await.unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn debug_redacts_token() {
        let store = GistPointerStore::new(
            "https://api.github.com/",
            "abc123",
            "current_url.txt",
            "ghp_test_token",
            Duration::from_secs(2),
        );
        let rendered = format!("{:?}", store);
        assert!(!rendered.contains("ghp_test_token"));
        assert_eq!(store.gist_url(), "https://api.github.com/gists/abc123");
    }

    #[test]
    fn from_config_uses_configured_api_base() {
        let config = PublisherConfig {
            gist_id: "xyz".to_string(),
            gist_filename: "url.txt".to_string(),
            token: "t0ken".to_string(),
            gist_api_base: "http://localhost:9999".to_string(),
            ..PublisherConfig::default()
        };
        let store = GistPointerStore::from(&config);
        assert_eq!(store.gist_url(), "http://localhost:9999/gists/xyz");
        assert_eq!(store.timeout, Duration::from_secs(10));
    }
}
