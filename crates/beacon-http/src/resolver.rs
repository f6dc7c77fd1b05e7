//! Pointer-record reader over plain HTTP GET

use crate::{build_client, protocol_error, transport_error};
use async_trait::async_trait;
use beacon_core::traits::PointerResolver;
use beacon_core::config::is_placeholder;
use beacon_core::{Error, Result};
use std::time::Duration;

/// Reads the published address from a raw-content URL
///
/// The response body is the address itself, possibly surrounded by
/// whitespace or a trailing newline.
pub struct HttpResolver {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpResolver {
    /// Create a resolver with a bounded read timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            timeout,
        }
    }

    /// Fetch and trim the pointer payload
    async fn fetch(&self, location: &str) -> Result<String> {
        let url = validate_location(location)?;

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error("pointer read", &e))?;

        if !response.status().is_success() {
            return Err(protocol_error("pointer read", response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error("pointer read body", &e))?;

        let address = body.trim();
        if address.is_empty() {
            return Err(Error::Other("pointer record is empty".to_string()));
        }

        Ok(address.to_string())
    }
}

impl Default for HttpResolver {
    fn default() -> Self {
        Self::new(crate::DEFAULT_REQUEST_TIMEOUT)
    }
}

#[async_trait]
impl PointerResolver for HttpResolver {
    async fn resolve(&self, location: &str) -> Option<String> {
        match self.fetch(location).await {
            Ok(address) => {
                tracing::info!("Successfully retrieved dynamic address from pointer record: {}", address);
                Some(address)
            }
            Err(e) => {
                tracing::warn!(
                    "Could not retrieve dynamic address from {} (is the location correct? is there internet?): {}",
                    location,
                    e
                );
                None
            }
        }
    }
}

/// Check that a pointer location is a usable absolute http(s) URL
///
/// Fails fast with a configuration error, before any network call.
pub fn validate_location(location: &str) -> Result<reqwest::Url> {
    let location = location.trim();
    if location.is_empty() {
        return Err(Error::config("pointer location is empty"));
    }

    if is_placeholder(location) {
        return Err(Error::config(format!(
            "pointer location is still a template placeholder: {}",
            location
        )));
    }

    let url = reqwest::Url::parse(location)
        .map_err(|e| Error::config(format!("malformed pointer location '{}': {}", location, e)))?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        scheme => Err(Error::config(format!(
            "pointer location must be an http(s) URL, got scheme '{}'",
            scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw/current_url.txt"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    fn location(server: &MockServer) -> String {
        format!("{}/raw/current_url.txt", server.uri())
    }

    #[tokio::test]
    async fn resolves_trimmed_payload() {
        let server = serve(200, "  https://abc.ngrok.io\n").await;
        let resolver = HttpResolver::default();

        assert_eq!(
            resolver.resolve(&location(&server)).await.as_deref(),
            Some("https://abc.ngrok.io")
        );
    }

    #[tokio::test]
    async fn exact_payload_is_returned_unchanged() {
        let server = serve(200, "https://abc.ngrok.io").await;
        let resolver = HttpResolver::default();

        assert_eq!(
            resolver.resolve(&location(&server)).await,
            Some("https://abc.ngrok.io".to_string())
        );
    }

    #[tokio::test]
    async fn empty_payload_is_unavailable() {
        let server = serve(200, "").await;
        assert_eq!(HttpResolver::default().resolve(&location(&server)).await, None);

        let blank = serve(200, " \n\t ").await;
        assert_eq!(HttpResolver::default().resolve(&location(&blank)).await, None);
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let server = serve(500, "https://stale.ngrok.io").await;
        assert_eq!(HttpResolver::default().resolve(&location(&server)).await, None);
    }

    #[tokio::test]
    async fn slow_store_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("https://abc.ngrok.io")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let resolver = HttpResolver::new(Duration::from_millis(100));
        assert_eq!(resolver.resolve(&location(&server)).await, None);
    }

    #[tokio::test]
    async fn malformed_location_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("https://abc.ngrok.io"))
            .expect(0)
            .mount(&server)
            .await;

        let resolver = HttpResolver::default();
        assert_eq!(resolver.resolve("").await, None);
        assert_eq!(resolver.resolve("   ").await, None);
        assert_eq!(resolver.resolve("not a url").await, None);

        let wrong_scheme = location(&server).replacen("http://", "ftp://", 1);
        assert_eq!(resolver.resolve(&wrong_scheme).await, None);

        let template = format!("{}/YOUR_USERNAME/YOUR_GIST_ID/raw/YOUR_FILENAME", server.uri());
        assert_eq!(resolver.resolve(&template).await, None);
    }

    #[tokio::test]
    async fn redirected_pointer_is_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw/current_url.txt"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/real"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/real"))
            .respond_with(ResponseTemplate::new(200).set_body_string("https://abc.ngrok.io\n"))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            HttpResolver::default().resolve(&location(&server)).await,
            Some("https://abc.ngrok.io".to_string())
        );
    }

    #[test]
    fn validate_location_accepts_http_urls() {
        assert!(validate_location("https://gist.githubusercontent.com/u/id/raw/file").is_ok());
        assert!(validate_location("http://127.0.0.1:8080/raw").is_ok());
        assert!(validate_location("").unwrap_err().is_config());
        assert!(validate_location("mailto:someone@example.com").unwrap_err().is_config());
        assert!(
            validate_location("https://gist.githubusercontent.com/YOUR_USERNAME/YOUR_GIST_ID/raw/YOUR_FILENAME")
                .unwrap_err()
                .is_config()
        );
    }
}
