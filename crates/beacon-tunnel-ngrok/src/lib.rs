// # ngrok Tunnel Source
//
// This crate queries the ngrok agent's local API for its active tunnels and
// reports the public URL of the first HTTPS tunnel.
//
// ## API Reference
//
// - List tunnels: GET `http://127.0.0.1:4040/api/tunnels`
//
// ```json
// {
//   "tunnels": [
//     { "proto": "https", "public_url": "https://abc.ngrok.io", ... },
//     { "proto": "http",  "public_url": "http://abc.ngrok.io",  ... }
//   ]
// }
// ```
//
// Unknown fields are ignored. A query failure is returned as an error; the
// publisher logs it and retries on its next cycle.

use async_trait::async_trait;
use beacon_core::traits::TunnelSource;
use beacon_core::Result;
use beacon_http::{build_client, protocol_error, transport_error};
use serde::Deserialize;
use std::time::Duration;

/// Default timeout for the local API query
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Protocol of the tunnel whose address is published
const SECURE_PROTO: &str = "https";

/// Response of the tunnel listing endpoint
#[derive(Debug, Default, Deserialize)]
struct TunnelList {
    #[serde(default)]
    tunnels: Vec<TunnelDescriptor>,
}

/// One active tunnel
#[derive(Debug, Deserialize)]
struct TunnelDescriptor {
    #[serde(default)]
    proto: String,
    #[serde(default)]
    public_url: Option<String>,
}

/// Tunnel source backed by the ngrok local API
pub struct NgrokTunnelSource {
    /// Tunnel listing endpoint
    api_url: String,

    /// HTTP client
    client: reqwest::Client,

    /// Bound on the local query
    timeout: Duration,
}

impl NgrokTunnelSource {
    /// Create a source for the listing endpoint at `api_url`
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_url: api_url.into(),
            client: build_client(timeout),
            timeout,
        }
    }

    /// Fetch the tunnel listing
    async fn list_tunnels(&self) -> Result<TunnelList> {
        let response = self
            .client
            .get(&self.api_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error("ngrok API", &e))?;

        if !response.status().is_success() {
            return Err(protocol_error("ngrok API", response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error("ngrok API body", &e))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Pick the public URL of the first secure tunnel
fn first_secure_address(list: &TunnelList) -> Option<String> {
    list.tunnels
        .iter()
        .find(|t| t.proto == SECURE_PROTO)
        .and_then(|t| t.public_url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl TunnelSource for NgrokTunnelSource {
    async fn current_address(&self) -> Result<Option<String>> {
        let list = self.list_tunnels().await?;
        tracing::debug!("ngrok reports {} active tunnel(s)", list.tunnels.len());
        Ok(first_secure_address(&list))
    }

    fn source_name(&self) -> &'static str {
        "ngrok"
    }
}

impl From<&beacon_core::PublisherConfig> for NgrokTunnelSource {
    fn from(config: &beacon_core::PublisherConfig) -> Self {
        Self::new(config.tunnel_api_url.clone(), config.tunnel_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::Error;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_for(template: ResponseTemplate) -> (MockServer, NgrokTunnelSource) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tunnels"))
            .respond_with(template)
            .mount(&server)
            .await;
        let source = NgrokTunnelSource::new(
            format!("{}/api/tunnels", server.uri()),
            Duration::from_secs(2),
        );
        (server, source)
    }

    #[tokio::test]
    async fn picks_first_https_tunnel() {
        let body = serde_json::json!({
            "tunnels": [
                { "name": "cmd (http)", "proto": "http", "public_url": "http://abc.ngrok.io" },
                { "name": "cmd", "proto": "https", "public_url": "https://abc.ngrok.io" },
                { "name": "other", "proto": "https", "public_url": "https://def.ngrok.io" }
            ],
            "uri": "/api/tunnels"
        });
        let (_server, source) = source_for(ResponseTemplate::new(200).set_body_json(body)).await;

        assert_eq!(
            source.current_address().await.unwrap(),
            Some("https://abc.ngrok.io".to_string())
        );
    }

    #[tokio::test]
    async fn no_secure_tunnel_is_none() {
        let body = serde_json::json!({
            "tunnels": [{ "proto": "tcp", "public_url": "tcp://0.tcp.ngrok.io:12345" }]
        });
        let (_server, source) = source_for(ResponseTemplate::new(200).set_body_json(body)).await;
        assert_eq!(source.current_address().await.unwrap(), None);

        let (_server, empty) =
            source_for(ResponseTemplate::new(200).set_body_json(serde_json::json!({}))).await;
        assert_eq!(empty.current_address().await.unwrap(), None);
    }

    #[tokio::test]
    async fn api_error_is_protocol_error() {
        let (_server, source) = source_for(ResponseTemplate::new(502)).await;
        let err = source.current_address().await.unwrap_err();
        assert!(matches!(err, Error::Protocol { status: 502, .. }));
    }

    #[tokio::test]
    async fn garbage_body_is_json_error() {
        let (_server, source) =
            source_for(ResponseTemplate::new(200).set_body_string("<html>")).await;
        assert!(matches!(source.current_address().await, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn agent_not_running_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let source = NgrokTunnelSource::new(
            format!("http://127.0.0.1:{}/api/tunnels", port),
            Duration::from_secs(2),
        );
        assert!(matches!(source.current_address().await, Err(Error::Transport(_))));
    }
}
