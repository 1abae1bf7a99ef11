//! Materials Project Client
//!
//! Issues the single outbound request the relay makes per search:
//!
//! ```text
//! GET {base}/materials/oxidation_states/?formula=..&_per_page=100&_skip=0
//!     &_limit=100&_all_fields=true&license=BY-C
//! X-API-KEY: <key>
//! Accept: application/json
//! ```
//!
//! The body is decoded as JSON whatever the status, and handed back together
//! with whether the status was a success. Mapping to relay responses happens
//! in the route handler.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

pub const OXIDATION_STATES_PATH: &str = "/materials/oxidation_states/";
pub const PAGE_SIZE: u32 = 100;
pub const LICENSE_FILTER: &str = "BY-C";

const API_KEY_HEADER: &str = "X-API-KEY";

/// Errors that can occur while talking to the Materials Project
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Materials Project request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode Materials Project response (status {status}): {message}")]
    Decode { status: u16, message: String },
}

/// Decoded upstream reply
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// Whether the upstream status was 2xx
    pub success: bool,
    /// Upstream status code, kept for logging only
    pub status: u16,
    /// Parsed JSON body
    pub body: Value,
}

/// Something that can answer an oxidation-state query by formula
#[async_trait]
pub trait OxidationStateSource: Send + Sync {
    async fn fetch(&self, formula: &str, api_key: &str) -> Result<UpstreamResponse, SourceError>;
}

/// `reqwest`-backed client for the Materials Project REST API
#[derive(Debug, Clone)]
pub struct MaterialsProjectClient {
    http: Client,
    base_url: String,
}

impl MaterialsProjectClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &crate::config::MaterialsConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, OXIDATION_STATES_PATH)
    }
}

#[async_trait]
impl OxidationStateSource for MaterialsProjectClient {
    async fn fetch(&self, formula: &str, api_key: &str) -> Result<UpstreamResponse, SourceError> {
        info!(formula = %formula, "Querying Materials Project oxidation states");

        let page_size = PAGE_SIZE.to_string();
        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("formula", formula),
                ("_per_page", page_size.as_str()),
                ("_skip", "0"),
                ("_limit", page_size.as_str()),
                ("_all_fields", "true"),
                ("license", LICENSE_FILTER),
            ])
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = bytes.len(), "Materials Project response received");

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        Ok(UpstreamResponse {
            success: status.is_success(),
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn query_matcher(formula: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("formula".into(), formula.into()),
            Matcher::UrlEncoded("_per_page".into(), "100".into()),
            Matcher::UrlEncoded("_skip".into(), "0".into()),
            Matcher::UrlEncoded("_limit".into(), "100".into()),
            Matcher::UrlEncoded("_all_fields".into(), "true".into()),
            Matcher::UrlEncoded("license".into(), "BY-C".into()),
        ])
    }

    #[tokio::test]
    async fn test_fetch_sends_filters_and_headers() {
        let mut server = Server::new_async().await;
        let body = r#"{"data":[{"material_id":"mp-1","formula_pretty":"CrO3"}],"meta":{"total_doc":1}}"#;

        let mock = server
            .mock("GET", "/materials/oxidation_states/")
            .match_query(query_matcher("CrO3"))
            .match_header("x-api-key", "test-key")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = MaterialsProjectClient::new(server.url());
        let response = client.fetch("CrO3", "test-key").await.unwrap();

        mock.assert_async().await;
        assert!(response.success);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, serde_json::from_str::<Value>(body).unwrap());
    }

    #[tokio::test]
    async fn test_fetch_encodes_wildcards() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/materials/oxidation_states/")
            .match_query(query_matcher("CrO*"))
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let client = MaterialsProjectClient::new(format!("{}/", server.url()));
        let response = client.fetch("CrO*", "k").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.body, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_fetch_reports_error_status_with_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/materials/oxidation_states/")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"detail":"invalid api key"}"#)
            .create_async()
            .await;

        let client = MaterialsProjectClient::new(server.url());
        let response = client.fetch("Fe2O3", "bad").await.unwrap();

        assert!(!response.success);
        assert_eq!(response.status, 403);
        assert_eq!(response.body, json!({"detail": "invalid api key"}));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_json_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/materials/oxidation_states/")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = MaterialsProjectClient::new(server.url());
        let err = client.fetch("Fe", "k").await.unwrap_err();

        assert!(matches!(err, SourceError::Decode { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = MaterialsProjectClient::new(format!("http://127.0.0.1:{}", port));
        let err = client.fetch("Fe", "k").await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)));
    }
}
