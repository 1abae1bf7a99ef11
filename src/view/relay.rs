//! Relay Client
//!
//! Calls `GET {relay}/api/oxidation-state?query=..` and extracts the `data`
//! array the way the search page does.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{MaterialRecord, SearchResponse};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data.";

/// Failures surfaced to the user. `Display` is the text the view shows.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay answered with a non-success status
    #[error("{}", FETCH_FAILED_MESSAGE)]
    Status { status: u16, error: Option<Value> },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response from relay: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        Self::new(config.relay_url.clone())
    }

    /// An explicit URL wins; otherwise `load` supplies the configured relay.
    /// `load` only runs when no URL is given.
    pub fn resolve<F>(relay_url: Option<String>, load: F) -> anyhow::Result<Self>
    where
        F: FnOnce() -> anyhow::Result<crate::config::Config>,
    {
        match relay_url {
            Some(url) => Ok(Self::new(url)),
            None => Ok(Self::from_config(&load()?.client)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn search(&self, query: &str) -> Result<Vec<MaterialRecord>, RelayError> {
        let url = format!("{}/api/oxidation-state", self.base_url);
        let response = self.http.get(url).query(&[("query", query)]).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let error = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|body| body.get("error").cloned());
            warn!(status = status.as_u16(), error = ?error, "Relay returned an error");
            return Err(RelayError::Status {
                status: status.as_u16(),
                error,
            });
        }

        let body: SearchResponse =
            serde_json::from_slice(&bytes).map_err(|e| RelayError::Decode(e.to_string()))?;
        debug!(count = body.data.len(), "Relay search completed");
        Ok(body.data)
    }
}
