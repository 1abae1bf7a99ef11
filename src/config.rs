use anyhow::Result;
use serde::Deserialize;
use std::env;

pub const DEFAULT_MATERIALS_API_URL: &str = "https://api.materialsproject.org";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub materials: MaterialsConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Deserialize)]
pub struct MaterialsConfig {
    /// Materials Project key sent as `X-API-KEY`. `None` when unset or blank.
    pub api_key: Option<String>,
    pub base_url: String,
}

// Hand-written so the key never lands in a log line.
impl std::fmt::Debug for MaterialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running relay, used by the terminal and one-shot front ends.
    pub relay_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        Ok(Self {
            server: ServerConfig {
                port,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            materials: MaterialsConfig {
                api_key: non_empty(env::var("API_KEY").ok()),
                base_url: env::var("MATERIALS_API_URL")
                    .unwrap_or_else(|_| DEFAULT_MATERIALS_API_URL.to_string()),
            },
            client: ClientConfig {
                relay_url: env::var("RELAY_URL")
                    .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            },
        })
    }

    /// Configuration for tests and embedding: localhost, no key, default upstream.
    pub fn local(api_key: Option<String>) -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "127.0.0.1".to_string(),
                cors_allowed_origins: vec!["*".to_string()],
            },
            materials: MaterialsConfig {
                api_key: non_empty(api_key),
                base_url: DEFAULT_MATERIALS_API_URL.to_string(),
            },
            client: ClientConfig {
                relay_url: "http://localhost:3000".to_string(),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
