use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::config::RequestOptions;
use super::default::{DEFAULT_UA, lax_client, strict_client};
use super::error::ProviderError;

/// Outbound HTTP capability consumed by every provider.
///
/// Implementations perform exactly one GET per call and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<Value, ProviderError>;
}

/// `reqwest` backed transport. Holds one client that verifies certificates
/// and one that does not, selected per request by `strict_tls`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    strict: Client,
    lax: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ProviderError> {
        Ok(Self::with_clients(strict_client()?, lax_client()?))
    }

    pub fn with_clients(strict: Client, lax: Client) -> Self {
        Self { strict, lax }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<Value, ProviderError> {
        let client = if options.strict_tls {
            &self.strict
        } else {
            &self.lax
        };

        debug!(url, timeout_ms = options.timeout_ms, "GET");
        let response = client
            .get(url)
            .header(reqwest::header::USER_AGENT, DEFAULT_UA)
            .timeout(options.timeout())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if options.json {
            Ok(response.json::<Value>().await?)
        } else {
            Ok(Value::String(response.text().await?))
        }
    }
}
