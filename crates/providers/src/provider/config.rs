use std::path::Path;
use std::time::Duration;

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use super::error::ProviderError;
use super::platforms::{soundcloud, youtube};
use super::ranking::RelevanceWeights;

/// Options applied to every outbound fetch of one capability surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
    /// Decode the response body as JSON
    pub json: bool,
    /// Verify TLS certificates
    pub strict_tls: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 7500,
            json: true,
            strict_tls: true,
        }
    }
}

impl RequestOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Static, per-provider configuration. Built once at startup and owned by the
/// provider for the rest of the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub site_code: String,
    /// Static key appended to every API request
    pub api_key: String,
    /// Scheme and host of the provider API, without trailing slash
    pub api_base: String,
    pub stream_options: RequestOptions,
    pub search_options: RequestOptions,
    /// Fields an upstream entry must carry before a record is built from it
    pub required_fields: Vec<String>,
    pub weights: RelevanceWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub soundcloud: ProviderConfig,
    pub youtube: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            soundcloud: soundcloud::default_config(),
            youtube: youtube::default_config(),
        }
    }
}

impl ProvidersConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// Environment variables use the `MEDIA_PROVIDERS` prefix and `__` as the
    /// nesting separator, e.g. `MEDIA_PROVIDERS__SOUNDCLOUD__API_KEY`.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ProviderError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = config_path {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MEDIA_PROVIDERS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}
