use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::config::{ProviderConfig, RequestOptions};
use super::error::ProviderError;
use super::transport::Transport;

/// State shared by every concrete provider.
///
/// Each provider instance owns its configuration outright; only the
/// transport is shared, and it carries no per-provider state.
#[derive(Clone)]
pub struct ProviderBase {
    // display name of the provider, e.g. "SoundCloud"
    pub name: String,
    pub config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl ProviderBase {
    pub fn new<S: Into<String>>(
        name: S,
        config: ProviderConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            transport,
        }
    }

    pub async fn get(&self, url: &str, options: &RequestOptions) -> Result<Value, ProviderError> {
        debug!(provider = %self.name, url, "fetching");
        self.transport.get(url, options).await
    }
}

impl std::fmt::Debug for ProviderBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBase")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Common surface of every provider, independent of which capabilities it
/// implements.
pub trait Provider: Send + Sync {
    fn base(&self) -> &ProviderBase;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn site_code(&self) -> &str {
        &self.base().config.site_code
    }

    fn config(&self) -> &ProviderConfig {
        &self.base().config
    }
}
