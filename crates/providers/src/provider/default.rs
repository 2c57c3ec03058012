use std::sync::Arc;

use reqwest::Client;
use rustls::{ClientConfig, crypto::ring};
use rustls_platform_verifier::BuilderVerifierExt;
use tracing::info;

use super::config::ProvidersConfig;
use super::error::ProviderError;
use super::platforms::{soundcloud::SoundCloud, youtube::YouTube};
use super::registry::{Catalog, ProviderRegistry};
use super::transport::{HttpTransport, Transport};

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

pub(crate) fn strict_client() -> Result<Client, ProviderError> {
    let provider = Arc::new(ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ProviderError::Tls(e.to_string()))?
        .with_platform_verifier()
        .map_err(|e| ProviderError::Tls(e.to_string()))?
        .with_no_client_auth();

    Ok(Client::builder().use_preconfigured_tls(tls_config).build()?)
}

pub(crate) fn lax_client() -> Result<Client, ProviderError> {
    Ok(Client::builder().danger_accept_invalid_certs(true).build()?)
}

/// Returns the shared HTTP transport used by the default providers.
pub fn default_transport() -> Result<Arc<dyn Transport>, ProviderError> {
    Ok(Arc::new(HttpTransport::new()?))
}

/// Builds the capability sets of every supported provider on one transport.
pub fn default_catalogs(config: &ProvidersConfig, transport: Arc<dyn Transport>) -> Vec<Catalog> {
    vec![
        Catalog::from_provider(Arc::new(SoundCloud::new(
            config.soundcloud.clone(),
            transport.clone(),
        ))),
        Catalog::from_provider(Arc::new(YouTube::new(config.youtube.clone(), transport))),
    ]
}

/// Returns a registry populated with all the supported providers.
pub fn default_registry(config: &ProvidersConfig) -> Result<ProviderRegistry, ProviderError> {
    let catalogs = default_catalogs(config, default_transport()?);
    let registry = ProviderRegistry::build(&catalogs);
    info!(site_codes = ?registry.site_codes(), "provider registry ready");
    Ok(registry)
}
