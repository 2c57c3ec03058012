use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::warn;

use super::error::ProviderError;
use super::platform_provider::Provider;
use super::search::SearchProvider;
use super::stream::{LocateInput, StreamProvider};
use crate::media::ResultRecord;

/// The capability set one provider exposes.
#[derive(Clone)]
pub struct Catalog {
    pub name: String,
    pub site_code: String,
    pub search: Option<Arc<dyn SearchProvider>>,
    pub streams: Option<Arc<dyn StreamProvider>>,
}

impl Catalog {
    /// Catalog for a provider implementing both capabilities.
    pub fn from_provider<P>(provider: Arc<P>) -> Self
    where
        P: SearchProvider + StreamProvider + 'static,
    {
        Self {
            name: provider.name().to_string(),
            site_code: provider.site_code().to_string(),
            search: Some(provider.clone()),
            streams: Some(provider),
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("name", &self.name)
            .field("site_code", &self.site_code)
            .field("search", &self.search.is_some())
            .field("streams", &self.streams.is_some())
            .finish()
    }
}

/// Read-only mapping from site code to the stream provider owning it.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    streams: FxHashMap<String, Arc<dyn StreamProvider>>,
    // registration order, for deterministic ownership scans
    order: Vec<String>,
}

impl ProviderRegistry {
    /// Registers every catalog exposing a non-empty site code and a stream
    /// capability. On a colliding site code the last catalog wins.
    pub fn build<'a, I>(catalogs: I) -> Self
    where
        I: IntoIterator<Item = &'a Catalog>,
    {
        let mut registry = Self::default();
        for catalog in catalogs {
            let Some(streams) = &catalog.streams else {
                continue;
            };
            if catalog.site_code.is_empty() {
                continue;
            }
            if registry
                .streams
                .insert(catalog.site_code.clone(), streams.clone())
                .is_some()
            {
                warn!(
                    site_code = %catalog.site_code,
                    provider = %catalog.name,
                    "site code registered twice, replacing previous provider"
                );
            } else {
                registry.order.push(catalog.site_code.clone());
            }
        }
        registry
    }

    pub fn get(&self, site_code: &str) -> Option<&Arc<dyn StreamProvider>> {
        self.streams.get(site_code)
    }

    pub fn site_codes(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// First registered provider whose ownership test accepts `input`.
    pub fn owner_of(&self, input: &LocateInput) -> Option<&Arc<dyn StreamProvider>> {
        self.order
            .iter()
            .filter_map(|code| self.streams.get(code))
            .find(|provider| provider.owns(input))
    }

    pub async fn request(
        &self,
        site_code: &str,
        input: &LocateInput,
    ) -> Result<Vec<ResultRecord>, ProviderError> {
        let provider = self
            .get(site_code)
            .ok_or_else(|| ProviderError::UnknownSite(site_code.to_string()))?;
        provider.request(input).await
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("site_codes", &self.order)
            .finish()
    }
}
