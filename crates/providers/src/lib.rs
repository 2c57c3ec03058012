//! Uniform search and stream resolution across third-party media providers.
//!
//! Every provider exposes up to two capability surfaces: [`StreamProvider`]
//! turns a URL or a [`MediaReference`] into a single [`ResultRecord`], and
//! [`SearchProvider`] turns a query into a relevance-ranked list of records.
//! [`ProviderRegistry`] maps site codes to stream providers for routing.

pub mod media;
pub mod provider;

pub use media::{MediaEntry, MediaKind, MediaReference, ResultRecord};
pub use provider::{
    Catalog, HttpTransport, LocateInput, Provider, ProviderConfig, ProviderError,
    ProviderRegistry, ProvidersConfig, RelevanceWeights, RequestOptions, ResolvedResource,
    SearchParams, SearchProvider, StreamProvider, Transport, default_catalogs, default_registry,
};
