pub mod config;
mod default;
pub mod error;
pub mod platform_provider;
pub mod platforms;
pub mod ranking;
pub mod registry;
pub mod search;
pub mod stream;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ProviderConfig, ProvidersConfig, RequestOptions};
pub use default::{default_catalogs, default_registry, default_transport};
pub use error::ProviderError;
pub use platform_provider::{Provider, ProviderBase};
pub use ranking::RelevanceWeights;
pub use registry::{Catalog, ProviderRegistry};
pub use search::{SearchParams, SearchProvider};
pub use stream::{LocateInput, ResolvedResource, StreamProvider};
pub use transport::{HttpTransport, Transport};
