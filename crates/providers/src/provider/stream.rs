use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::error::ProviderError;
use super::platform_provider::Provider;
use crate::media::{MediaEntry, MediaReference, ResultRecord};

/// Anything a caller may hand to [`StreamProvider::locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateInput {
    /// Free-form text, presumed to be a URL
    Text(String),
    Reference(MediaReference),
    /// Neither text nor a reference, e.g. a bare number
    Unrecognized,
}

impl From<&str> for LocateInput {
    fn from(value: &str) -> Self {
        LocateInput::Text(value.to_string())
    }
}

impl From<String> for LocateInput {
    fn from(value: String) -> Self {
        LocateInput::Text(value)
    }
}

impl From<MediaReference> for LocateInput {
    fn from(value: MediaReference) -> Self {
        LocateInput::Reference(value)
    }
}

impl From<&Value> for LocateInput {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(text) => LocateInput::Text(text.clone()),
            Value::Object(map) => {
                // Empty keys and ids, and a numeric id of zero, carry no identity.
                let key = map
                    .get("key")
                    .and_then(Value::as_str)
                    .filter(|key| !key.is_empty());
                let media_id = match map.get("value") {
                    Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
                    Some(Value::Number(id)) if id.as_f64() != Some(0.0) => Some(id.to_string()),
                    _ => None,
                };
                match (key, media_id) {
                    (Some(key), Some(media_id)) => {
                        LocateInput::Reference(MediaReference::new(key, media_id))
                    }
                    _ => LocateInput::Unrecognized,
                }
            }
            _ => LocateInput::Unrecognized,
        }
    }
}

impl fmt::Display for LocateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateInput::Text(text) => write!(f, "{text}"),
            LocateInput::Reference(reference) => write!(f, "{reference}"),
            LocateInput::Unrecognized => write!(f, "<unrecognized input>"),
        }
    }
}

/// What the locate phase hands to the fetch phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedResource {
    /// A ready-to-fetch API URL, credential included
    Lookup(String),
    Reference(MediaReference),
}

/// True when `input` parses as an absolute URL with a host.
pub fn verify_url(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| url.has_host())
}

/// Locate/resolve protocol for single items.
///
/// Implementors supply the provider-specific leaves (`owns_url`,
/// `resolve_url`, `url`, `parse_one`); `owns`, `locate` and `request` are
/// shared orchestration.
#[async_trait]
pub trait StreamProvider: Provider {
    /// Classifies a raw URL. Returns the canonical identifier when the URL
    /// belongs to this provider. Pure, no network access.
    fn owns_url(&self, url: &str) -> Option<String>;

    /// Turns a canonical identifier from `owns_url` into a fetchable resource.
    async fn resolve_url(&self, id: &str) -> Result<ResolvedResource, ProviderError>;

    /// Final fetch URL for a resolved resource.
    fn url(&self, resource: &ResolvedResource) -> String;

    /// Converts a single-item response body into records.
    fn parse_one(&self, body: &Value) -> Result<Vec<MediaEntry>, ProviderError>;

    fn owns_media(&self, reference: &MediaReference) -> bool {
        reference.site_code == self.site_code() && !reference.media_id.is_empty()
    }

    /// Ownership test only; never touches the network.
    fn owns(&self, input: &LocateInput) -> bool {
        match input {
            LocateInput::Text(text) => verify_url(text) && self.owns_url(text).is_some(),
            LocateInput::Reference(reference) => self.owns_media(reference),
            LocateInput::Unrecognized => false,
        }
    }

    async fn locate(&self, input: &LocateInput) -> Result<ResolvedResource, ProviderError> {
        if let LocateInput::Text(text) = input {
            if verify_url(text) {
                if let Some(id) = self.owns_url(text) {
                    return self.resolve_url(&id).await;
                }
            }
        }

        match input {
            LocateInput::Reference(reference) if self.owns_media(reference) => {
                Ok(ResolvedResource::Reference(reference.clone()))
            }
            _ => Err(ProviderError::NoMatch(input.to_string())),
        }
    }

    /// Locates `query`, fetches it once and parses the single response.
    async fn request(&self, query: &LocateInput) -> Result<Vec<ResultRecord>, ProviderError> {
        let resource = self.locate(query).await?;
        let url = self.url(&resource);
        debug!(provider = self.name(), %url, "requesting stream");

        let body = self
            .base()
            .get(&url, &self.config().stream_options)
            .await?;
        let entries = self.parse_one(&body)?;
        Ok(entries.into_iter().map(MediaEntry::into_record).collect())
    }
}
