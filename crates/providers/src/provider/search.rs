use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::ProviderError;
use super::platform_provider::Provider;
use super::ranking::rank;
use crate::media::{MediaEntry, ResultRecord};

const PARAMS_MESSAGE: &str =
    "Search parameters must include a query, page number, and results per page.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    /// Zero-based page index
    pub page: u32,
    pub per_page: u32,
}

impl SearchParams {
    pub fn new<S: Into<String>>(query: S, page: u32, per_page: u32) -> Self {
        Self {
            query: query.into(),
            page,
            per_page,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.query.is_empty() || self.per_page == 0 {
            return Err(ProviderError::InvalidParameters(PARAMS_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// One-based index of the first result on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.per_page) * u64::from(self.page) + 1
    }
}

/// Strict decoding of untyped parameters: `page` and `perPage` must be JSON
/// numbers, never numeric strings.
impl TryFrom<&Value> for SearchParams {
    type Error = ProviderError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let params: SearchParams = serde_json::from_value(value.clone())
            .map_err(|e| ProviderError::InvalidParameters(format!("{PARAMS_MESSAGE} ({e})")))?;
        params.validate()?;
        Ok(params)
    }
}

/// Query pipeline: build URL, fetch once, parse the envelope, rank.
#[async_trait]
pub trait SearchProvider: Provider {
    fn search_url(&self, params: &SearchParams) -> String;

    /// Converts a provider envelope into per-entry parse outcomes.
    fn parse_list(&self, body: &Value) -> Vec<Result<MediaEntry, ProviderError>>;

    async fn search(&self, params: &SearchParams) -> Result<Vec<ResultRecord>, ProviderError> {
        params.validate()?;

        let url = self.search_url(params);
        let body = self
            .base()
            .get(&url, &self.config().search_options)
            .await?;

        let entries: Vec<MediaEntry> = self
            .parse_list(&body)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(provider = self.name(), error = %e, "dropping search entry");
                    None
                }
            })
            .collect();

        Ok(rank(entries, &params.query, &self.config().weights))
    }

    /// Decodes untyped parameters, then searches. Fails before any network
    /// access when the parameters are malformed.
    async fn search_value(&self, params: &Value) -> Result<Vec<ResultRecord>, ProviderError> {
        let params = SearchParams::try_from(params)?;
        self.search(&params).await
    }
}
