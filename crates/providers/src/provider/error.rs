use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("invalid search parameters: {0}")]
    InvalidParameters(String),
    #[error("{provider} entry {id} is missing properties: {fields:?}")]
    MissingFields {
        provider: String,
        id: String,
        fields: Vec<String>,
    },
    #[error("unexpected content: {0}")]
    UnexpectedContent(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("received status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("tls error: {0}")]
    Tls(String),
    #[error("resolution error: {0}")]
    Resolution(String),
    #[error("no match for {0}")]
    NoMatch(String),
    #[error("unknown site code: {0}")]
    UnknownSite(String),
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl ProviderError {
    /// Errors scoped to a single entry; a batch search drops the entry and
    /// carries on.
    pub fn is_field_validation(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingFields { .. } | ProviderError::UnexpectedContent(_)
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProviderError::HttpError(_)
                | ProviderError::Status { .. }
                | ProviderError::JsonError(_)
                | ProviderError::Tls(_)
        )
    }
}
