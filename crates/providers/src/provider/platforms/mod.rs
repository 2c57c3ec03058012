pub mod soundcloud;
pub mod youtube;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::provider::error::ProviderError;

/// Counters arrive as numbers from some APIs and as numeric strings from
/// others. Anything else reads as missing.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    match value {
        serde_json::Value::Number(n) => Ok(n.as_f64()),
        serde_json::Value::String(s) => Ok(s.trim().parse::<f64>().ok()),
        _ => Ok(None),
    }
}

/// Encodes `pairs` as an `application/x-www-form-urlencoded` query string.
pub(crate) fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Appends one query pair to `url`, which may already carry a query.
pub(crate) fn append_query(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", encode_query([(key, value)]))
}

/// Provider-native id of a raw entry, for error messages.
pub(crate) fn entry_id(entry: &serde_json::Value) -> String {
    match entry.get("id") {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        _ => "unknown".to_string(),
    }
}

/// Decodes a raw entry that already passed the required-fields check.
/// A shape mismatch is a defect of that entry, not of the transport.
pub(crate) fn decode_entry<T>(
    provider: &str,
    entry: &serde_json::Value,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    T::deserialize(entry).map_err(|e| {
        ProviderError::UnexpectedContent(format!(
            "{provider} entry {} could not be parsed: {e}",
            entry_id(entry)
        ))
    })
}
