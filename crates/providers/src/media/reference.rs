use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Identity of one item on one provider, without a URL.
///
/// Serialized as `{ "key": <site code>, "value": <media id> }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaReference {
    #[serde(rename = "key")]
    pub site_code: String,
    #[serde(rename = "value")]
    pub media_id: String,
}

impl MediaReference {
    pub fn new<S1: Into<String>, S2: Into<String>>(site_code: S1, media_id: S2) -> Self {
        Self {
            site_code: site_code.into(),
            media_id: media_id.into(),
        }
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.site_code, self.media_id)
    }
}

/// Drops repeated references, keeping the first occurrence of each.
pub fn unique_references<I>(references: I) -> Vec<MediaReference>
where
    I: IntoIterator<Item = MediaReference>,
{
    let mut seen = FxHashSet::default();
    references
        .into_iter()
        .filter(|reference| seen.insert(reference.clone()))
        .collect()
}
