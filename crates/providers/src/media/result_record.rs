use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::reference::MediaReference;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            _ => Err(()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
/// One piece of media as returned to callers, independent of the provider it
/// came from.
///
/// # Fields
///
/// * `stream_url` - URL a player can fetch the media from
/// * `permalink_url` - Public page of the media on the provider's site
/// * `media_id` - Provider-native identifier
/// * `site_code` - Short tag of the owning provider, e.g. `sct`
/// * `icon` - Icon reference for the provider
/// * `author` - Uploader, artist or channel name
/// * `title` - Title of the media
/// * `duration` - Length in seconds
/// * `kind` - Audio or video
pub struct ResultRecord {
    pub stream_url: String,
    pub permalink_url: String,
    pub media_id: String,
    pub site_code: String,
    pub icon: String,
    pub author: String,
    pub title: String,
    pub duration: f64,
    pub kind: MediaKind,
}

impl ResultRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        stream_url: String,
        permalink_url: String,
        media_id: String,
        site_code: String,
        icon: String,
        author: String,
        title: String,
        duration: f64,
        kind: MediaKind,
    ) -> Self {
        Self {
            stream_url,
            permalink_url,
            media_id,
            site_code,
            icon,
            author,
            title,
            duration,
            kind,
        }
    }

    pub fn reference(&self) -> MediaReference {
        MediaReference::new(self.site_code.clone(), self.media_id.clone())
    }
}

/// A parsed record together with the raw popularity counters the ranking
/// stage consumes. The counters never leave the crate attached to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntry {
    pub record: ResultRecord,
    pub plays: Option<f64>,
    pub favorites: Option<f64>,
}

impl MediaEntry {
    pub fn new(record: ResultRecord, plays: Option<f64>, favorites: Option<f64>) -> Self {
        Self {
            record,
            plays,
            favorites,
        }
    }

    pub fn into_record(self) -> ResultRecord {
        self.record
    }
}

/// Returns the names in `required` that are absent or null on `entry`.
pub fn missing_fields(entry: &serde_json::Value, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|field| entry.get(field.as_str()).is_none_or(|value| value.is_null()))
        .cloned()
        .collect()
}
