use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use url::Url;

use super::models::VideoEntry;
use crate::{
    media::{MediaEntry, MediaKind, MediaReference, ResultRecord, missing_fields},
    provider::{
        config::{ProviderConfig, RequestOptions},
        error::ProviderError,
        platform_provider::{Provider, ProviderBase},
        platforms::{decode_entry, encode_query},
        ranking::RelevanceWeights,
        search::{SearchParams, SearchProvider},
        stream::{ResolvedResource, StreamProvider},
        transport::Transport,
    },
};

/// Captures the video id from short, watch, embed and legacy player links.
pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(?:youtu\.be/|v/|u/\w/|embed/|watch\?(?:.*&)?v=)([^#&?]*).*").unwrap()
});

pub static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

const HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
    "youtu.be",
];

pub fn default_config() -> ProviderConfig {
    ProviderConfig {
        site_code: "ytv".to_string(),
        api_key: String::new(),
        api_base: "https://gdata.youtube.com".to_string(),
        stream_options: RequestOptions::default(),
        search_options: RequestOptions {
            timeout_ms: 4000,
            json: true,
            strict_tls: false,
        },
        required_fields: ["id", "author", "title", "yt$statistics", "media$group"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        weights: RelevanceWeights::default(),
    }
}

pub struct YouTube {
    pub base: ProviderBase,
}

impl YouTube {
    const ICON: &'static str = "img/youtube.png";

    const WATCH_URL: &'static str = "https://www.youtube.com/watch?v=";

    pub fn new(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: ProviderBase::new("YouTube", config, transport),
        }
    }

    /// `tag:youtube.com,2008:video:<id>` → `<id>`
    fn video_id(entry: &Value) -> Option<&str> {
        entry
            .pointer("/id/$t")
            .and_then(Value::as_str)
            .and_then(|tag| tag.rsplit(':').next())
            .filter(|id| !id.is_empty())
    }

    fn api_query(&self, mut pairs: Vec<(&'static str, String)>) -> String {
        let config = self.config();
        if !config.api_key.is_empty() {
            pairs.push(("key", config.api_key.clone()));
        }
        encode_query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
    }

    fn video_url(&self, media_id: &str) -> String {
        format!(
            "{}/feeds/api/videos/{}?{}",
            self.config().api_base,
            media_id,
            self.api_query(vec![("v", "2".to_string()), ("alt", "json".to_string())])
        )
    }

    pub(crate) fn parse_entry(&self, entry: &Value) -> Result<MediaEntry, ProviderError> {
        let missing = missing_fields(entry, &self.config().required_fields);
        if !missing.is_empty() {
            return Err(ProviderError::MissingFields {
                provider: self.name().to_string(),
                id: Self::video_id(entry).unwrap_or("unknown").to_string(),
                fields: missing,
            });
        }

        let id = Self::video_id(entry)
            .ok_or_else(|| ProviderError::MissingFields {
                provider: self.name().to_string(),
                id: "unknown".to_string(),
                fields: vec!["id".to_string()],
            })?
            .to_string();

        let video: VideoEntry = decode_entry(self.name(), entry)?;
        let author = video
            .author
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MissingFields {
                provider: self.name().to_string(),
                id: id.clone(),
                fields: vec!["author".to_string()],
            })?
            .name
            .t;

        let permalink = format!("{}{}", Self::WATCH_URL, id);
        let duration = video
            .media_group
            .duration
            .and_then(|d| d.seconds)
            .unwrap_or(0.0)
            .trunc();

        let record = ResultRecord::new(
            permalink.clone(),
            permalink,
            id,
            self.site_code().to_string(),
            Self::ICON.to_string(),
            author,
            video.title.t,
            duration,
            MediaKind::Video,
        );
        Ok(MediaEntry::new(
            record,
            video.statistics.view_count,
            video.statistics.favorite_count,
        ))
    }
}

impl Provider for YouTube {
    fn base(&self) -> &ProviderBase {
        &self.base
    }
}

#[async_trait]
impl StreamProvider for YouTube {
    fn owns_url(&self, input: &str) -> Option<String> {
        let url = Url::parse(input).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        if !HOSTS.contains(&host.as_str()) {
            return None;
        }

        let caps = URL_REGEX.captures(input)?;
        let id = caps.get(1)?.as_str();
        VIDEO_ID_REGEX.is_match(id).then(|| id.to_string())
    }

    async fn resolve_url(&self, id: &str) -> Result<ResolvedResource, ProviderError> {
        if !VIDEO_ID_REGEX.is_match(id) {
            return Err(ProviderError::Resolution(
                "YouTube video could not be used.".to_string(),
            ));
        }
        Ok(ResolvedResource::Reference(MediaReference::new(
            self.site_code(),
            id,
        )))
    }

    fn url(&self, resource: &ResolvedResource) -> String {
        match resource {
            ResolvedResource::Lookup(url) => url.clone(),
            ResolvedResource::Reference(reference) => self.video_url(&reference.media_id),
        }
    }

    fn parse_one(&self, body: &Value) -> Result<Vec<MediaEntry>, ProviderError> {
        let entry = body.get("entry").ok_or_else(|| {
            ProviderError::UnexpectedContent("Expected a YouTube video entry.".to_string())
        })?;
        Ok(vec![self.parse_entry(entry)?])
    }
}

#[async_trait]
impl SearchProvider for YouTube {
    fn search_url(&self, params: &SearchParams) -> String {
        format!(
            "{}/feeds/api/videos?{}",
            self.config().api_base,
            self.api_query(vec![
                ("v", "2".to_string()),
                ("format", "5".to_string()),
                ("max-results", params.per_page.to_string()),
                ("orderby", "relevance".to_string()),
                ("alt", "json".to_string()),
                ("start-index", params.offset().to_string()),
                ("q", params.query.clone()),
            ])
        )
    }

    fn parse_list(&self, body: &Value) -> Vec<Result<MediaEntry, ProviderError>> {
        match body.pointer("/feed/entry").and_then(Value::as_array) {
            Some(entries) => entries.iter().map(|entry| self.parse_entry(entry)).collect(),
            None => Vec::new(),
        }
    }
}
