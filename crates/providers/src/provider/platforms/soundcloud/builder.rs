use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::models::Track;
use crate::{
    media::{MediaEntry, MediaKind, ResultRecord, missing_fields},
    provider::{
        config::{ProviderConfig, RequestOptions},
        error::ProviderError,
        platform_provider::{Provider, ProviderBase},
        platforms::{append_query, decode_entry, encode_query, entry_id},
        ranking::RelevanceWeights,
        search::{SearchParams, SearchProvider},
        stream::{ResolvedResource, StreamProvider},
        transport::Transport,
    },
};

/// Canonical track identifiers: the numeric API form or the web permalink.
pub static TRACK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:api\.soundcloud\.com/tracks/\d+|soundcloud\.com/[^/?#\s]+/[^/?#\s]+)$")
        .unwrap()
});

static API_TRACK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://api\.soundcloud\.com/tracks/(\d+)$").unwrap());

// /tracks/<id>, optionally followed by /, /download, /stream or .json
static TRACK_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/tracks/(\d+)(?:/(?:download|stream)?|\.json)?$").unwrap()
});

static WEB_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/([^/]+)/([^/]+)/?$").unwrap());

// first path segments that are site sections, not users
const RESERVED_SECTIONS: &[&str] = &[
    "discover", "search", "charts", "you", "stream", "upload", "pages", "settings", "tags",
    "tracks",
];

// second path segments that are user sub-pages, not tracks
const RESERVED_USER_PAGES: &[&str] = &[
    "sets",
    "likes",
    "tracks",
    "albums",
    "reposts",
    "followers",
    "following",
    "comments",
    "popular-tracks",
];

const CONSUMER_KEY: &str = "2f9bebd6bcd85fa5acb916b14aeef9a4";

pub fn default_config() -> ProviderConfig {
    ProviderConfig {
        site_code: "sct".to_string(),
        api_key: CONSUMER_KEY.to_string(),
        api_base: "https://api.soundcloud.com".to_string(),
        stream_options: RequestOptions::default(),
        search_options: RequestOptions::default(),
        required_fields: ["stream_url", "permalink_url", "streamable", "id", "title", "user"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        weights: RelevanceWeights::default(),
    }
}

pub struct SoundCloud {
    pub base: ProviderBase,
}

impl SoundCloud {
    const ICON: &'static str = "img/soundcloud_orange_white_16.png";

    pub fn new(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: ProviderBase::new("SoundCloud", config, transport),
        }
    }

    fn api_track(path: &str) -> Option<String> {
        TRACK_PATH_REGEX
            .captures(path)
            .map(|caps| format!("https://api.soundcloud.com/tracks/{}", &caps[1]))
    }

    fn web_track(path: &str) -> Option<String> {
        let caps = WEB_PATH_REGEX.captures(path)?;
        let (user, slug) = (&caps[1], &caps[2]);
        if RESERVED_SECTIONS.contains(&user) || RESERVED_USER_PAGES.contains(&slug) {
            return None;
        }
        Some(format!("https://soundcloud.com/{user}/{slug}"))
    }

    /// Track behind an embed or flash player link, taken from its `url`
    /// query parameter. Only API track links are accepted there.
    fn embedded_track(url: &Url) -> Option<String> {
        let target = url
            .query_pairs()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())?;
        let target = Url::parse(&target).ok()?;
        if !target
            .host_str()?
            .eq_ignore_ascii_case("api.soundcloud.com")
        {
            return None;
        }
        Self::api_track(target.path())
    }

    fn track_url(&self, media_id: &str) -> String {
        let config = self.config();
        format!(
            "{}/tracks/{}.json?{}",
            config.api_base,
            media_id,
            encode_query([("consumer_key", config.api_key.as_str())])
        )
    }

    fn resolve_endpoint(&self, permalink: &str) -> String {
        let config = self.config();
        format!(
            "{}/resolve?{}",
            config.api_base,
            encode_query([
                ("url", permalink),
                ("format", "json"),
                ("consumer_key", config.api_key.as_str()),
            ])
        )
    }

    pub(crate) fn parse_entry(&self, entry: &Value) -> Result<MediaEntry, ProviderError> {
        if entry.get("kind").and_then(Value::as_str) != Some("track") {
            return Err(ProviderError::UnexpectedContent(
                "Expected a SoundCloud track.".to_string(),
            ));
        }

        let streamable = entry.get("streamable").and_then(Value::as_bool) == Some(true);
        let has_stream = entry
            .get("stream_url")
            .and_then(Value::as_str)
            .is_some_and(|url| !url.is_empty());
        if !(streamable && has_stream) {
            return Err(ProviderError::UnexpectedContent(
                "SoundCloud track not streamable.".to_string(),
            ));
        }

        let missing = missing_fields(entry, &self.config().required_fields);
        if !missing.is_empty() {
            return Err(ProviderError::MissingFields {
                provider: self.name().to_string(),
                id: entry_id(entry),
                fields: missing,
            });
        }

        let track: Track = decode_entry(self.name(), entry)?;
        let config = self.config();
        let record = ResultRecord::new(
            append_query(&track.stream_url, "client_id", &config.api_key),
            track.permalink_url,
            track.id.to_string(),
            config.site_code.clone(),
            Self::ICON.to_string(),
            track.user.username,
            track.title,
            track.duration.unwrap_or(0.0) / 1000.0,
            MediaKind::Audio,
        );
        Ok(MediaEntry::new(
            record,
            track.playback_count,
            track.favoritings_count,
        ))
    }
}

impl Provider for SoundCloud {
    fn base(&self) -> &ProviderBase {
        &self.base
    }
}

#[async_trait]
impl StreamProvider for SoundCloud {
    fn owns_url(&self, input: &str) -> Option<String> {
        let url = Url::parse(input).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        let path = url.path();

        let canonical = match host.as_str() {
            "api.soundcloud.com" => Self::api_track(path),
            "soundcloud.com" | "www.soundcloud.com" | "m.soundcloud.com" => {
                Self::api_track(path).or_else(|| Self::web_track(path))
            }
            "w.soundcloud.com" if path.trim_end_matches('/') == "/player" => {
                Self::embedded_track(&url)
            }
            // legacy flash player, served from player.* and p<n>.* hosts
            h if h.starts_with('p')
                && h.ends_with(".soundcloud.com")
                && path.trim_end_matches('/') == "/player.swf" =>
            {
                Self::embedded_track(&url)
            }
            _ => None,
        }?;

        TRACK_REGEX.is_match(&canonical).then_some(canonical)
    }

    async fn resolve_url(&self, id: &str) -> Result<ResolvedResource, ProviderError> {
        if let Some(caps) = API_TRACK_REGEX.captures(id) {
            return Ok(ResolvedResource::Lookup(self.track_url(&caps[1])));
        }
        if TRACK_REGEX.is_match(id) {
            debug!(permalink = id, "resolving SoundCloud permalink");
            return Ok(ResolvedResource::Lookup(self.resolve_endpoint(id)));
        }
        Err(ProviderError::Resolution(
            "SoundCloud track could not be used.".to_string(),
        ))
    }

    fn url(&self, resource: &ResolvedResource) -> String {
        match resource {
            ResolvedResource::Lookup(url) => url.clone(),
            ResolvedResource::Reference(reference) => self.track_url(&reference.media_id),
        }
    }

    fn parse_one(&self, body: &Value) -> Result<Vec<MediaEntry>, ProviderError> {
        Ok(vec![self.parse_entry(body)?])
    }
}

#[async_trait]
impl SearchProvider for SoundCloud {
    fn search_url(&self, params: &SearchParams) -> String {
        let config = self.config();
        let limit = params.per_page.to_string();
        let offset = params.offset().to_string();
        format!(
            "{}/tracks.json?{}",
            config.api_base,
            encode_query([
                ("client_id", config.api_key.as_str()),
                ("limit", limit.as_str()),
                ("filter", "streamable"),
                ("order", "hotness"),
                ("offset", offset.as_str()),
                ("q", params.query.as_str()),
            ])
        )
    }

    fn parse_list(&self, body: &Value) -> Vec<Result<MediaEntry, ProviderError>> {
        match body.as_array() {
            Some(entries) => entries.iter().map(|entry| self.parse_entry(entry)).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::media::MediaReference;
    use crate::provider::{
        default::default_transport,
        stream::LocateInput,
        test_utils::{FakeTransport, init_tracing, read_test_file},
    };

    const KEY: &str = CONSUMER_KEY;

    fn soundcloud(transport: Arc<FakeTransport>) -> SoundCloud {
        SoundCloud::new(default_config(), transport)
    }

    fn offline() -> SoundCloud {
        soundcloud(Arc::new(FakeTransport::failing()))
    }

    #[test]
    fn test_owns_url_numeric_shapes_share_one_identifier() {
        let sc = offline();
        let expected = Some("https://api.soundcloud.com/tracks/123".to_string());
        for url in [
            "http://api.soundcloud.com/tracks/123/",
            "https://api.soundcloud.com/tracks/123",
            "https://api.soundcloud.com/tracks/123/download",
            "https://api.soundcloud.com/tracks/123.json?client_id=abc",
            "https://soundcloud.com/tracks/123",
            "https://w.soundcloud.com/player/?url=http%3A%2F%2Fapi.soundcloud.com%2Ftracks%2F123&auto_play=false",
            "https://w.soundcloud.com/player?url=https%3A%2F%2Fapi.soundcloud.com%2Ftracks%2F123",
            "http://player.soundcloud.com/player.swf?url=http%3A%2F%2Fapi.soundcloud.com%2Ftracks%2F123",
            "http://p1.soundcloud.com/player.swf/?url=http%3A%2F%2Fapi.soundcloud.com%2Ftracks%2F123",
        ] {
            assert_eq!(sc.owns_url(url), expected, "{url}");
        }
    }

    #[test]
    fn test_owns_url_web_shapes_share_one_identifier() {
        let sc = offline();
        let expected = Some("https://soundcloud.com/rebecca-black/friday".to_string());
        for url in [
            "https://soundcloud.com/rebecca-black/friday",
            "http://www.soundcloud.com/rebecca-black/friday/",
            "https://m.soundcloud.com/rebecca-black/friday?in=charts#t=0:30",
            "HTTPS://SoundCloud.com/rebecca-black/friday",
        ] {
            assert_eq!(sc.owns_url(url), expected, "{url}");
        }
    }

    #[test]
    fn test_owns_url_rejects_foreign_and_partial_shapes() {
        let sc = offline();
        for url in [
            "https://soundcloud.com/rebecca-black",
            "https://soundcloud.com/rebecca-black/sets/best-of",
            "https://soundcloud.com/rebecca-black/likes",
            "https://soundcloud.com/discover/sets",
            "https://soundcloud.com/a/b/c",
            "https://api.soundcloud.com/users/5",
            "https://api.soundcloud.com/tracks/abc",
            "https://w.soundcloud.com/player/?url=https%3A%2F%2Fexample.com%2Ftracks%2F1",
            "https://w.soundcloud.com/player/",
            "https://notsoundcloud.com/a/b",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "not a url",
        ] {
            assert_eq!(sc.owns_url(url), None, "{url}");
        }
    }

    #[test]
    fn test_owns() {
        let sc = offline();
        assert!(sc.owns(&"https://soundcloud.com/rebecca-black/friday".into()));
        assert!(sc.owns(&MediaReference::new("sct", "123").into()));
        assert!(!sc.owns(&MediaReference::new("sct", "").into()));
        assert!(!sc.owns(&MediaReference::new("ytv", "123").into()));
        assert!(!sc.owns(&LocateInput::from(&json!(42))));
        assert!(!sc.owns(&"soundcloud.com/rebecca-black/friday".into()));
    }

    #[tokio::test]
    async fn test_resolve_url() {
        let sc = offline();

        let resource = sc
            .resolve_url("https://api.soundcloud.com/tracks/123")
            .await
            .unwrap();
        assert_eq!(
            resource,
            ResolvedResource::Lookup(format!(
                "https://api.soundcloud.com/tracks/123.json?consumer_key={KEY}"
            ))
        );

        let resource = sc
            .resolve_url("https://soundcloud.com/rebecca-black/friday")
            .await
            .unwrap();
        assert_eq!(
            resource,
            ResolvedResource::Lookup(format!(
                "https://api.soundcloud.com/resolve?url=https%3A%2F%2Fsoundcloud.com%2Frebecca-black%2Ffriday&format=json&consumer_key={KEY}"
            ))
        );

        for bad in ["", "tracks/123", "https://example.com/x/y"] {
            assert!(matches!(
                sc.resolve_url(bad).await,
                Err(ProviderError::Resolution(_))
            ));
        }
    }

    #[test]
    fn test_url_for_reference() {
        let sc = offline();
        let url = sc.url(&ResolvedResource::Reference(MediaReference::new("sct", "42")));
        assert_eq!(
            url,
            format!("https://api.soundcloud.com/tracks/42.json?consumer_key={KEY}")
        );
    }

    #[test]
    fn test_parse_entry() {
        let sc = offline();
        let entry = sc.parse_entry(&read_test_file("soundcloud", "track.json")).unwrap();
        assert_eq!(entry.plays, Some(1000.0));
        assert_eq!(entry.favorites, Some(50.0));

        let record = entry.record;
        assert_eq!(
            record.stream_url,
            format!("https://api.soundcloud.com/tracks/101/stream?client_id={KEY}")
        );
        assert_eq!(
            record.permalink_url,
            "https://soundcloud.com/rebecca-black/friday"
        );
        assert_eq!(record.media_id, "101");
        assert_eq!(record.site_code, "sct");
        assert_eq!(record.author, "Rebecca Black");
        assert_eq!(record.title, "Friday");
        assert_eq!(record.duration, 227.0);
        assert_eq!(record.kind, MediaKind::Audio);
    }

    #[test]
    fn test_parse_entry_failures() {
        let sc = offline();
        let tracks = read_test_file("soundcloud", "tracks.json");
        let tracks = tracks.as_array().unwrap();

        let missing = sc.parse_entry(&tracks[2]).unwrap_err();
        assert_eq!(
            missing.to_string(),
            r#"SoundCloud entry 103 is missing properties: ["permalink_url"]"#
        );
        assert!(missing.is_field_validation());

        let not_streamable = sc.parse_entry(&tracks[3]).unwrap_err();
        assert_eq!(
            not_streamable.to_string(),
            "unexpected content: SoundCloud track not streamable."
        );

        let playlist = sc.parse_entry(&tracks[4]).unwrap_err();
        assert_eq!(
            playlist.to_string(),
            "unexpected content: Expected a SoundCloud track."
        );
    }

    #[test]
    fn test_search_url() {
        let sc = offline();
        let url = sc.search_url(&SearchParams::new("rebecca black", 2, 25));
        assert_eq!(
            url,
            format!(
                "https://api.soundcloud.com/tracks.json?client_id={KEY}&limit=25&filter=streamable&order=hotness&offset=51&q=rebecca+black"
            )
        );
    }

    #[tokio::test]
    async fn test_search_drops_invalid_entries_and_ranks() {
        init_tracing();
        let transport = Arc::new(FakeTransport::with_body(read_test_file(
            "soundcloud",
            "tracks.json",
        )));
        let sc = soundcloud(transport.clone());

        let results = sc
            .search(&SearchParams::new("rebecca black", 0, 25))
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.media_id.as_str()).collect();
        assert_eq!(ids, vec!["101", "106", "102"]);
        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.options(), vec![sc.config().search_options.clone()]);

        for record in &results {
            let value = serde_json::to_value(record).unwrap();
            assert!(value.get("plays").is_none());
            assert!(value.get("favorites").is_none());
            assert!(value.get("relevance").is_none());
        }
    }

    #[tokio::test]
    async fn test_search_non_array_body_is_empty() {
        let transport = Arc::new(FakeTransport::with_body(json!({ "errors": [] })));
        let sc = soundcloud(transport);
        let results = sc.search(&SearchParams::new("x", 0, 5)).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_transport_failure_aborts() {
        let transport = Arc::new(FakeTransport::failing());
        let sc = soundcloud(transport.clone());
        let err = sc.search(&SearchParams::new("x", 0, 5)).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_params_never_reach_transport() {
        let transport = Arc::new(FakeTransport::with_body(json!([])));
        let sc = soundcloud(transport.clone());

        let err = sc
            .search_value(&json!({ "query": "x", "page": "1", "perPage": 5 }))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidParameters(_)));

        let err = sc.search(&SearchParams::new("", 0, 5)).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidParameters(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_request_by_url() {
        let transport = Arc::new(FakeTransport::with_body(read_test_file(
            "soundcloud",
            "track.json",
        )));
        let sc = soundcloud(transport.clone());

        let records = sc
            .request(&"https://w.soundcloud.com/player/?url=http%3A%2F%2Fapi.soundcloud.com%2Ftracks%2F101".into())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].media_id, "101");
        assert_eq!(
            transport.urls(),
            vec![format!(
                "https://api.soundcloud.com/tracks/101.json?consumer_key={KEY}"
            )]
        );
        assert_eq!(transport.options(), vec![sc.config().stream_options.clone()]);
    }

    #[tokio::test]
    async fn test_request_by_reference() {
        let transport = Arc::new(FakeTransport::with_body(read_test_file(
            "soundcloud",
            "track.json",
        )));
        let sc = soundcloud(transport.clone());

        let records = sc
            .request(&MediaReference::new("sct", "101").into())
            .await
            .unwrap();
        assert_eq!(records[0].title, "Friday");
        assert_eq!(
            transport.urls(),
            vec![format!(
                "https://api.soundcloud.com/tracks/101.json?consumer_key={KEY}"
            )]
        );
    }

    #[tokio::test]
    async fn test_request_unowned_input_never_fetches() {
        let transport = Arc::new(FakeTransport::with_body(json!({})));
        let sc = soundcloud(transport.clone());

        for input in [
            LocateInput::from(&json!(42)),
            MediaReference::new("ytv", "101").into(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
        ] {
            let err = sc.request(&input).await.unwrap_err();
            assert!(matches!(err, ProviderError::NoMatch(_)));
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_request_rejects_unstreamable_item() {
        let tracks = read_test_file("soundcloud", "tracks.json");
        let transport = Arc::new(FakeTransport::with_body(tracks[3].clone()));
        let sc = soundcloud(transport);

        let err = sc
            .request(&MediaReference::new("sct", "104").into())
            .await
            .unwrap_err();
        assert!(err.is_field_validation());
    }

    #[tokio::test]
    async fn test_request_malformed_track_is_entry_defect() {
        let mut track = read_test_file("soundcloud", "track.json");
        track["id"] = json!("abc");
        let transport = Arc::new(FakeTransport::with_body(track));
        let sc = soundcloud(transport);

        let err = sc
            .request(&MediaReference::new("sct", "101").into())
            .await
            .unwrap_err();
        assert!(err.is_field_validation());
        assert!(!err.is_transport());
        assert!(
            err.to_string()
                .starts_with("unexpected content: SoundCloud entry abc could not be parsed")
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_soundcloud_live_search() {
        init_tracing();
        let sc = SoundCloud::new(default_config(), default_transport().unwrap());
        let results = sc.search(&SearchParams::new("rebecca black", 0, 10)).await;
        println!("{results:?}");
    }
}
