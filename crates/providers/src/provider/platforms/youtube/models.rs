#![allow(unused)]

use serde::Deserialize;

use crate::provider::platforms::deserialize_count;

/// GData wraps scalar values as `{ "$t": ... }`.
#[derive(Debug, Deserialize)]
pub struct Text {
    #[serde(rename = "$t")]
    pub t: String,
}

#[derive(Debug, Deserialize)]
pub struct VideoEntry {
    pub id: Text,
    pub title: Text,
    pub author: Vec<Author>,
    #[serde(rename = "yt$statistics")]
    pub statistics: Statistics,
    #[serde(rename = "media$group")]
    pub media_group: MediaGroup,
}

#[derive(Debug, Deserialize)]
pub struct Author {
    pub name: Text,
}

#[derive(Debug, Deserialize)]
pub struct Statistics {
    #[serde(rename = "viewCount", default, deserialize_with = "deserialize_count")]
    pub view_count: Option<f64>,
    #[serde(rename = "favoriteCount", default, deserialize_with = "deserialize_count")]
    pub favorite_count: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct MediaGroup {
    #[serde(rename = "yt$duration")]
    pub duration: Option<Duration>,
}

#[derive(Debug, Deserialize)]
pub struct Duration {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub seconds: Option<f64>,
}
