#![allow(unused)]

use serde::Deserialize;

use crate::provider::platforms::deserialize_count;

#[derive(Debug, Deserialize)]
pub struct Track {
    pub id: u64,
    pub kind: Option<String>,
    pub title: String,
    pub user: User,
    pub stream_url: String,
    pub permalink_url: String,
    pub streamable: bool,
    /// Milliseconds
    #[serde(default, deserialize_with = "deserialize_count")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub playback_count: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub favoritings_count: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: Option<u64>,
    pub username: String,
    pub permalink_url: Option<String>,
}
