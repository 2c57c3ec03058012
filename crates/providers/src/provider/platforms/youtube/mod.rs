mod builder;
mod models;

pub use builder::{URL_REGEX, VIDEO_ID_REGEX, YouTube, default_config};
