mod builder;
mod models;

pub use builder::{SoundCloud, TRACK_REGEX, default_config};
