use crate::dates::DateNormalizer;
use std::{env, path::PathBuf};
use tracing::warn;

pub const DEFAULT_FEEDS: [&str; 3] = ["clickup", "trackabi", "workdone"];

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    /// Activity feeds, in display order.
    pub feeds: Vec<String>,
    pub normalizer: DateNormalizer,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!(value = %raw, "PORT is not a valid port, using 8080");
                8080
            }),
            None => 8080,
        };

        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/state.json"));

        let feeds = lookup("ACTIVITY_FEEDS")
            .map(|raw| parse_feeds(&raw))
            .filter(|feeds| !feeds.is_empty())
            .unwrap_or_else(|| DEFAULT_FEEDS.iter().map(|feed| feed.to_string()).collect());

        let normalizer = match lookup("APP_UTC_OFFSET_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(DateNormalizer::with_offset_minutes)
                .unwrap_or_else(|| {
                    warn!(value = %raw, "APP_UTC_OFFSET_MINUTES is not a valid offset, using UTC");
                    DateNormalizer::default()
                }),
            None => DateNormalizer::default(),
        };

        Self {
            port,
            data_path,
            feeds,
            normalizer,
        }
    }

    pub fn has_feed(&self, feed: &str) -> bool {
        self.feeds.iter().any(|known| known == feed)
    }
}

fn parse_feeds(raw: &str) -> Vec<String> {
    let mut feeds: Vec<String> = Vec::new();
    for feed in raw.split(',').map(str::trim).filter(|feed| !feed.is_empty()) {
        if !feeds.iter().any(|known| known == feed) {
            feeds.push(feed.to_string());
        }
    }
    feeds
}
