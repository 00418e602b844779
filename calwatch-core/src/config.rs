//! Runtime configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

use crate::error::{CalWatchError, CalWatchResult};

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("calwatch/state.json")
}

fn default_timezone() -> Tz {
    chrono_tz::Europe::Paris
}

fn default_retained_weeks() -> usize {
    3
}

fn default_preview_weekday() -> Weekday {
    Weekday::Sat
}

fn default_renotify_changes() -> bool {
    true
}

/// Configuration at ~/.config/calwatch/config.toml (or wherever `--config`
/// points).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// The iCalendar feed to watch.
    pub calendar_url: String,

    /// The chat webhook notifications go to.
    pub webhook_url: String,

    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Display zone. Zoneless feed timestamps are read as UTC, then
    /// converted here.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// How many weeks of snapshot history the store keeps.
    #[serde(default = "default_retained_weeks")]
    pub retained_weeks: usize,

    /// Weekday whose runs preview the next week instead of the current one.
    /// Accepts short or long names ("sat", "saturday").
    #[serde(
        default = "default_preview_weekday",
        deserialize_with = "weekday_from_str"
    )]
    pub preview_weekday: Weekday,

    /// When false, further change diffs in an already-notified week are
    /// logged but not re-sent.
    #[serde(default = "default_renotify_changes")]
    pub renotify_changes: bool,

    /// Prefixed to every message content, e.g. "@everyone".
    #[serde(default)]
    pub mention: Option<String>,

    /// Webhook display name override.
    #[serde(default)]
    pub username: Option<String>,

    /// When set, the raw fetched feed is mirrored to this file.
    #[serde(default)]
    pub feed_cache_path: Option<PathBuf>,
}

impl Config {
    pub fn default_path() -> CalWatchResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalWatchError::Config("could not determine config directory".into()))?
            .join("calwatch");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> CalWatchResult<Config> {
        let content = fs::read_to_string(path).map_err(|e| {
            CalWatchError::Config(format!("could not read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| CalWatchError::Config(e.to_string()))
    }
}

fn weekday_from_str<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Weekday::from_str(&s).map_err(|_| serde::de::Error::custom(format!("invalid weekday: {s}")))
}
