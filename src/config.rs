use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::scoring::{ScoringConfig, DEFAULT_LEADERBOARD_SIZE};

pub const DEFAULT_DISCORD_API_BASE_URL: &str = "https://discord.com/api/v10";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Failed to load .env file: {0}")]
    EnvFile(String),
}

/// Seeds the process environment from the nearest `.env` file.
///
/// A missing file is not an error. A file that exists but cannot be read or
/// parsed is, because dotenvy stops at the first bad line and every variable
/// after it would silently fall back to its default.
pub fn load_env_file() -> Result<Option<PathBuf>, ConfigError> {
    classify_env_file(dotenvy::dotenv())
}

/// Same as [`load_env_file`] for an explicit path
pub fn load_env_file_from(path: &Path) -> Result<Option<PathBuf>, ConfigError> {
    classify_env_file(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn classify_env_file(
    result: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, ConfigError> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::EnvFile(e.to_string())),
    }
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
    pub discord_token: String,
    pub discord_channel_id: String,
    pub discord_api_base_url: String,
    pub poll_interval: Duration,
    pub publish_interval: Duration,
    pub http_timeout: Duration,
    pub leaderboard_size: usize,
    pub scoring: ScoringConfig,
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = trim_url(required(&lookup, "RCON_API_BASE_URL")?);
        let api_token = required(&lookup, "RCON_API_TOKEN")?;
        let discord_token = required(&lookup, "DISCORD_TOKEN")?;
        let discord_channel_id = required(&lookup, "DISCORD_CHANNEL_ID")?;

        let defaults = ScoringConfig::default();
        let award_quanta = match non_blank(&lookup, "AWARD_QUANTA") {
            Some(raw) => parse_quanta(&raw)?,
            None => defaults.award_quanta,
        };
        let min_award_interval = Duration::from_secs(parse_or(
            &lookup,
            "MIN_AWARD_INTERVAL_SECS",
            defaults.min_award_interval.as_secs(),
        )?);

        Ok(Self {
            api_base_url,
            api_token,
            discord_token,
            discord_channel_id,
            discord_api_base_url: trim_url(
                non_blank(&lookup, "DISCORD_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_DISCORD_API_BASE_URL.to_string()),
            ),
            poll_interval: positive_secs(&lookup, "POLL_INTERVAL_SECS", 5)?,
            publish_interval: positive_secs(&lookup, "PUBLISH_INTERVAL_SECS", 15)?,
            http_timeout: positive_secs(&lookup, "HTTP_TIMEOUT_SECS", 10)?,
            leaderboard_size: parse_or(&lookup, "LEADERBOARD_SIZE", DEFAULT_LEADERBOARD_SIZE)?,
            scoring: ScoringConfig {
                award_quanta,
                min_award_interval,
                ..defaults
            },
        })
    }
}

fn non_blank<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup, name).ok_or(ConfigError::Missing(name))
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(lookup, name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive_secs<F>(lookup: &F, name: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = parse_or(lookup, name, default)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "interval must be at least one second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_quanta(raw: &str) -> Result<BTreeSet<i64>, ConfigError> {
    let mut quanta = BTreeSet::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let value: i64 = part.parse().map_err(|_| ConfigError::Invalid {
            name: "AWARD_QUANTA",
            reason: format!("'{}' is not an integer", part),
        })?;
        if value <= 0 {
            return Err(ConfigError::Invalid {
                name: "AWARD_QUANTA",
                reason: format!("quantum {} must be positive", value),
            });
        }
        quanta.insert(value);
    }

    if quanta.is_empty() {
        return Err(ConfigError::Invalid {
            name: "AWARD_QUANTA",
            reason: "at least one quantum is required".to_string(),
        });
    }
    Ok(quanta)
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
