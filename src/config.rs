use crate::types::error::BotError;
use anyhow::Result;
use std::time::Duration;
use tracing::debug;

/// Base URLs of the third-party services behind `/fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchEndpoints {
    pub xkcd: String,
    pub wikipedia: String,
    pub animal: String,
    pub joke: String,
    pub quote: String,
    pub fact: String,
}

impl Default for FetchEndpoints {
    fn default() -> Self {
        Self {
            xkcd: "https://xkcd.com".to_string(),
            wikipedia: "https://en.wikipedia.org/w/api.php".to_string(),
            animal: "https://some-random-api.com".to_string(),
            joke: "https://official-joke-api.appspot.com".to_string(),
            quote: "https://api.quotable.io".to_string(),
            fact: "https://uselessfacts.jsph.pl".to_string(),
        }
    }
}

/// Configuration for guild-bot loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Discord (4 fields)
    pub discord_token: String,
    pub owner_id: u64,
    pub guild_id: u64,
    pub log_channel_id: u64,

    // Runtime (2 fields)
    pub http_timeout: Duration,
    pub shutdown_grace: Duration,

    pub endpoints: FetchEndpoints,
}

fn required(var: &str) -> Result<String> {
    std::env::var(var)
        .map_err(|_| BotError::config_error(format!("{} is required but not set", var)).into())
}

fn required_id(var: &str) -> Result<u64> {
    required(var)?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .ok_or_else(|| BotError::config_error(format!("{} must be a valid snowflake id", var)).into())
}

fn millis_or(var: &str, default: u64) -> Result<Duration> {
    let ms = std::env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .map_err(|_| BotError::config_error(format!("{} must be a valid integer", var)))?;
    Ok(Duration::from_millis(ms))
}

fn url_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_inner(true)
    }

    #[cfg(test)]
    pub fn from_env_no_dotenv() -> Result<Self> {
        Self::from_env_inner(false)
    }

    fn from_env_inner(load_dotenv: bool) -> Result<Self> {
        if load_dotenv {
            dotenvy::dotenv().ok();
        }

        let discord_token = required("DISCORD_TOKEN")?;

        let owner_id = required_id("DISCORD_OWNER_ID")?;
        let guild_id = required_id("DISCORD_GUILD_ID")?;
        let log_channel_id = required_id("DISCORD_LOG_CHANNEL_ID")?;

        let http_timeout = millis_or("HTTP_TIMEOUT_MS", 10_000)?;
        let shutdown_grace = millis_or("SHUTDOWN_GRACE_MS", 5_000)?;

        let defaults = FetchEndpoints::default();
        let endpoints = FetchEndpoints {
            xkcd: url_or("XKCD_BASE_URL", &defaults.xkcd),
            wikipedia: url_or("WIKIPEDIA_API_URL", &defaults.wikipedia),
            animal: url_or("ANIMAL_API_URL", &defaults.animal),
            joke: url_or("JOKE_API_URL", &defaults.joke),
            quote: url_or("QUOTE_API_URL", &defaults.quote),
            fact: url_or("FACT_API_URL", &defaults.fact),
        };

        debug!(
            owner_id = owner_id,
            guild_id = guild_id,
            log_channel_id = log_channel_id,
            http_timeout_ms = http_timeout.as_millis() as u64,
            shutdown_grace_ms = shutdown_grace.as_millis() as u64,
            endpoints = ?endpoints,
            "Config resolved from environment"
        );

        Ok(Config {
            discord_token,
            owner_id,
            guild_id,
            log_channel_id,
            http_timeout,
            shutdown_grace,
            endpoints,
        })
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Config {{\n  discord_token: ***MASKED***,\n  owner_id: {},\n  guild_id: {},\n  log_channel_id: {},\n  http_timeout: {:?},\n  shutdown_grace: {:?},\n  endpoints: {:?},\n}}",
            self.owner_id,
            self.guild_id,
            self.log_channel_id,
            self.http_timeout,
            self.shutdown_grace,
            self.endpoints,
        )
    }
}
