//! Application settings, Discord and VK configuration.

use std::fmt;

use chrono::NaiveTime;
use tracing::warn;

use super::{DEFAULT_API_URL, DEFAULT_API_VERSION, DEFAULT_GROUP_ID, MAX_WALL_GET_COUNT};

/// Discord bot configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal.
    pub token: String,
}

impl DiscordConfig {
    /// Creates configuration from environment variables.
    ///
    /// Expects `DISCORD_TOKEN` to be set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = required(&lookup, "DISCORD_TOKEN")?;
        Ok(Self { token })
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig").finish_non_exhaustive()
    }
}

/// VK API configuration.
#[derive(Clone)]
pub struct VkConfig {
    /// User access token used for `wall.get`.
    pub token: String,

    /// Wall owner id. Groups are negative.
    pub group_id: i64,

    /// VK API version sent with every request.
    pub api_version: String,

    /// Base URL of the API host.
    pub api_url: String,

    /// How many of the most recent posts a lookup scans.
    pub lookback: usize,
}

fn default_group_id() -> i64 {
    DEFAULT_GROUP_ID
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_lookback() -> usize {
    MAX_WALL_GET_COUNT
}

impl VkConfig {
    /// Creates a VK configuration with defaults for everything but the token.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token,
            group_id: default_group_id(),
            api_version: default_api_version(),
            api_url: default_api_url(),
            lookback: default_lookback(),
        }
    }

    /// Overrides the API base URL (used to point the client at a mock server).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `VK_USER_TOKEN` to be set. `VK_GROUP_ID`, `VK_API_VERSION`,
    /// `VK_API_URL` and `VK_LOOKBACK` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = required(&lookup, "VK_USER_TOKEN")?;

        let group_id = match lookup("VK_GROUP_ID") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "VK_GROUP_ID",
                value: raw,
            })?,
            None => default_group_id(),
        };

        let lookback = match lookup("VK_LOOKBACK") {
            Some(raw) => {
                let requested: usize =
                    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                        var: "VK_LOOKBACK",
                        value: raw.clone(),
                    })?;
                clamp_lookback(requested)
            }
            None => default_lookback(),
        };

        Ok(Self {
            token,
            group_id,
            api_version: lookup("VK_API_VERSION").unwrap_or_else(default_api_version),
            api_url: lookup("VK_API_URL").unwrap_or_else(default_api_url),
            lookback,
        })
    }
}

impl fmt::Debug for VkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VkConfig")
            .field("group_id", &self.group_id)
            .field("api_version", &self.api_version)
            .field("api_url", &self.api_url)
            .field("lookback", &self.lookback)
            .finish_non_exhaustive()
    }
}

/// `wall.get` accepts at most 100 posts per call.
fn clamp_lookback(requested: usize) -> usize {
    let clamped = requested.clamp(1, MAX_WALL_GET_COUNT);
    if clamped != requested {
        warn!(
            "VK_LOOKBACK={} is out of range, using {}",
            requested, clamped
        );
    }
    clamped
}

/// Bot-specific settings.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Channel that receives the daily digest. `None` disables auto-posting.
    pub auto_post_channel_id: Option<u64>,

    /// Local wall-clock time the digest is posted at.
    pub digest_time: NaiveTime,

    /// Port of the liveness endpoint.
    pub health_port: u16,
}

fn default_digest_time() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 1, 0).unwrap_or(NaiveTime::MIN)
}

fn default_health_port() -> u16 {
    10000
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            auto_post_channel_id: None,
            digest_time: default_digest_time(),
            health_port: default_health_port(),
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self::from_lookup_with_defaults(|key| std::env::var(key).ok())
    }

    /// Creates bot settings from an arbitrary variable source.
    ///
    /// Invalid values fall back to their defaults with a warning. An
    /// unparsable channel id disables auto-posting instead of failing.
    #[must_use]
    pub fn from_lookup_with_defaults(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let auto_post_channel_id = lookup("AUTO_POST_CHANNEL_ID")
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    warn!(
                        "AUTO_POST_CHANNEL_ID={} is not a valid channel id, auto-posting disabled",
                        raw
                    );
                    None
                }
                Ok(id) => Some(id),
            });

        let digest_time = lookup("DIGEST_TIME").map_or_else(default_digest_time, |raw| {
            NaiveTime::parse_from_str(raw.trim(), "%H:%M").unwrap_or_else(|_| {
                warn!("DIGEST_TIME={} is not HH:MM, using 00:01", raw);
                default_digest_time()
            })
        });

        let health_port = lookup("HEALTH_PORT").map_or_else(default_health_port, |raw| {
            raw.trim().parse().unwrap_or_else(|_| {
                warn!("HEALTH_PORT={} is not a valid port, using 10000", raw);
                default_health_port()
            })
        });

        Self {
            auto_post_channel_id,
            digest_time,
            health_port,
        }
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingEnvVar(var))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}
