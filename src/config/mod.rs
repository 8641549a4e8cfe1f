//! Configuration module for the horoscope bot.
//!
//! Reads Discord and VK credentials plus bot settings from the process
//! environment.

mod settings;

pub use settings::{BotSettings, ConfigError, DiscordConfig, VkConfig};

/// Wall owner id of the group the horoscopes are published in.
pub const DEFAULT_GROUP_ID: i64 = -193_489_972;

/// VK API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "5.199";

/// Production VK API host.
pub const DEFAULT_API_URL: &str = "https://api.vk.com";

/// Largest `count` accepted by `wall.get`.
pub const MAX_WALL_GET_COUNT: usize = 100;
