//! VK API client for reading community walls.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{RateLimiter, WallPost, WallSource};
use crate::config::{MAX_WALL_GET_COUNT, VkConfig};

/// VK reports "too many requests per second" with this code.
const TOO_MANY_REQUESTS: i64 = 6;

/// Errors that can occur while talking to the VK API.
#[derive(Debug, Error)]
pub enum VkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("VK API error ({code}): {message}")]
    Api { code: i64, message: String },

    #[error("VK API rate limit hit: {0}")]
    RateLimited(String),

    #[error("VK API returned neither a response nor an error")]
    EmptyResponse,

    #[error("Post {post_id} has an invalid timestamp: {timestamp}")]
    InvalidTimestamp { post_id: i64, timestamp: i64 },
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct WallGetResponse {
    #[serde(default)]
    items: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: i64,
    date: i64,
    #[serde(default)]
    text: String,
    /// Only present (as `1`) on the pinned post.
    #[serde(default)]
    is_pinned: Option<i64>,
}

impl TryFrom<RawPost> for WallPost {
    type Error = VkError;

    fn try_from(raw: RawPost) -> Result<Self, Self::Error> {
        let published_at =
            DateTime::from_timestamp(raw.date, 0).ok_or(VkError::InvalidTimestamp {
                post_id: raw.id,
                timestamp: raw.date,
            })?;

        Ok(Self {
            id: raw.id,
            text: raw.text,
            published_at,
            pinned: raw.is_pinned.is_some_and(|flag| flag != 0),
        })
    }
}

/// Thin VK API client covering `wall.get`.
#[derive(Debug)]
pub struct VkClient {
    http: Client,
    config: VkConfig,
    limiter: RateLimiter,
}

impl VkClient {
    /// Creates a client for the configured API host.
    pub fn new(config: VkConfig) -> Result<Self, VkError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            config,
            limiter: RateLimiter::default(),
        })
    }

    /// Replaces the request rate limiter.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Calls `wall.get` once. `count` is capped at the API maximum of 100.
    pub async fn wall_get(&self, owner_id: i64, count: usize) -> Result<Vec<WallPost>, VkError> {
        let count = count.min(MAX_WALL_GET_COUNT);
        let url = format!("{}/method/wall.get", self.config.api_url.trim_end_matches('/'));

        self.limiter.acquire().await;
        debug!("wall.get owner_id={} count={}", owner_id, count);

        let envelope: Envelope<WallGetResponse> = self
            .http
            .get(&url)
            .query(&[
                ("owner_id", owner_id.to_string()),
                ("count", count.to_string()),
                ("access_token", self.config.token.clone()),
                ("v", self.config.api_version.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = envelope.error {
            warn!("VK API error {}: {}", error.error_code, error.error_msg);
            if error.error_code == TOO_MANY_REQUESTS {
                return Err(VkError::RateLimited(error.error_msg));
            }
            return Err(VkError::Api {
                code: error.error_code,
                message: error.error_msg,
            });
        }

        let response = envelope.response.ok_or(VkError::EmptyResponse)?;
        let posts = response
            .items
            .into_iter()
            .map(WallPost::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("wall.get returned {} posts", posts.len());
        Ok(posts)
    }
}

#[async_trait]
impl WallSource for VkClient {
    async fn fetch_recent_posts(
        &self,
        owner_id: i64,
        limit: usize,
    ) -> Result<Vec<WallPost>, VkError> {
        self.wall_get(owner_id, limit).await
    }
}
