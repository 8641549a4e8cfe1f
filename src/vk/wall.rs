//! Wall posts and the feed abstraction the lookup reads from.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};

use super::VkError;

/// A single post from a community wall, as returned by `wall.get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallPost {
    pub id: i64,
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub pinned: bool,
}

impl WallPost {
    /// Calendar date of publication in the process-local timezone.
    #[must_use]
    pub fn local_date(&self) -> NaiveDate {
        self.published_at.with_timezone(&Local).date_naive()
    }
}

/// Source of recent wall posts, most recent first.
#[async_trait]
pub trait WallSource: Send + Sync {
    /// Fetches up to `limit` of the newest posts on `owner_id`'s wall.
    async fn fetch_recent_posts(&self, owner_id: i64, limit: usize)
    -> Result<Vec<WallPost>, VkError>;
}
