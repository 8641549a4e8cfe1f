//! Channel delivery over the Discord REST API.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;

use crate::horoscope::MessageSink;

/// Posts plain messages to text channels.
#[derive(Clone)]
pub struct ChannelSink {
    http: Arc<Http>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send(&self, channel_id: u64, text: &str) -> anyhow::Result<()> {
        anyhow::ensure!(channel_id != 0, "channel id must be non-zero");
        ChannelId::new(channel_id).say(&self.http, text).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ChannelSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSink").finish_non_exhaustive()
    }
}
