//! Daily digest compilation and delivery.
//!
//! The digest is every sign's horoscope for one date, packed greedily into
//! messages that fit Discord's 2000 character limit. A sign's block is never
//! split between two messages.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, info, warn};

use super::{HoroscopeLookup, HoroscopeResult, Sign, format_date, truncate_chars};
use crate::vk::WallSource;

/// Maximum message length accepted by the channel.
pub const DIGEST_CHUNK_LIMIT: usize = 2000;

/// Pause between two consecutive digest messages.
pub const DELIVERY_PAUSE: Duration = Duration::from_secs(1);

const SEPARATOR: &str = "\n\n";

/// Reserved per block when deciding whether it still fits the current chunk.
const SEPARATOR_OVERHEAD: usize = 4;

/// Destination for outgoing channel messages.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, channel_id: u64, text: &str) -> anyhow::Result<()>;
}

/// Lower-case Russian weekday name.
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "понедельник",
        Weekday::Tue => "вторник",
        Weekday::Wed => "среда",
        Weekday::Thu => "четверг",
        Weekday::Fri => "пятница",
        Weekday::Sat => "суббота",
        Weekday::Sun => "воскресенье",
    }
}

/// Title line that opens the first digest message.
#[must_use]
pub fn digest_header(date: NaiveDate) -> String {
    format!(
        "🌅 **НЕЙРОГОРОСКОПЫ НА {}** ({}){SEPARATOR}",
        format_date(date),
        weekday_name(date.weekday())
    )
}

/// One sign's section of the digest.
#[must_use]
pub fn format_block(result: &HoroscopeResult) -> String {
    format!("**{}**\n{}", result.sign, result.render_text())
}

/// Packs `blocks` into chunks of at most `limit` characters.
///
/// The first chunk starts with `header`. Each block is followed by a blank
/// line. A block too long for any chunk is cut short with an ellipsis.
#[must_use]
pub fn pack_chunks(header: &str, blocks: &[String], limit: usize) -> Vec<String> {
    let max_block = limit.saturating_sub(SEPARATOR_OVERHEAD);
    let mut chunks = Vec::new();
    let mut current = header.to_owned();
    let mut current_len = current.chars().count();

    for block in blocks {
        let block = truncate_chars(block, max_block);
        let block_len = block.chars().count();

        if current_len + block_len + SEPARATOR_OVERHEAD > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(&block);
        current.push_str(SEPARATOR);
        current_len += block_len + SEPARATOR.len();
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Builds the chunked digest out of already looked-up results.
#[must_use]
pub fn digest_from_results(date: NaiveDate, results: &[HoroscopeResult]) -> Vec<String> {
    let blocks: Vec<String> = results.iter().map(format_block).collect();
    pack_chunks(&digest_header(date), &blocks, DIGEST_CHUNK_LIMIT)
}

/// Looks up every sign for `date` and returns the digest messages.
pub async fn compile_digest<S: WallSource>(
    lookup: &HoroscopeLookup<S>,
    date: NaiveDate,
    today: NaiveDate,
) -> Vec<String> {
    let mut results = Vec::with_capacity(Sign::ALL.len());
    for sign in Sign::ALL {
        results.push(lookup.lookup(sign, date, today).await);
    }

    let found = results.iter().filter(|r| r.is_found()).count();
    let chunks = digest_from_results(date, &results);
    info!(
        "Compiled digest for {}: {}/{} signs found, {} message(s)",
        date,
        found,
        results.len(),
        chunks.len()
    );
    chunks
}

/// Sends `chunks` to `channel_id` one by one, pausing after each message.
///
/// A failed send is logged and skipped. Returns how many messages went out.
pub async fn deliver_digest<K: MessageSink + ?Sized>(
    sink: &K,
    channel_id: u64,
    chunks: &[String],
    pause: Duration,
) -> usize {
    let mut delivered = 0;
    for (index, chunk) in chunks.iter().enumerate() {
        match sink.send(channel_id, chunk).await {
            Ok(()) => {
                delivered += 1;
                debug!("Digest message {}/{} sent", index + 1, chunks.len());
            }
            Err(e) => warn!("Failed to send digest message {}: {}", index + 1, e),
        }
        tokio::time::sleep(pause).await;
    }
    delivered
}
