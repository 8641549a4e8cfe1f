//! Horoscope domain: signs, wall lookup and the daily digest.

mod digest;
pub(crate) mod lookup;
mod sign;

pub use digest::{
    DELIVERY_PAUSE, DIGEST_CHUNK_LIMIT, MessageSink, compile_digest, deliver_digest,
    digest_from_results, digest_header, format_block, pack_chunks, weekday_name,
};
pub use lookup::{
    HoroscopeLookup, HoroscopeResult, LookupOutcome, Recency, extract_excerpt, find_in_posts,
};
pub use sign::{Sign, UnknownSign};

use chrono::NaiveDate;

/// Formats a date the way the group and the bot display it (`dd.mm.yyyy`).
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Cuts `text` to at most `max_chars` characters, ending with `…` when shortened.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
