//! Horoscope lookup over recent wall posts.
//!
//! A lookup fetches one page of the newest posts, skips the pinned one, keeps
//! posts published on the requested calendar date and returns the text from the
//! line that starts with the sign label through the end of the post.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{Sign, format_date};
use crate::vk::{WallPost, WallSource};

/// How old the matched post is relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    Today,
    Yesterday,
    DayBeforeYesterday,
    DaysAgo(i64),
    /// The post is dated after "today" (clock skew between VK and the host).
    InFuture(i64),
}

impl Recency {
    /// Classifies the day difference between `post_date` and `today`.
    #[must_use]
    pub fn between(post_date: NaiveDate, today: NaiveDate) -> Self {
        match (today - post_date).num_days() {
            0 => Self::Today,
            1 => Self::Yesterday,
            2 => Self::DayBeforeYesterday,
            n if n < 0 => Self::InFuture(-n),
            n => Self::DaysAgo(n),
        }
    }
}

impl fmt::Display for Recency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("сегодня"),
            Self::Yesterday => f.write_str("вчера"),
            Self::DayBeforeYesterday => f.write_str("позавчера"),
            Self::DaysAgo(n) => write!(f, "{n} {} назад", days_word(*n)),
            Self::InFuture(n) => write!(f, "через {n} {}", days_word(*n)),
        }
    }
}

/// Russian plural form of "day" agreeing with `n`.
fn days_word(n: i64) -> &'static str {
    let n = n.abs();
    match (n % 10, n % 100) {
        (1, rem) if rem != 11 => "день",
        (2..=4, rem) if !(12..=14).contains(&rem) => "дня",
        _ => "дней",
    }
}

/// What a single lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found {
        excerpt: String,
        post_date: NaiveDate,
        recency: Recency,
    },
    NotFound,
    /// The feed could not be fetched; carries the error description.
    Failed(String),
}

/// Horoscope for one sign on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoroscopeResult {
    pub sign: Sign,
    pub date: NaiveDate,
    pub outcome: LookupOutcome,
}

impl HoroscopeResult {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self.outcome, LookupOutcome::Found { .. })
    }

    /// Text shown to users: the excerpt with a date footer, or a marker line.
    #[must_use]
    pub fn render_text(&self) -> String {
        match &self.outcome {
            LookupOutcome::Found {
                excerpt,
                post_date,
                recency,
            } => format!("{excerpt}\n\n*({}, {recency})*", format_date(*post_date)),
            LookupOutcome::NotFound => format!(
                "❌ Гороскоп для {} на {} не найден",
                self.sign,
                format_date(self.date)
            ),
            LookupOutcome::Failed(reason) => format!("❌ Ошибка: {reason}"),
        }
    }
}

/// Returns the text from the first line starting with `label` to the end of `text`.
#[must_use]
pub fn extract_excerpt<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    if label.is_empty() {
        return None;
    }
    text.match_indices(label)
        .map(|(start, _)| start)
        .find(|&start| start == 0 || text[..start].ends_with('\n'))
        .map(|start| text[start..].trim_end())
}

/// Finds the first non-pinned post dated `date` that carries `sign`.
#[must_use]
pub fn find_in_posts<'a>(
    posts: &'a [WallPost],
    sign: Sign,
    date: NaiveDate,
) -> Option<(&'a str, NaiveDate)> {
    posts
        .iter()
        .filter(|post| !post.pinned)
        .filter(|post| post.local_date() == date)
        .find_map(|post| {
            extract_excerpt(&post.text, sign.label()).map(|excerpt| (excerpt, date))
        })
}

/// Looks horoscopes up on one community wall.
#[derive(Debug)]
pub struct HoroscopeLookup<S> {
    source: S,
    owner_id: i64,
    lookback: usize,
}

impl<S: WallSource> HoroscopeLookup<S> {
    /// Creates a lookup scanning the `lookback` newest posts of `owner_id`.
    #[must_use]
    pub fn new(source: S, owner_id: i64, lookback: usize) -> Self {
        Self {
            source,
            owner_id,
            lookback,
        }
    }

    /// Looks up `sign` on `date`, labelling recency relative to `today`.
    ///
    /// Never fails: fetch errors become [`LookupOutcome::Failed`].
    pub async fn lookup(&self, sign: Sign, date: NaiveDate, today: NaiveDate) -> HoroscopeResult {
        let outcome = match self.source.fetch_recent_posts(self.owner_id, self.lookback).await {
            Ok(posts) => match find_in_posts(&posts, sign, date) {
                Some((excerpt, post_date)) => LookupOutcome::Found {
                    excerpt: excerpt.to_owned(),
                    post_date,
                    recency: Recency::between(post_date, today),
                },
                None => LookupOutcome::NotFound,
            },
            Err(e) => {
                warn!("Horoscope lookup for {} failed: {}", sign.key(), e);
                LookupOutcome::Failed(e.to_string())
            }
        };

        debug!(
            "Lookup {} on {}: {}",
            sign.key(),
            date,
            match &outcome {
                LookupOutcome::Found { .. } => "found",
                LookupOutcome::NotFound => "not found",
                LookupOutcome::Failed(_) => "failed",
            }
        );

        HoroscopeResult {
            sign,
            date,
            outcome,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Local, TimeZone, Utc};

    use super::*;
    use crate::vk::VkError;

    /// In-memory feed returning a fixed set of posts (or an error).
    pub(crate) struct FakeWall {
        pub posts: Vec<WallPost>,
        pub fail_with: Option<String>,
        pub calls: Mutex<Vec<(i64, usize)>>,
    }

    impl FakeWall {
        pub(crate) fn with_posts(posts: Vec<WallPost>) -> Self {
            Self {
                posts,
                fail_with: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                posts: Vec::new(),
                fail_with: Some(message.to_owned()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WallSource for FakeWall {
        async fn fetch_recent_posts(
            &self,
            owner_id: i64,
            limit: usize,
        ) -> Result<Vec<WallPost>, VkError> {
            self.calls.lock().unwrap().push((owner_id, limit));
            if let Some(message) = &self.fail_with {
                return Err(VkError::Api {
                    code: 5,
                    message: message.clone(),
                });
            }
            Ok(self.posts.iter().take(limit).cloned().collect())
        }
    }

    /// A post published at local noon on `date`.
    pub(crate) fn post_on(id: i64, date: NaiveDate, text: &str, pinned: bool) -> WallPost {
        let local_noon = Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap();
        WallPost {
            id,
            text: text.to_owned(),
            published_at: local_noon.with_timezone(&Utc),
            pinned,
        }
    }

    pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_recency_labels() {
        let today = day(2024, 3, 10);
        assert_eq!(Recency::between(today, today).to_string(), "сегодня");
        assert_eq!(Recency::between(day(2024, 3, 9), today).to_string(), "вчера");
        assert_eq!(Recency::between(day(2024, 3, 8), today).to_string(), "позавчера");
        assert_eq!(Recency::between(day(2024, 3, 7), today).to_string(), "3 дня назад");
        assert_eq!(Recency::between(day(2024, 3, 5), today).to_string(), "5 дней назад");
        assert_eq!(Recency::between(day(2024, 2, 18), today).to_string(), "21 день назад");
        assert_eq!(Recency::between(day(2024, 2, 28), today).to_string(), "11 дней назад");
        assert_eq!(Recency::between(day(2024, 3, 11), today), Recency::InFuture(1));
    }

    #[test]
    fn test_extract_excerpt_runs_to_end_of_post() {
        let text = "Гороскоп на сегодня\n♈️Овен: great day\nstay calm\n\n♉️Телец: meh\n";
        let excerpt = extract_excerpt(text, Sign::Aries.label()).unwrap();
        assert_eq!(excerpt, "♈️Овен: great day\nstay calm\n\n♉️Телец: meh");
    }

    #[test]
    fn test_extract_excerpt_requires_line_start() {
        let text = "Сегодня ♈️Овен отдыхает\nничего";
        assert_eq!(extract_excerpt(text, Sign::Aries.label()), None);

        let text = "Сегодня ♈️Овен отдыхает\n♈️Овен: работает";
        assert_eq!(extract_excerpt(text, Sign::Aries.label()), Some("♈️Овен: работает"));
    }

    #[test]
    fn test_extract_excerpt_is_case_sensitive() {
        assert_eq!(extract_excerpt("♈️овен: hi", Sign::Aries.label()), None);
    }

    #[tokio::test]
    async fn test_lookup_finds_todays_post() {
        let today = day(2024, 3, 10);
        let wall = FakeWall::with_posts(vec![post_on(
            1,
            today,
            "Intro\n♈️Овен: great day\nmore lines\nend",
            false,
        )]);
        let lookup = HoroscopeLookup::new(wall, -1, 100);

        let result = lookup.lookup(Sign::Aries, today, today).await;
        assert_eq!(
            result.outcome,
            LookupOutcome::Found {
                excerpt: "♈️Овен: great day\nmore lines\nend".to_owned(),
                post_date: today,
                recency: Recency::Today,
            }
        );
        assert!(result.render_text().ends_with("*(10.03.2024, сегодня)*"));
    }

    #[tokio::test]
    async fn test_pinned_posts_never_match() {
        let today = day(2024, 3, 10);
        let wall = FakeWall::with_posts(vec![post_on(1, today, "♈️Овен: pinned", true)]);
        let lookup = HoroscopeLookup::new(wall, -1, 100);

        let result = lookup.lookup(Sign::Aries, today, today).await;
        assert_eq!(result.outcome, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_other_dates_are_skipped() {
        let today = day(2024, 3, 10);
        let wall = FakeWall::with_posts(vec![
            post_on(3, today, "♈️Овен: today", false),
            post_on(2, day(2024, 3, 9), "♈️Овен: yesterday", false),
        ]);
        let lookup = HoroscopeLookup::new(wall, -1, 100);

        let result = lookup.lookup(Sign::Aries, day(2024, 3, 9), today).await;
        assert_eq!(
            result.outcome,
            LookupOutcome::Found {
                excerpt: "♈️Овен: yesterday".to_owned(),
                post_date: day(2024, 3, 9),
                recency: Recency::Yesterday,
            }
        );
    }

    #[tokio::test]
    async fn test_scan_continues_past_posts_without_sign() {
        let today = day(2024, 3, 10);
        let wall = FakeWall::with_posts(vec![
            post_on(3, today, "Анонс эфира", false),
            post_on(2, today, "♊️Близнецы: новости", false),
        ]);
        let lookup = HoroscopeLookup::new(wall, -1, 100);

        let result = lookup.lookup(Sign::Gemini, today, today).await;
        assert!(result.is_found());
    }

    #[tokio::test]
    async fn test_not_found_names_sign_and_date() {
        let wall = FakeWall::with_posts(vec![post_on(1, day(2024, 3, 1), "♈️Овен: old", false)]);
        let lookup = HoroscopeLookup::new(wall, -1, 100);

        let result = lookup.lookup(Sign::Leo, day(2024, 3, 10), day(2024, 3, 10)).await;
        assert_eq!(result.outcome, LookupOutcome::NotFound);
        assert_eq!(result.render_text(), "❌ Гороскоп для ♌️Лев на 10.03.2024 не найден");
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_error_marker() {
        let lookup = HoroscopeLookup::new(FakeWall::failing("User authorization failed"), -1, 100);

        let result = lookup.lookup(Sign::Aries, day(2024, 3, 10), day(2024, 3, 10)).await;
        assert!(matches!(result.outcome, LookupOutcome::Failed(_)));
        assert_eq!(
            result.render_text(),
            "❌ Ошибка: VK API error (5): User authorization failed"
        );
    }

    #[tokio::test]
    async fn test_lookback_bounds_the_fetch() {
        let wall = FakeWall::with_posts(Vec::new());
        let lookup = HoroscopeLookup::new(wall, -193_489_972, 25);
        lookup.lookup(Sign::Aries, day(2024, 3, 10), day(2024, 3, 10)).await;

        let calls = lookup.source.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(-193_489_972, 25)]);
    }
}
