//! Daily digest scheduler.
//!
//! The loop sleeps until the next configured wall-clock time, compiles the
//! digest for the local date and delivers it to the channel. Messages on the
//! control channel can force an immediate post or stop the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::horoscope::{
    DELIVERY_PAUSE, HoroscopeLookup, MessageSink, compile_digest, deliver_digest,
};
use crate::vk::WallSource;

/// Messages that can be sent to the scheduler.
#[derive(Debug, Clone)]
pub enum SchedulerMessage {
    /// Compile and post the digest right away.
    PostNow,
    /// Stop the scheduler.
    Shutdown,
}

/// Next moment at or after `now` that falls on `at`, strictly in the future.
#[must_use]
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today_at = now.date().and_time(at);
    if today_at > now {
        today_at
    } else {
        today_at + TimeDelta::days(1)
    }
}

/// Posts the horoscope digest once a day.
pub struct DigestScheduler<S> {
    /// Wall lookup shared with the picker.
    lookup: Arc<HoroscopeLookup<S>>,

    /// Where digest messages go.
    sink: Arc<dyn MessageSink>,

    /// Destination channel.
    channel_id: u64,

    /// Local time of day to post at.
    post_at: NaiveTime,

    /// Pause between consecutive digest messages.
    pause: Duration,
}

impl<S: WallSource> DigestScheduler<S> {
    /// Creates a new digest scheduler.
    #[must_use]
    pub fn new(
        lookup: Arc<HoroscopeLookup<S>>,
        sink: Arc<dyn MessageSink>,
        channel_id: u64,
        post_at: NaiveTime,
    ) -> Self {
        Self {
            lookup,
            sink,
            channel_id,
            post_at,
            pause: DELIVERY_PAUSE,
        }
    }

    /// Sets the pause between digest messages.
    #[must_use]
    pub const fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Runs the scheduler loop.
    pub async fn run(&self, mut rx: mpsc::Receiver<SchedulerMessage>) {
        info!(
            "Digest scheduler started (channel {}, daily at {})",
            self.channel_id,
            self.post_at.format("%H:%M")
        );

        loop {
            let now = Local::now().naive_local();
            let next = next_run_after(now, self.post_at);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!("Next digest post at {} (in {:?})", next, wait);

            tokio::select! {
                () = tokio::time::sleep(wait) => {
                    self.post_digest().await;
                }
                msg = rx.recv() => {
                    match msg {
                        Some(SchedulerMessage::PostNow) => {
                            debug!("Received post-now message");
                            self.post_digest().await;
                        }
                        Some(SchedulerMessage::Shutdown) | None => {
                            info!("Scheduler shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Compiles today's digest and delivers it. Returns messages delivered.
    pub async fn post_digest(&self) -> usize {
        let today = Local::now().date_naive();
        let chunks = compile_digest(&self.lookup, today, today).await;
        let delivered =
            deliver_digest(self.sink.as_ref(), self.channel_id, &chunks, self.pause).await;
        info!(
            "Daily digest posted: {}/{} message(s) delivered to {}",
            delivered,
            chunks.len(),
            self.channel_id
        );
        delivered
    }
}

impl<S> std::fmt::Debug for DigestScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestScheduler")
            .field("channel_id", &self.channel_id)
            .field("post_at", &self.post_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::horoscope::Sign;
    use crate::horoscope::lookup::tests::{FakeWall, post_on};

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send(&self, _channel_id: u64, text: &str) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(text.to_owned());
            Ok(())
        }
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn moment(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_time(at(h, m))
    }

    #[test]
    fn test_next_run_later_today() {
        assert_eq!(next_run_after(moment(10, 0, 0), at(0, 1)), moment(10, 0, 1));
    }

    #[test]
    fn test_next_run_rolls_over_to_tomorrow() {
        assert_eq!(next_run_after(moment(10, 0, 1), at(0, 1)), moment(11, 0, 1));
        assert_eq!(next_run_after(moment(10, 18, 45), at(0, 1)), moment(11, 0, 1));
    }

    fn scheduler(sink: Arc<RecordingSink>) -> DigestScheduler<FakeWall> {
        let today = Local::now().date_naive();
        let text = format!("{}: отличный день", Sign::Taurus.label());
        let lookup = HoroscopeLookup::new(
            FakeWall::with_posts(vec![post_on(1, today, &text, false)]),
            -1,
            100,
        );
        DigestScheduler::new(Arc::new(lookup), sink, 7, at(0, 1)).with_pause(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_post_digest_delivers_every_chunk() {
        let sink = Arc::new(RecordingSink::default());
        let delivered = scheduler(Arc::clone(&sink)).post_digest().await;

        let sent = sink.sent.lock().unwrap();
        assert_eq!(delivered, sent.len());
        assert!(sent[0].starts_with("🌅 **НЕЙРОГОРОСКОПЫ НА"));
        assert!(sent.concat().contains("♉️Телец: отличный день"));
    }

    #[tokio::test]
    async fn test_run_handles_post_now_and_shutdown() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = scheduler(Arc::clone(&sink));
        let (tx, rx) = mpsc::channel(4);

        tx.send(SchedulerMessage::PostNow).await.unwrap();
        tx.send(SchedulerMessage::Shutdown).await.unwrap();
        scheduler.run(rx).await;

        assert!(!sink.sent.lock().unwrap().is_empty());
    }
}
