//! Per-user date selection state.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::debug;

/// Idle time after which a session is forgotten.
///
/// Twice the picker control timeout. The idle timer is refreshed before the
/// lookup runs and the picker is rendered, so the session must outlive any
/// control rendered from it.
pub const SESSION_TTL: Duration = Duration::from_secs(600);

/// Direction of a one-day date step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStep {
    Back,
    Forward,
}

impl DateStep {
    /// Applies the step to `date`. Dates at the edge of the calendar stay put.
    #[must_use]
    pub fn apply(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Back => date.pred_opt().unwrap_or(date),
            Self::Forward => date.succ_opt().unwrap_or(date),
        }
    }
}

/// A user's current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSession {
    pub user_id: u64,
    pub selected_date: NaiveDate,
}

#[derive(Debug)]
struct Entry {
    selected_date: NaiveDate,
    touched_at: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.touched_at.elapsed() >= ttl
    }
}

/// Sessions keyed by Discord user id, evicted after an idle TTL.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    entries: HashMap<u64, Entry>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SESSION_TTL)
    }
}

impl SessionStore {
    /// Creates an empty store with the given idle TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns the user's session, starting a new one at `today` if there is
    /// no live entry. Refreshes the idle timer.
    pub fn get_or_create(&mut self, user_id: u64, today: NaiveDate) -> SelectionSession {
        self.evict_expired();
        let entry = self.entries.entry(user_id).or_insert_with(|| {
            debug!("New selection session for user {}", user_id);
            Entry {
                selected_date: today,
                touched_at: Instant::now(),
            }
        });
        entry.touched_at = Instant::now();

        SelectionSession {
            user_id,
            selected_date: entry.selected_date,
        }
    }

    /// Moves the user's selected date by one day and returns the new session.
    pub fn step_date(
        &mut self,
        user_id: u64,
        step: DateStep,
        today: NaiveDate,
    ) -> SelectionSession {
        let current = self.get_or_create(user_id, today);
        let selected_date = step.apply(current.selected_date);

        if let Some(entry) = self.entries.get_mut(&user_id) {
            entry.selected_date = selected_date;
        }

        SelectionSession {
            user_id,
            selected_date,
        }
    }

    /// Drops idle sessions. Returns how many were removed.
    pub fn evict_expired(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Evicted {} idle selection session(s)", removed);
        }
        removed
    }

    /// Number of sessions currently held, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
