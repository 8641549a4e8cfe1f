//! Picker state machine.
//!
//! The picker starts in `SignUnselected` for the user's session date. Picking a
//! sign runs a lookup and moves to `SignSelected`; stepping the date moves back
//! to `SignUnselected` with the new date. Every transition yields exactly one
//! screen to send.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::SelectorAction;
use super::view::{Screen, render, render_prompt};
use crate::horoscope::{HoroscopeLookup, HoroscopeResult};
use crate::session::SessionStore;
use crate::vk::WallSource;

/// Where a picker ends up after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorState {
    SignUnselected { date: NaiveDate },
    SignSelected { date: NaiveDate, result: HoroscopeResult },
}

impl SelectorState {
    /// Date the next picker is bound to.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::SignUnselected { date } | Self::SignSelected { date, .. } => *date,
        }
    }
}

/// Drives picker transitions against the session store and the lookup.
pub struct SelectorHandler<S> {
    /// Shared per-user sessions.
    sessions: Arc<RwLock<SessionStore>>,

    /// Wall lookup used when a sign is picked.
    lookup: Arc<HoroscopeLookup<S>>,
}

impl<S: WallSource> SelectorHandler<S> {
    /// Creates a new selector handler.
    #[must_use]
    pub fn new(sessions: Arc<RwLock<SessionStore>>, lookup: Arc<HoroscopeLookup<S>>) -> Self {
        Self { sessions, lookup }
    }

    /// Opens a picker for `user_id` (the slash command response).
    pub async fn open(&self, user_id: u64, today: NaiveDate) -> Screen {
        let (session, live) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_or_create(user_id, today);
            (session, sessions.len())
        };
        info!(
            "Picker opened by {} for {} ({} live session(s))",
            user_id, session.selected_date, live
        );
        render_prompt(user_id, session.selected_date)
    }

    /// Executes `action` and renders the resulting state.
    pub async fn handle(&self, action: SelectorAction, today: NaiveDate) -> Screen {
        debug!("Handling picker action: {}", action);
        let state = self.execute(action, today).await;
        render(&state, action.owner())
    }

    /// Executes a parsed action.
    pub async fn execute(&self, action: SelectorAction, today: NaiveDate) -> SelectorState {
        match action {
            SelectorAction::PickSign { owner, sign } => {
                // The lock is released before the lookup awaits the network.
                let date = self.sessions.write().await.get_or_create(owner, today).selected_date;
                let result = self.lookup.lookup(sign, date, today).await;
                SelectorState::SignSelected { date, result }
            }
            SelectorAction::StepDate { owner, step } => {
                let session = self.sessions.write().await.step_date(owner, step, today);
                SelectorState::SignUnselected {
                    date: session.selected_date,
                }
            }
        }
    }
}

impl<S> std::fmt::Debug for SelectorHandler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorHandler").finish_non_exhaustive()
    }
}
