//! Selection session store.
//!
//! Remembers which date each user is browsing between picker interactions.

mod store;

pub use store::{DateStep, SESSION_TTL, SelectionSession, SessionStore};
