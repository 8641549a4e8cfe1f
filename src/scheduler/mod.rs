//! Daily digest scheduler module.
//!
//! Posts the compiled horoscope digest to the auto-post channel at a fixed
//! local time every day.

mod runner;

pub use runner::{DigestScheduler, SchedulerMessage, next_run_after};
