//! VK API module.
//!
//! Fetches community wall posts for the horoscope lookup, with client-side
//! rate limiting.

mod client;
mod rate_limiter;
mod wall;

pub use client::{VkClient, VkError};
pub use rate_limiter::{RateLimiter, VK_MIN_INTERVAL};
pub use wall::{WallPost, WallSource};
