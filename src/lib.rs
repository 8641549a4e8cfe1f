//! Horoscope Bot Library
//!
//! A Discord bot that serves daily horoscopes published on a VK community wall.
//!
//! This crate provides the core functionality for:
//! - Fetching recent wall posts through the VK API
//! - Finding a sign's excerpt for a given date
//! - The interactive sign/date picker behind the `/horoscope` command
//! - Compiling and posting the daily digest to a channel

pub mod commands;
pub mod config;
pub mod discord;
pub mod health;
pub mod horoscope;
pub mod scheduler;
pub mod session;
pub mod vk;
