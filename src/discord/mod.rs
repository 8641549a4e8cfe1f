//! Discord adapter.
//!
//! Registers the `/horoscope` command, feeds component interactions into the
//! picker state machine and delivers digest messages to channels.

mod handler;
mod sink;
mod view;

pub use handler::Handler;
pub use sink::ChannelSink;
pub use view::{followup_message, picker_rows, register, response_message, result_embed};
