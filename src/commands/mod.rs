//! Horoscope picker: component actions, state machine and rendering.

mod handler;
mod types;
pub mod view;

pub use handler::{SelectorHandler, SelectorState};
pub use types::{
    COMPONENT_PREFIX, CONTROL_TIMEOUT, HOROSCOPE_COMMAND, SelectorAction, is_control_expired,
};
pub use view::{Picker, ResultCard, Screen, SignOption};
