//! Platform-independent description of what the picker shows.
//!
//! `render` maps a picker state to a [`Screen`]; the Discord adapter turns a
//! screen into message builders. Nothing here talks to the network.

use chrono::NaiveDate;

use super::handler::SelectorState;
use super::types::{date_label_id, next_day_id, prev_day_id, sign_menu_id};
use crate::horoscope::{HoroscopeResult, Sign, format_date, truncate_chars};

pub const ARROW_LEFT: &str = "⬅️";
pub const ARROW_RIGHT: &str = "➡️";
pub const PICKER_PLACEHOLDER: &str = "🔮 Выбери свой знак зодиака";
pub const PICKER_PROMPT: &str = "🔮 **Выбери свой знак зодиака**";

/// Purple accent of the result card.
pub const RESULT_COLOUR: u32 = 0x009B_59B6;

/// Discord rejects embed descriptions longer than this.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// One entry of the sign select menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOption {
    pub label: &'static str,
    pub value: &'static str,
    pub emoji: char,
}

/// Sign menu plus the date stepper row, bound to one user's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub owner: u64,
    pub date: NaiveDate,
}

impl Picker {
    /// Creates a picker for `owner` showing `date`.
    #[must_use]
    pub fn new(owner: u64, date: NaiveDate) -> Self {
        Self { owner, date }
    }

    /// Custom id of the sign select menu.
    #[must_use]
    pub fn menu_id(&self) -> String {
        sign_menu_id(self.owner)
    }

    /// Custom id of the previous-day button.
    #[must_use]
    pub fn prev_id(&self) -> String {
        prev_day_id(self.owner)
    }

    /// Custom id of the next-day button.
    #[must_use]
    pub fn next_id(&self) -> String {
        next_day_id(self.owner)
    }

    /// Custom id of the disabled date label.
    #[must_use]
    pub fn date_id(&self) -> String {
        date_label_id(self.owner)
    }

    /// Text of the disabled middle button.
    #[must_use]
    pub fn date_label(&self) -> String {
        format_date(self.date)
    }

    /// The twelve sign options in enumeration order.
    #[must_use]
    pub fn options(&self) -> Vec<SignOption> {
        Sign::ALL
            .into_iter()
            .map(|sign| SignOption {
                label: sign.label(),
                value: sign.key(),
                emoji: sign.glyph(),
            })
            .collect()
    }
}

/// Embed showing one horoscope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: String,
    pub description: String,
    pub colour: u32,
}

impl ResultCard {
    #[must_use]
    pub fn from_result(result: &HoroscopeResult) -> Self {
        Self {
            title: format!("🔮 {} | {}", result.sign, format_date(result.date)),
            description: truncate_chars(&result.render_text(), EMBED_DESCRIPTION_LIMIT),
            colour: RESULT_COLOUR,
        }
    }
}

/// Everything one outgoing picker message carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub content: Option<String>,
    pub card: Option<ResultCard>,
    pub picker: Picker,
    pub ephemeral: bool,
}

/// Initial reply to the slash command.
#[must_use]
pub fn render_prompt(owner: u64, date: NaiveDate) -> Screen {
    Screen {
        content: Some(PICKER_PROMPT.to_owned()),
        card: None,
        picker: Picker::new(owner, date),
        ephemeral: false,
    }
}

/// Follow-up message produced by a transition.
#[must_use]
pub fn render(state: &SelectorState, owner: u64) -> Screen {
    match state {
        SelectorState::SignUnselected { date } => Screen {
            content: Some(format!("📅 Выбрана дата: {}", format_date(*date))),
            card: None,
            picker: Picker::new(owner, *date),
            ephemeral: true,
        },
        SelectorState::SignSelected { date, result } => Screen {
            content: None,
            card: Some(ResultCard::from_result(result)),
            picker: Picker::new(owner, *date),
            ephemeral: false,
        },
    }
}
