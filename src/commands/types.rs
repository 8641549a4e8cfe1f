//! Picker actions and component ids.

use std::fmt;
use std::time::Duration;

use crate::horoscope::Sign;
use crate::session::DateStep;

/// Name of the slash command that opens the picker.
pub const HOROSCOPE_COMMAND: &str = "horoscope";

/// Every picker component id starts with this.
pub const COMPONENT_PREFIX: &str = "horoscope_";

/// Sign select menu id prefix. The owner's user id follows.
pub const SIGN_MENU_PREFIX: &str = "horoscope_sign_";

/// Previous-day button id prefix. The owner's user id follows.
pub const PREV_DAY_PREFIX: &str = "horoscope_prev_";

/// Next-day button id prefix. The owner's user id follows.
pub const NEXT_DAY_PREFIX: &str = "horoscope_next_";

/// Prefix of the disabled date label button. It never fires.
pub const DATE_LABEL_PREFIX: &str = "horoscope_date_";

/// How long a rendered picker keeps accepting clicks.
pub const CONTROL_TIMEOUT: Duration = Duration::from_secs(300);

/// A user action on a rendered picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorAction {
    /// A sign was chosen in the select menu.
    PickSign { owner: u64, sign: Sign },

    /// One of the arrow buttons was pressed.
    StepDate { owner: u64, step: DateStep },
}

impl SelectorAction {
    /// Parses a component interaction into an action.
    ///
    /// `values` are the selected menu values (empty for buttons). Returns
    /// `None` for ids that are not picker actions.
    #[must_use]
    pub fn parse(custom_id: &str, values: &[String]) -> Option<Self> {
        if let Some(owner) = custom_id.strip_prefix(SIGN_MENU_PREFIX) {
            let owner = owner.parse().ok()?;
            let sign = values.first()?.parse().ok()?;
            return Some(Self::PickSign { owner, sign });
        }

        let (step, owner) = if let Some(owner) = custom_id.strip_prefix(PREV_DAY_PREFIX) {
            (DateStep::Back, owner)
        } else if let Some(owner) = custom_id.strip_prefix(NEXT_DAY_PREFIX) {
            (DateStep::Forward, owner)
        } else {
            return None;
        };

        Some(Self::StepDate {
            owner: owner.parse().ok()?,
            step,
        })
    }

    /// The user whose session this action reads and mutates.
    #[must_use]
    pub const fn owner(&self) -> u64 {
        match self {
            Self::PickSign { owner, .. } | Self::StepDate { owner, .. } => *owner,
        }
    }
}

impl fmt::Display for SelectorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PickSign { owner, sign } => write!(f, "pick {} for {owner}", sign.key()),
            Self::StepDate { owner, step } => write!(f, "step {step:?} for {owner}"),
        }
    }
}

/// Id of the sign select menu owned by `owner`.
#[must_use]
pub fn sign_menu_id(owner: u64) -> String {
    format!("{SIGN_MENU_PREFIX}{owner}")
}

/// Id of the `⬅️` button owned by `owner`.
#[must_use]
pub fn prev_day_id(owner: u64) -> String {
    format!("{PREV_DAY_PREFIX}{owner}")
}

/// Id of the `➡️` button owned by `owner`.
#[must_use]
pub fn next_day_id(owner: u64) -> String {
    format!("{NEXT_DAY_PREFIX}{owner}")
}

/// Id of the date label between the arrows.
#[must_use]
pub fn date_label_id(owner: u64) -> String {
    format!("{DATE_LABEL_PREFIX}{owner}")
}

/// Whether a control rendered at `rendered_at` (unix seconds) has timed out.
#[must_use]
pub fn is_control_expired(rendered_at: i64, now: i64) -> bool {
    let timeout = i64::try_from(CONTROL_TIMEOUT.as_secs()).unwrap_or(i64::MAX);
    now.saturating_sub(rendered_at) >= timeout
}
