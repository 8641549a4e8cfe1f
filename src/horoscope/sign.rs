//! Zodiac signs and their display labels.

use std::fmt;
use std::str::FromStr;

/// One of the twelve zodiac signs, in the order the digest lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    /// All signs in enumeration order.
    pub const ALL: [Self; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    /// Canonical label as it appears at the start of a line in wall posts.
    ///
    /// The glyph is followed by U+FE0F (emoji presentation selector), exactly
    /// as the source group writes it.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aries => "♈\u{fe0f}Овен",
            Self::Taurus => "♉\u{fe0f}Телец",
            Self::Gemini => "♊\u{fe0f}Близнецы",
            Self::Cancer => "♋\u{fe0f}Рак",
            Self::Leo => "♌\u{fe0f}Лев",
            Self::Virgo => "♍\u{fe0f}Дева",
            Self::Libra => "♎\u{fe0f}Весы",
            Self::Scorpio => "♏\u{fe0f}Скорпион",
            Self::Sagittarius => "♐\u{fe0f}Стрелец",
            Self::Capricorn => "♑\u{fe0f}Козерог",
            Self::Aquarius => "♒\u{fe0f}Водолей",
            Self::Pisces => "♓\u{fe0f}Рыбы",
        }
    }

    /// Bare zodiac glyph, used as the select option emoji.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Aries => '♈',
            Self::Taurus => '♉',
            Self::Gemini => '♊',
            Self::Cancer => '♋',
            Self::Leo => '♌',
            Self::Virgo => '♍',
            Self::Libra => '♎',
            Self::Scorpio => '♏',
            Self::Sagittarius => '♐',
            Self::Capricorn => '♑',
            Self::Aquarius => '♒',
            Self::Pisces => '♓',
        }
    }

    /// Stable ASCII key used as the select menu value.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Aries => "aries",
            Self::Taurus => "taurus",
            Self::Gemini => "gemini",
            Self::Cancer => "cancer",
            Self::Leo => "leo",
            Self::Virgo => "virgo",
            Self::Libra => "libra",
            Self::Scorpio => "scorpio",
            Self::Sagittarius => "sagittarius",
            Self::Capricorn => "capricorn",
            Self::Aquarius => "aquarius",
            Self::Pisces => "pisces",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known sign.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown zodiac sign: {0}")]
pub struct UnknownSign(pub String);

impl FromStr for Sign {
    type Err = UnknownSign;

    /// Accepts either the ASCII key or the full display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sign| sign.key() == s || sign.label() == s)
            .ok_or_else(|| UnknownSign(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_start_with_glyph() {
        for sign in Sign::ALL {
            assert!(sign.label().starts_with(sign.glyph()), "{sign:?}");
        }
    }

    #[test]
    fn test_label_matches_source_spelling() {
        assert_eq!(Sign::Aries.label(), "♈️Овен");
        assert_eq!(Sign::Pisces.label(), "♓️Рыбы");
    }

    #[test]
    fn test_parse_key_and_label() {
        assert_eq!("leo".parse::<Sign>(), Ok(Sign::Leo));
        assert_eq!("♌️Лев".parse::<Sign>(), Ok(Sign::Leo));
        assert!("ophiuchus".parse::<Sign>().is_err());
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = Sign::ALL.iter().map(|s| s.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 12);
    }
}
