use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number used for the bullseye segments.
pub const BULL: u8 = 25;

/// A single thrown dart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "ring", content = "number", rename_all = "snake_case")]
pub enum Dart {
    Miss,
    Single(u8),
    Double(u8),
    Triple(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDartError {
    #[error("empty dart notation")]
    Empty,
    #[error("unknown dart notation '{0}'")]
    Unknown(String),
    #[error("segment {number} cannot be hit with multiplier {multiplier}")]
    InvalidSegment { number: u8, multiplier: u8 },
}

impl Dart {
    /// Builds a dart from a board number and ring multiplier.
    /// `number == 0` or `multiplier == 0` is a miss.
    pub fn new(number: u8, multiplier: u8) -> Result<Self, ParseDartError> {
        let valid_number = (1..=20).contains(&number) || number == BULL;
        match (number, multiplier) {
            (0, _) | (_, 0) => Ok(Dart::Miss),
            (n, 1) if valid_number => Ok(Dart::Single(n)),
            (n, 2) if valid_number => Ok(Dart::Double(n)),
            (n, 3) if (1..=20).contains(&n) => Ok(Dart::Triple(n)),
            (number, multiplier) => Err(ParseDartError::InvalidSegment { number, multiplier }),
        }
    }

    pub fn number(&self) -> u8 {
        match *self {
            Dart::Miss => 0,
            Dart::Single(n) | Dart::Double(n) | Dart::Triple(n) => n,
        }
    }

    pub fn multiplier(&self) -> u8 {
        match self {
            Dart::Miss => 0,
            Dart::Single(_) => 1,
            Dart::Double(_) => 2,
            Dart::Triple(_) => 3,
        }
    }

    pub fn score(&self) -> u16 {
        self.number() as u16 * self.multiplier() as u16
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Dart::Double(_))
    }

    pub fn is_bull(&self) -> bool {
        self.number() == BULL
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Dart::Miss => write!(f, "Miss"),
            Dart::Single(BULL) => write!(f, "SB"),
            Dart::Double(BULL) => write!(f, "Bull"),
            Dart::Single(n) => write!(f, "{n}"),
            Dart::Double(n) => write!(f, "D{n}"),
            Dart::Triple(n) => write!(f, "T{n}"),
        }
    }
}

impl FromStr for Dart {
    type Err = ParseDartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_uppercase();
        if s.is_empty() {
            return Err(ParseDartError::Empty);
        }

        match s.as_str() {
            "M" | "MISS" | "0" => return Ok(Dart::Miss),
            "SB" | "OB" | "25" => return Ok(Dart::Single(BULL)),
            "DB" | "BULL" | "BE" | "50" => return Ok(Dart::Double(BULL)),
            _ => {}
        }

        let (multiplier, digits) = match s.as_bytes()[0] {
            b'S' => (1, &s[1..]),
            b'D' => (2, &s[1..]),
            b'T' => (3, &s[1..]),
            _ => (1, s.as_str()),
        };

        let number = digits
            .parse::<u8>()
            .map_err(|_| ParseDartError::Unknown(s.clone()))?;
        if number == 0 {
            return Err(ParseDartError::Unknown(s));
        }
        Dart::new(number, multiplier)
    }
}

/// Sum of a slice of darts.
pub fn total(darts: &[Dart]) -> u16 {
    darts.iter().map(Dart::score).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_notations() {
        assert_eq!("T20".parse::<Dart>(), Ok(Dart::Triple(20)));
        assert_eq!("d16".parse::<Dart>(), Ok(Dart::Double(16)));
        assert_eq!("5".parse::<Dart>(), Ok(Dart::Single(5)));
        assert_eq!("bull".parse::<Dart>(), Ok(Dart::Double(BULL)));
        assert_eq!("25".parse::<Dart>(), Ok(Dart::Single(BULL)));
        assert_eq!("miss".parse::<Dart>(), Ok(Dart::Miss));
    }

    #[test]
    fn rejects_impossible_segments() {
        assert!("T25".parse::<Dart>().is_err());
        assert!("D21".parse::<Dart>().is_err());
        assert!("X3".parse::<Dart>().is_err());
        assert_eq!("".parse::<Dart>(), Err(ParseDartError::Empty));
    }

    #[test]
    fn scores() {
        assert_eq!(Dart::Triple(20).score(), 60);
        assert_eq!(Dart::Double(BULL).score(), 50);
        assert_eq!(Dart::Miss.score(), 0);
        assert_eq!(total(&[Dart::Triple(19), Dart::Single(7), Dart::Double(16)]), 96);
    }

    #[test]
    fn display_uses_board_shorthand() {
        assert_eq!(Dart::Triple(20).to_string(), "T20");
        assert_eq!(Dart::Double(BULL).to_string(), "Bull");
        assert_eq!(Dart::Single(3).to_string(), "3");
    }
}
