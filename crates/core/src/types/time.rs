//! Wall-clock time of day (`HH:MM`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ClockTime`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockTimeError {
    /// The input is not shaped like `HH:MM`.
    #[error("time must be formatted as HH:MM (got {0:?})")]
    Format(String),
    /// Hour or minute is out of range.
    #[error("time {0:?} is out of range")]
    OutOfRange(String),
}

/// A 24-hour time of day with minute precision.
///
/// ```
/// use daily_planner_core::ClockTime;
///
/// let t = ClockTime::parse("09:30").unwrap();
/// assert_eq!(t.hour(), 9);
/// assert_eq!(t.to_string(), "09:30");
///
/// assert!(ClockTime::parse("24:00").is_err());
/// assert!(ClockTime::parse("9:30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Midnight, the default start and end time of the add-task form.
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Parse a `ClockTime` from an `HH:MM` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not zero-padded `HH:MM` or the hour
    /// or minute is out of range.
    pub fn parse(s: &str) -> Result<Self, ClockTimeError> {
        let (h, m) = s
            .split_once(':')
            .filter(|(h, m)| {
                h.len() == 2
                    && m.len() == 2
                    && h.bytes().all(|b| b.is_ascii_digit())
                    && m.bytes().all(|b| b.is_ascii_digit())
            })
            .ok_or_else(|| ClockTimeError::Format(s.to_owned()))?;

        let hour: u8 = h.parse().map_err(|_| ClockTimeError::Format(s.to_owned()))?;
        let minute: u8 = m.parse().map_err(|_| ClockTimeError::Format(s.to_owned()))?;

        if hour > 23 || minute > 59 {
            return Err(ClockTimeError::OutOfRange(s.to_owned()));
        }

        Ok(Self { hour, minute })
    }

    /// Hour of the day (0-23).
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute of the hour (0-59).
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}
