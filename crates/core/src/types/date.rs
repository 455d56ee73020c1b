//! Calendar date a task is planned for.

use core::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PlanDate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanDateError {
    /// The input string is empty.
    #[error("date cannot be empty")]
    Empty,
    /// The input is not shaped like `YYYY-MM-DD`.
    #[error("date must be formatted as YYYY-MM-DD (got {0:?})")]
    Format(String),
    /// The input is shaped correctly but names no real day.
    #[error("date {0:?} does not exist")]
    OutOfRange(String),
}

/// A calendar day in ISO 8601 `YYYY-MM-DD` form.
///
/// Tasks are grouped by the string form of this date, so [`Display`](fmt::Display)
/// always produces exactly ten characters with zero padding.
///
/// ## Examples
///
/// ```
/// use daily_planner_core::PlanDate;
///
/// assert!(PlanDate::parse("2024-06-01").is_ok());
///
/// assert!(PlanDate::parse("2024-6-1").is_err());    // not zero padded
/// assert!(PlanDate::parse("2024-02-30").is_err());  // no such day
/// assert!(PlanDate::parse("06/01/2024").is_err());  // wrong format
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlanDate(NaiveDate);

impl PlanDate {
    /// The `chrono` format string matching the wire representation.
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Parse a `PlanDate` from a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not zero-padded `YYYY-MM-DD`,
    /// or names a day that does not exist.
    pub fn parse(s: &str) -> Result<Self, PlanDateError> {
        if s.is_empty() {
            return Err(PlanDateError::Empty);
        }

        let well_formed = s.len() == 10
            && s.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(PlanDateError::Format(s.to_owned()));
        }

        NaiveDate::parse_from_str(s, Self::FORMAT)
            .map(Self)
            .map_err(|_| PlanDateError::OutOfRange(s.to_owned()))
    }

    /// Wrap a `chrono` date.
    #[must_use]
    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in the local timezone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Get the underlying `chrono` date.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Long human-readable form, e.g. `Sat Jun 01 2024`.
    #[must_use]
    pub fn long_form(&self) -> String {
        self.0.format("%a %b %d %Y").to_string()
    }
}

impl fmt::Display for PlanDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl std::str::FromStr for PlanDate {
    type Err = PlanDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlanDate {
    type Error = PlanDateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlanDate> for String {
    fn from(date: PlanDate) -> Self {
        date.to_string()
    }
}

impl From<NaiveDate> for PlanDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
