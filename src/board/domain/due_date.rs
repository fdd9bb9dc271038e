//! Calendar-day due dates.

use super::TaskDomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task due date with calendar-day semantics.
///
/// Time-of-day information in the input is discarded: two due dates are equal
/// when they fall on the same calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DueDate(NaiveDate);

impl DueDate {
    /// Wraps an already-validated calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a due date from user input.
    ///
    /// Accepts `YYYY-MM-DD`, an RFC 3339 date-time (the calendar day is taken
    /// in the value's own offset) or a naive `YYYY-MM-DDTHH:MM:SS` date-time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDueDate`] for any other input.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(date_time.date_naive()));
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|date_time| Self(date_time.date()))
            .map_err(|_| TaskDomainError::InvalidDueDate(value.to_owned()))
    }

    /// Returns the wrapped calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DueDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
