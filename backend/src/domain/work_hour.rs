//! Wall-clock `HH:MM` values used for branch operating windows.
//!
//! Values are kept as zero-padded text and compared lexically, which orders
//! them the same way as the clock as long as the padding invariant holds.

use std::sync::OnceLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for [`WorkHour`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("work hour must be a zero-padded HH:MM value: {value}")]
pub struct WorkHourError {
    value: String,
}

static WORK_HOUR_RE: OnceLock<Regex> = OnceLock::new();

fn work_hour_regex() -> &'static Regex {
    WORK_HOUR_RE.get_or_init(|| {
        Regex::new("^([01][0-9]|2[0-3]):[0-5][0-9]$")
            .unwrap_or_else(|error| panic!("work hour regex failed to compile: {error}"))
    })
}

/// Zero-padded `HH:MM` time of day.
///
/// # Examples
/// ```
/// use market_backend::domain::WorkHour;
///
/// let open = WorkHour::parse("09:00").expect("valid hour");
/// let close = WorkHour::parse("18:00").expect("valid hour");
/// let now = WorkHour::parse("20:00").expect("valid hour");
/// assert!(!now.is_within(&open, &close));
/// assert!(WorkHour::parse("9:00").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkHour(String);

impl WorkHour {
    /// Validate an `HH:MM` string.
    ///
    /// # Errors
    ///
    /// Returns [`WorkHourError`] when the value is not a zero-padded 24-hour
    /// time.
    pub fn parse(raw: impl Into<String>) -> Result<Self, WorkHourError> {
        let value = raw.into();
        if work_hour_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(WorkHourError { value })
        }
    }

    /// Truncate a time of day to minute precision.
    #[must_use]
    pub fn from_time(time: NaiveTime) -> Self {
        Self(time.format("%H:%M").to_string())
    }

    /// Borrow the textual value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `start <= self <= end`, compared lexically.
    ///
    /// Windows that wrap past midnight never contain anything.
    #[must_use]
    pub fn is_within(&self, start: &Self, end: &Self) -> bool {
        start <= self && self <= end
    }
}

impl TryFrom<String> for WorkHour {
    type Error = WorkHourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WorkHour> for String {
    fn from(value: WorkHour) -> Self {
        value.0
    }
}

impl std::fmt::Display for WorkHour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
