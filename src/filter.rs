//! Date window and accuracy filtering
//!
//! Both tests work on strings: timestamps are all normalized to ISO 8601
//! UTC, which sorts lexically in chronological order, and accuracies are
//! integer digit strings compared by length first.

use chrono::NaiveDate;

use crate::error::ConfigError;
use crate::location::Location;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts the locations that fall inside `[start, end + 1 day)` with an
/// accuracy not above `max_accuracy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFilter {
    start: String,
    end_next_day: String,
    max_accuracy: String,
}

impl LocationFilter {
    /// Build a filter from `YYYY-MM-DD` dates (both inclusive) and a
    /// maximum accuracy in meters.
    pub fn new(start_date: &str, end_date: &str, max_accuracy: &str) -> Result<Self, ConfigError> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        if end < start {
            return Err(ConfigError::EndBeforeStart {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }
        Ok(Self {
            start: start_date.to_string(),
            end_next_day: next_day(end_date)?,
            max_accuracy: normalize_accuracy(max_accuracy)?,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end_next_day(&self) -> &str {
        &self.end_next_day
    }

    pub fn accept(&self, loc: &Location) -> bool {
        accept(loc, &self.start, &self.end_next_day, &self.max_accuracy)
    }
}

/// `true` when `loc` is inside `[start, end_next_day)` and passes the
/// accuracy threshold.
pub fn accept(loc: &Location, start: &str, end_next_day: &str, max_accuracy: &str) -> bool {
    loc.timestamp.as_str() >= start
        && loc.timestamp.as_str() < end_next_day
        && accept_accuracy(&loc.accuracy, max_accuracy)
}

/// Compare two non-negative integer digit strings without parsing them:
/// fewer digits means a smaller value, equal lengths compare lexically.
pub fn accept_accuracy(accuracy: &str, max: &str) -> bool {
    if accuracy.len() != max.len() {
        return accuracy.len() <= max.len();
    }
    accuracy <= max
}

/// The day after `date`, both as `YYYY-MM-DD`.
pub fn next_day(date: &str) -> Result<String, ConfigError> {
    parse_date(date)?
        .succ_opt()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .ok_or_else(|| ConfigError::InvalidDate(date.to_string()))
}

/// Only canonical, zero-padded dates are accepted since the window test
/// compares them lexically against timestamps.
fn parse_date(date: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == date)
        .ok_or_else(|| ConfigError::InvalidDate(date.to_string()))
}

fn normalize_accuracy(max_accuracy: &str) -> Result<String, ConfigError> {
    if max_accuracy.is_empty() || !max_accuracy.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::InvalidAccuracy(max_accuracy.to_string()));
    }
    let trimmed = max_accuracy.trim_start_matches('0');
    Ok(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
}
