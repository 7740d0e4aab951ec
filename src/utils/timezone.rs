use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Error types for timezone operations
#[derive(Debug, thiserror::Error)]
pub enum TimezoneError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("{0} doesn't exist in this timezone (DST transition)")]
    TimeDoesNotExist(NaiveDateTime),
}

/// Parse a timezone string
pub fn parse_timezone(tz_str: &str) -> Result<Tz, TimezoneError> {
    tz_str.parse().map_err(|_| TimezoneError::InvalidTimezone(tz_str.to_string()))
}

/// Pin a wall-clock time to a timezone
pub fn localize(naive: NaiveDateTime, timezone: &Tz) -> Result<DateTime<Tz>, TimezoneError> {
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(dt1, _dt2) => Ok(dt1), // Use earliest during DST transition
        LocalResult::None => Err(TimezoneError::TimeDoesNotExist(naive)),
    }
}

/// Midnight at the start of `date` in the given timezone
pub fn start_of_day(date: NaiveDate, timezone: &Tz) -> Result<DateTime<Tz>, TimezoneError> {
    localize(date.and_time(chrono::NaiveTime::MIN), timezone)
}
