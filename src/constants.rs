use chrono_tz::Tz;

/// Public Google calendar with US holidays
pub const DEFAULT_CALENDAR_URL: &str = "https://calendar.google.com/calendar/ical/en.usa%23holiday%40group.v.calendar.google.com/public/basic.ics";

/// Timezone used when `TIMEZONE` is unset or unknown
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

/// A holiday is announced once it is at most this many days away
pub const LOOKAHEAD_DAYS: i64 = 7;

/// Daily check at 09:00 in the configured timezone ("second minute hour day month weekday")
pub const DAILY_CHECK_CRON: &str = "0 0 9 * * *";

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "holiday_notifier=info";
