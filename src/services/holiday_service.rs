//! Holiday service - decides which holiday to announce and when
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use crate::constants::LOOKAHEAD_DAYS;
use crate::models::{CalendarEntry, EntryKind, HolidayEvent, NotifierState};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Whole days until `target`, rounded up (2.1 days ahead counts as 3)
pub fn days_until_ceil<Z: TimeZone>(now: &DateTime<Z>, target: &DateTime<Z>) -> i64 {
    let delta = target.clone() - now.clone();
    (delta.num_milliseconds() as f64 / MILLIS_PER_DAY).ceil() as i64
}

/// Find the earliest event starting strictly after `now`.
///
/// Only `VEVENT` entries with a start are considered. When several share the
/// earliest start, the first one in feed order wins.
pub fn select_upcoming_holiday(events: &[CalendarEntry], now: &DateTime<Tz>) -> Option<HolidayEvent> {
    let mut upcoming: Option<(&str, &str, DateTime<Tz>)> = None;

    for entry in events.iter().filter(|e| e.kind == EntryKind::Event) {
        let Some(start) = entry.start else {
            continue;
        };
        let start = start.with_timezone(&now.timezone());
        if start <= *now {
            continue;
        }
        if upcoming.is_none_or(|(_, _, earliest)| start < earliest) {
            upcoming = Some((entry.uid.as_str(), entry.summary.as_str(), start));
        }
    }

    upcoming.map(|(uid, name, start)| HolidayEvent {
        uid: uid.to_string(),
        name: name.to_string(),
        start,
    })
}

/// Decide whether `selected` should be announced this cycle
pub fn should_notify(
    selected: Option<&HolidayEvent>,
    now: &DateTime<Tz>,
    state: &NotifierState,
) -> bool {
    selected.is_some_and(|holiday| {
        !state.was_notified(&holiday.uid) && days_until_ceil(now, &holiday.start) <= LOOKAHEAD_DAYS
    })
}
