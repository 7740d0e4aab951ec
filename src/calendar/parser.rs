use std::io::BufReader;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical::IcalParser;
use ical::property::Property;
use tracing::{debug, warn};

use crate::error::NotifierError;
use crate::models::{CalendarEntry, EntryKind, ParsedCalendar};
use crate::utils::timezone::{localize, parse_timezone, start_of_day};

static DATE_FORMAT: &str = "%Y%m%d";
static DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parse an iCalendar document into entries keyed by uid.
///
/// Start values are re-expressed in `timezone`. Date-only values mean midnight
/// in `timezone`, floating date-times are read as `timezone` wall-clock time.
pub fn parse_calendar(body: &str, timezone: &Tz) -> Result<ParsedCalendar, NotifierError> {
    let parser = IcalParser::new(BufReader::new(body.as_bytes()));
    let mut calendar = ParsedCalendar::new();
    let mut found = false;

    for ical_calendar in parser {
        let ical_calendar = ical_calendar.map_err(|e| NotifierError::Parse(e.to_string()))?;
        found = true;

        let components = ical_calendar
            .events
            .iter()
            .map(|e| (EntryKind::Event, e.properties.as_slice()))
            .chain(
                ical_calendar
                    .todos
                    .iter()
                    .map(|t| (EntryKind::Todo, t.properties.as_slice())),
            )
            .chain(
                ical_calendar
                    .journals
                    .iter()
                    .map(|j| (EntryKind::Journal, j.properties.as_slice())),
            );

        for (kind, properties) in components {
            let entry = build_entry(kind, properties, timezone);
            if calendar.iter().any(|e| e.uid == entry.uid) {
                debug!("Ignoring repeated component with uid {}", entry.uid);
                continue;
            }
            calendar.push(entry);
        }
    }

    if !found {
        return Err(NotifierError::Parse(
            "no VCALENDAR component found".to_string(),
        ));
    }

    Ok(calendar)
}

fn build_entry(kind: EntryKind, properties: &[Property], timezone: &Tz) -> CalendarEntry {
    let summary = property_value(properties, "SUMMARY")
        .map(|v| unescape_text(v.trim()))
        .unwrap_or_default();
    let dtstart = find_property(properties, "DTSTART");

    let start = dtstart.and_then(|p| match parse_start(p, timezone) {
        Ok(start) => Some(start),
        Err(e) => {
            warn!("Skipping start of '{}': {}", summary, e);
            None
        }
    });

    // Feeds occasionally omit UID, derive a stable one so dedup still works
    let uid = property_value(properties, "UID")
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| {
            let raw_start = dtstart
                .and_then(|p| p.value.as_deref())
                .unwrap_or("")
                .trim();
            format!("{}@{}", raw_start, summary)
        });

    CalendarEntry {
        kind,
        uid,
        summary,
        start,
    }
}

fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

fn property_value<'a>(properties: &'a [Property], name: &str) -> Option<&'a str> {
    find_property(properties, name).and_then(|p| p.value.as_deref())
}

fn param_value<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

/// Turn a DTSTART property into an instant in `timezone`
fn parse_start(property: &Property, timezone: &Tz) -> Result<DateTime<Tz>, String> {
    let value = property
        .value
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| "empty DTSTART".to_string())?;

    let is_date = param_value(property, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
        || value.len() == 8;
    if is_date {
        let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map_err(|e| format!("invalid date '{}': {}", value, e))?;
        return start_of_day(date, timezone).map_err(|e| e.to_string());
    }

    if let Some(utc_value) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc_value, DATE_TIME_FORMAT)
            .map_err(|e| format!("invalid date-time '{}': {}", value, e))?;
        return Ok(Utc.from_utc_datetime(&naive).with_timezone(timezone));
    }

    let naive = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .map_err(|e| format!("invalid date-time '{}': {}", value, e))?;
    let zone = match param_value(property, "TZID") {
        Some(tzid) => parse_timezone(tzid.trim_matches('"')).unwrap_or_else(|e| {
            warn!("{}, reading start as {}", e, timezone);
            *timezone
        }),
        None => *timezone,
    };
    localize(naive, &zone)
        .map(|dt| dt.with_timezone(timezone))
        .map_err(|e| e.to_string())
}

/// Undo RFC 5545 TEXT escaping
fn unescape_text(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => result.push('\n'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}
