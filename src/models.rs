use chrono::DateTime;
use chrono_tz::Tz;

/// Which iCalendar component an entry came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Event,
    Todo,
    Journal,
}

/// A single component read from the calendar feed
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEntry {
    pub kind: EntryKind,
    pub uid: String,
    pub summary: String,
    /// Start instant expressed in the configured timezone
    pub start: Option<DateTime<Tz>>,
}

/// Feed entries with unique uids, in the order they first appeared
pub type ParsedCalendar = Vec<CalendarEntry>;

/// The holiday chosen for a cycle
#[derive(Clone, Debug, PartialEq)]
pub struct HolidayEvent {
    pub uid: String,
    pub name: String,
    pub start: DateTime<Tz>,
}

/// State carried from one notification cycle to the next.
///
/// Lives in memory only, so a restart may announce the same holiday again.
#[derive(Clone, Debug, Default)]
pub struct NotifierState {
    /// Uid of the last holiday successfully announced
    pub last_notified: Option<String>,
}

impl NotifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether this holiday was already announced
    pub fn was_notified(&self, uid: &str) -> bool {
        self.last_notified.as_deref() == Some(uid)
    }

    pub fn mark_notified(&mut self, uid: &str) {
        self.last_notified = Some(uid.to_string());
    }
}
