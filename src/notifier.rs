use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::calendar::{CalendarSource, parse_calendar};
use crate::delivery::{WebhookMessage, WebhookSender};
use crate::error::NotifierError;
use crate::models::{HolidayEvent, NotifierState, ParsedCalendar};
use crate::services::holiday_service::{days_until_ceil, select_upcoming_holiday, should_notify};

/// Fetches the feed, picks the next holiday and announces it once
pub struct HolidayNotifier<S, W> {
    source: S,
    webhook: W,
    timezone: Tz,
    state: NotifierState,
}

impl<S: CalendarSource, W: WebhookSender> HolidayNotifier<S, W> {
    pub fn new(source: S, webhook: W, timezone: Tz) -> Self {
        Self {
            source,
            webhook,
            timezone,
            state: NotifierState::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &NotifierState {
        &self.state
    }

    /// Fetch and parse the feed, falling back to no events on failure
    pub async fn fetch_holidays(&self) -> ParsedCalendar {
        match self.try_fetch_holidays().await {
            Ok(calendar) => {
                info!("Fetched {} calendar entries", calendar.len());
                calendar
            }
            Err(e) => {
                error!("Error fetching holidays: {}", e);
                ParsedCalendar::default()
            }
        }
    }

    async fn try_fetch_holidays(&self) -> Result<ParsedCalendar, NotifierError> {
        let body = self.source.fetch().await?;
        parse_calendar(&body, &self.timezone)
    }

    /// Post the announcement, remembering the holiday only if delivery succeeded
    pub async fn send_notification(&mut self, holiday: &HolidayEvent) {
        let message = WebhookMessage::for_holiday(holiday);
        match self.webhook.send(&message).await {
            Ok(()) => {
                info!("Notification sent for '{}'", holiday.name);
                self.state.mark_notified(&holiday.uid);
            }
            Err(e) => {
                error!("Error sending notification for '{}': {}", holiday.name, e);
            }
        }
    }

    /// Run one full cycle as of `now`
    pub async fn check_and_notify_at(&mut self, now: DateTime<Tz>) {
        let holidays = self.fetch_holidays().await;
        let upcoming = select_upcoming_holiday(&holidays, &now);

        let Some(holiday) = upcoming else {
            info!("No upcoming holiday found");
            return;
        };

        info!(
            "Next holiday is '{}' on {} ({} day(s) away)",
            holiday.name,
            holiday.start.format("%Y-%m-%d %H:%M %Z"),
            days_until_ceil(&now, &holiday.start)
        );

        if should_notify(Some(&holiday), &now, &self.state) {
            self.send_notification(&holiday).await;
        } else if self.state.was_notified(&holiday.uid) {
            info!("'{}' was already announced", holiday.name);
        }
    }

    pub async fn check_and_notify(&mut self) {
        let now = Utc::now().with_timezone(&self.timezone);
        self.check_and_notify_at(now).await;
    }
}
