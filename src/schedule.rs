//! Daily cron schedule for the notifier
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};

use crate::calendar::CalendarSource;
use crate::delivery::WebhookSender;
use crate::notifier::HolidayNotifier;

/// Next occurrence strictly after `now` and how long to wait for it.
///
/// The expression is evaluated on `now`'s timezone, so "0 0 9 * * *" stays at
/// 09:00 local time across DST changes.
pub fn next_run_after(schedule: &cron::Schedule, now: &DateTime<Tz>) -> Option<(DateTime<Tz>, Duration)> {
    let next = schedule.after(now).next()?;
    let wait = (next - *now).to_std().unwrap_or(Duration::from_secs(60));
    Some((next, wait))
}

/// Check once now, then at every occurrence of `schedule` in `timezone`.
///
/// Each check completes before the next wakeup is computed, so checks never overlap.
/// Returns only if the schedule has no further occurrences.
pub async fn run_daily<S: CalendarSource, W: WebhookSender>(
    schedule: &cron::Schedule,
    timezone: Tz,
    notifier: &mut HolidayNotifier<S, W>,
) {
    info!("Running initial check");
    notifier.check_and_notify().await;

    loop {
        let now = Utc::now().with_timezone(&timezone);
        let Some((next_time, wait_duration)) = next_run_after(schedule, &now) else {
            warn!("No upcoming time found for schedule '{}'", schedule);
            break;
        };

        info!(
            "Next check at {} ({} minutes)",
            next_time.format("%Y-%m-%d %H:%M %Z"),
            wait_duration.as_secs() / 60
        );
        sleep(wait_duration).await;
        notifier.check_and_notify().await;
    }

    info!("Schedule manager stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DAILY_CHECK_CRON;
    use crate::delivery::WebhookMessage;
    use crate::error::NotifierError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Timelike};
    use std::str::FromStr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tz() -> Tz {
        "America/New_York".parse().unwrap()
    }

    fn daily() -> cron::Schedule {
        cron::Schedule::from_str(DAILY_CHECK_CRON).unwrap()
    }

    struct CountingSource(Arc<AtomicUsize>);

    #[async_trait]
    impl CalendarSource for CountingSource {
        async fn fetch(&self) -> Result<String, NotifierError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(NotifierError::Fetch("offline".to_string()))
        }
    }

    struct NoWebhook;

    #[async_trait]
    impl WebhookSender for NoWebhook {
        async fn send(&self, _message: &WebhookMessage) -> Result<(), NotifierError> {
            panic!("nothing should be sent");
        }
    }

    #[test]
    fn test_next_run_later_same_day() {
        let now = tz().with_ymd_and_hms(2025, 12, 20, 7, 30, 0).unwrap();

        let (next, wait) = next_run_after(&daily(), &now).unwrap();
        assert_eq!(next, tz().with_ymd_and_hms(2025, 12, 20, 9, 0, 0).unwrap());
        assert_eq!(wait, Duration::from_secs(90 * 60));
    }

    #[test]
    fn test_next_run_wraps_to_next_day() {
        let now = tz().with_ymd_and_hms(2025, 12, 20, 9, 0, 0).unwrap();

        let (next, wait) = next_run_after(&daily(), &now).unwrap();
        assert_eq!(next, tz().with_ymd_and_hms(2025, 12, 21, 9, 0, 0).unwrap());
        assert_eq!(wait, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn test_next_run_keeps_local_hour_over_dst() {
        // Clocks spring forward on 2025-03-09
        let now = tz().with_ymd_and_hms(2025, 3, 8, 10, 0, 0).unwrap();

        let (next, wait) = next_run_after(&daily(), &now).unwrap();
        assert_eq!(next.hour(), 9);
        assert_eq!(wait, Duration::from_secs(22 * 60 * 60));
    }

    #[tokio::test]
    async fn test_runs_immediately_then_stops_when_schedule_exhausted() {
        // Only fires in 2020, which is already over
        let schedule = cron::Schedule::from_str("0 0 9 1 1 * 2020").unwrap();
        let fetches = Arc::new(AtomicUsize::new(0));
        let mut notifier = HolidayNotifier::new(CountingSource(fetches.clone()), NoWebhook, tz());

        run_daily(&schedule, tz(), &mut notifier).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
