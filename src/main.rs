mod calendar;
mod constants;
mod delivery;
mod error;
mod models;
mod notifier;
mod schedule;
mod services;
#[cfg(test)]
mod test_support;
mod utils;

use std::str::FromStr;

use chrono_tz::Tz;
use tracing::{error, info, warn};

use crate::{
    calendar::HttpCalendarSource,
    constants::{DAILY_CHECK_CRON, DEFAULT_CALENDAR_URL, DEFAULT_TIMEZONE, LOG_DIRECTIVE},
    delivery::HttpWebhook,
    error::NotifierError,
    notifier::HolidayNotifier,
    schedule::run_daily,
    utils::timezone::parse_timezone,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match load_configuration(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let schedule = match cron::Schedule::from_str(DAILY_CHECK_CRON) {
        Ok(schedule) => schedule,
        Err(e) => {
            error!("Invalid cron expression '{}': {}", DAILY_CHECK_CRON, e);
            std::process::exit(1);
        }
    };

    info!(
        "Watching {} in timezone {}",
        config.calendar_url, config.timezone
    );

    let client = reqwest::Client::new();
    let mut notifier = HolidayNotifier::new(
        HttpCalendarSource::new(client.clone(), config.calendar_url),
        HttpWebhook::new(client, config.webhook_url),
        config.timezone,
    );

    info!("Holiday notifier is running. Press Ctrl+C to exit.");

    tokio::select! {
        _ = run_daily(&schedule, config.timezone, &mut notifier) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        }
    }
}

/// Configuration loaded from environment variables
struct Config {
    webhook_url: reqwest::Url,
    calendar_url: String,
    timezone: Tz,
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Load configuration through `lookup`, usually backed by the process environment
fn load_configuration<F>(lookup: F) -> Result<Config, NotifierError>
where
    F: Fn(&str) -> Option<String>,
{
    let webhook_url = lookup("DISCORD_WEBHOOK_URL")
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            NotifierError::Config(
                "DISCORD_WEBHOOK_URL environment variable not set. Set it with: export DISCORD_WEBHOOK_URL=https://discord.com/api/webhooks/..."
                    .to_string(),
            )
        })?;
    let webhook_url = reqwest::Url::parse(webhook_url.trim())
        .map_err(|e| NotifierError::Config(format!("DISCORD_WEBHOOK_URL is not a valid URL: {}", e)))?;

    let calendar_url = lookup("CALENDAR_URL")
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CALENDAR_URL.to_string());

    let timezone = match lookup("TIMEZONE").filter(|tz| !tz.trim().is_empty()) {
        Some(name) => parse_timezone(name.trim()).unwrap_or_else(|e| {
            warn!("{}, falling back to {}", e, DEFAULT_TIMEZONE);
            DEFAULT_TIMEZONE
        }),
        None => DEFAULT_TIMEZONE,
    };

    Ok(Config {
        webhook_url,
        calendar_url,
        timezone,
    })
}
