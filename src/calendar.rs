//! Calendar feed access and parsing
mod parser;

use async_trait::async_trait;
use tracing::debug;

use crate::error::NotifierError;

pub use parser::parse_calendar;

/// Something that can hand back the raw iCalendar document
#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch(&self) -> Result<String, NotifierError>;
}

/// Downloads the feed over HTTP
pub struct HttpCalendarSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCalendarSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CalendarSource for HttpCalendarSource {
    async fn fetch(&self) -> Result<String, NotifierError> {
        debug!("Fetching calendar from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| NotifierError::Fetch(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| NotifierError::Fetch(e.to_string()))
    }
}
