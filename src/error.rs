use thiserror::Error;

/// Everything that can go wrong while running a notification cycle
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to fetch calendar: {0}")]
    Fetch(String),
    #[error("failed to parse calendar: {0}")]
    Parse(String),
    #[error("failed to deliver notification: {0}")]
    Delivery(String),
}
