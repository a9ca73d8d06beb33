use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("invalid calendar url: {0}")]
    Validation(String),
    #[error("failed to retrieve calendar: {0}")]
    Network(String),
    #[error("failed to parse iCal: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
