use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid crawler configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ScanError {
    /// True when the request gave up waiting on the server.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScanError::HttpError(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
