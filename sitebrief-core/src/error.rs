use sitebrief_scanner::ScanError;
use thiserror::Error;

/// Why a remote analysis could not be used.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no API key configured")]
    NoCredential,

    #[error("analysis request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("analysis reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
