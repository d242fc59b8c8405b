use thiserror::Error;

/// Request-level failures. Everything else degrades to empty fields.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No captions found in the supplied subtitle markup")]
    NoCaptionsFound,

    #[error("Text-generation backend is not available at {url}")]
    BackendUnavailable { url: String },
}

/// Failure of a single backend call.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid backend response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Backend returned no choices")]
    EmptyChoices,
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Http(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Not a YouTube URL: {url}")]
    InvalidUrl { url: String },

    #[error("yt-dlp failed for {url}: {reason}")]
    YtDlpFailed { url: String, reason: String },

    #[error("Caption download failed: {0}")]
    CaptionDownload(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
