use std::time::Duration;

use thiserror::Error;

/// Appended to every timeout message
pub const TIMEOUT_GUIDANCE: &str = "Please try with a shorter video or a more specific request.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to initialize YouTube session: {0}")]
    Init(String),

    #[error("Failed to fetch video info: {0}")]
    Info(String),

    #[error("Failed to fetch transcript: {0}")]
    TranscriptUnavailable(String),

    #[error("Request timed out while {stage} (after {}s). {}", .after.as_secs_f64(), TIMEOUT_GUIDANCE)]
    Timeout { stage: &'static str, after: Duration },

    #[error("GOOGLE_API_KEY is not configured")]
    Unconfigured,

    #[error("{0}")]
    Provider(String),

    #[error("Unexpected API response format: {0}")]
    MalformedResponse(String),

    #[error("Transcript is required")]
    EmptyTranscript,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Stable, machine-readable classification of a pipeline failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    InitError,
    InfoError,
    TranscriptUnavailable,
    Timeout,
    Unconfigured,
    ProviderError,
    ProviderModelError,
    MalformedResponse,
    EmptyTranscript,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidUrl => "InvalidUrl",
            ErrorKind::InitError => "InitError",
            ErrorKind::InfoError => "InfoError",
            ErrorKind::TranscriptUnavailable => "TranscriptUnavailable",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Unconfigured => "Unconfigured",
            ErrorKind::ProviderError => "ProviderError",
            ErrorKind::ProviderModelError => "ProviderModelError",
            ErrorKind::MalformedResponse => "MalformedResponse",
            ErrorKind::EmptyTranscript => "EmptyTranscript",
        }
    }

    /// HTTP-style status the caller should report for this kind
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::InvalidUrl | ErrorKind::EmptyTranscript => 400,
            ErrorKind::TranscriptUnavailable => 404,
            _ => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::Init(_) => ErrorKind::InitError,
            Error::Info(_) => ErrorKind::InfoError,
            Error::TranscriptUnavailable(_) => ErrorKind::TranscriptUnavailable,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Unconfigured => ErrorKind::Unconfigured,
            Error::Provider(msg) if is_model_not_found(msg) => ErrorKind::ProviderModelError,
            Error::Provider(_) => ErrorKind::ProviderError,
            Error::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Error::EmptyTranscript => ErrorKind::EmptyTranscript,
        }
    }
}

/// Gemini reports an unknown model as e.g. "models/gemini-x is not found for API version v1beta"
pub(crate) fn is_model_not_found(message: &str) -> bool {
    message.contains("models/") && message.contains("not found")
}
