use std::fmt::Display;

/// Failures surfaced by the adapters.
///
/// Resource errors are fatal for the adapter being built but not for the
/// process; the other kinds are scoped to a single call.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    #[error("{resource} unavailable: {reason}")]
    ResourceUnavailable { resource: String, reason: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tokenization failed for text {index}: {reason}")]
    Tokenization { index: usize, reason: String },

    #[cfg(feature = "download")]
    #[error("Download failed: {0}")]
    Download(String),
}

impl SentimentError {
    pub(crate) fn resource(resource: impl Into<String>, reason: impl Display) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// True for per-call failures a caller can skip or retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ResourceUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;
