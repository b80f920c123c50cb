//! Error taxonomy for scrubwatch.
//!
//! Every variant here is terminal for a report run. Per-row timestamp
//! problems never surface as errors; see [`crate::stamp`].

/// scrubwatch errors.
#[derive(Debug, thiserror::Error)]
pub enum ScrubError {
    /// The cluster query tool is missing or every invocation failed.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source produced text that is not valid JSON.
    #[error("malformed source: {0}")]
    MalformedSource(#[from] serde_json::Error),

    /// No placement group records could be located in the document.
    #[error("no placement group records found in source document")]
    EmptySource,

    /// Projection produced nothing to rank.
    #[error("no rows to rank")]
    NoRankableRows,

    /// The finished report could not be serialized.
    #[error("render error: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scrubwatch operations.
pub type Result<T> = std::result::Result<T, ScrubError>;
