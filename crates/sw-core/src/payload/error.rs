use thiserror::Error;

/// Remote payload fetch failures.
///
/// Any of these triggers the URL-inference fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("payload server returned HTTP {0}")]
    Status(u16),

    /// Connection refused, DNS, TLS, timeout.
    #[error("payload fetch failed: {0}")]
    Network(String),

    #[error("payload body is not valid JSON: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// Recovered by the URL fallback whenever an inferred type exists.
    #[error("failed to fetch payload: {0}")]
    FetchFailed(#[from] FetchError),

    /// Fetch failed and the URL carried no type hint.
    #[error("no payload type could be resolved")]
    NoTypeResolved,
}
