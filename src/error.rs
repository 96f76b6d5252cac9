use thiserror::Error;

/// Failure taxonomy shared by every operation in the crate.
///
/// Nothing here is fatal: each variant is scoped to the operation and
/// entity that produced it, and callers surface it as a message while
/// leaving prior state untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required origin is not configured; the dependent operation is
    /// inert rather than crashing.
    #[error("configuration missing: {0} is not set")]
    ConfigurationMissing(&'static str),

    /// Invalid or empty input caught before any network call.
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure (connect error, timeout, non-2xx without a
    /// structured body).
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered 2xx but the body did not have the expected
    /// shape. Surfaced to users the same way as a network failure.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server rejected the operation with an application-level
    /// message ({message}/{error} bodies, trade status != "success").
    #[error("{0}")]
    Rejected(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}
