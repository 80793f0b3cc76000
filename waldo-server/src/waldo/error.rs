//! Waldo web service error types.

/// Errors that can occur when interacting with the Waldo web service.
#[derive(Debug, thiserror::Error)]
pub enum WaldoError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A request needing a session was made before one was started
    #[error("no session: call init_session first")]
    NoSession,
}
