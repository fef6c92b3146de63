//! Error taxonomy for portal queries, filtering, and rendering.
//!
//! Every failure is surfaced to the immediate caller; nothing is retried or
//! locally recovered.

use thiserror::Error;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection failure or non-2xx HTTP status.
    ///
    /// `status` is `None` when the request never produced a response
    /// (DNS failure, refused connection, timeout). `message` carries the
    /// response body text when one was received.
    #[error("transport error{}: {message}", fmt_status(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Response body was not valid JSON or is missing expected fields.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Malformed input detected before any network call or computation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure surfaced from the plotting backend or output-file I/O.
    #[cfg(feature = "render")]
    #[error("map rendering failed: {0}")]
    Render(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
