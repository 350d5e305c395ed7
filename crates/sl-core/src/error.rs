//! Unified error type for seedlink.
//!
//! Every library crate funnels its failures into [`Error`]. Resolution is
//! all-or-nothing, so a single variant is enough to describe why a whole
//! export request failed, and [`Error::http_status`] lets a transport layer
//! pick a status code without inspecting the message.

/// Unified error type covering all failure modes in seedlink.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller asked for something malformed (unknown export type, bad
    /// resource id, unknown role).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// URL, token or tag construction failed inside an exporter.
    #[error("Upstream failure [{stage}]: {message}")]
    Upstream {
        /// The construction step that failed (e.g. "stream", "tag").
        stage: String,
        /// Human-readable error description.
        message: String,
    },

    /// A setting that an export type depends on is missing or unusable.
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// A signed token failed verification.
    #[error("Token rejected: {0}")]
    Token(String),

    /// Configuration data failed validation or parsing.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidRequest(_) => 400,
            Error::Upstream { .. } => 502,
            Error::Misconfiguration(_) => 500,
            Error::Token(_) => 401,
            Error::Validation(_) => 400,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Whether this error aborted an export resolution from inside an
    /// exporter. A missing credential counts as one.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, Error::Upstream { .. } | Error::Misconfiguration(_))
    }

    /// Convenience constructor for [`Error::Upstream`].
    pub fn upstream(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Upstream {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// The error reported for a requested type that is not declared.
    pub fn unknown_export_type(token: &str) -> Self {
        Error::InvalidRequest(format!("unknown export type \"{token}\""))
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
