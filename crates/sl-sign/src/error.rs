//! Token issuance and verification failures.

use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No key/secret pair is configured for the requested credential set.
    #[error("{0} signing credentials are not configured")]
    MissingCredential(&'static str),

    /// The token does not have the `header.claims.signature` shape, or one
    /// of its segments does not decode.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The MAC does not match the header and claims.
    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    /// Claims could not be serialized or the expiry overflowed.
    #[error("failed to encode token: {0}")]
    Encode(String),
}

impl From<TokenError> for sl_core::Error {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::MissingCredential(_) => sl_core::Error::Misconfiguration(e.to_string()),
            TokenError::Malformed(_) | TokenError::BadSignature | TokenError::Expired { .. } => {
                sl_core::Error::Token(e.to_string())
            }
            TokenError::Encode(_) => sl_core::Error::upstream("token", e.to_string()),
        }
    }
}
