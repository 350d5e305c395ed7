//! # sl-sign
//!
//! Signed access tokens for exported URLs.
//!
//! - **[`TokenIssuer`]** -- issues HS256 tokens over `(resource, path, role)`
//!   with an absolute expiry.
//! - **[`TokenVerifier`]** -- the matching check, used by the CLI and tests;
//!   production verification lives in the serving proxy.
//! - **[`Clock`]** -- time source seam ([`SystemClock`], [`FixedClock`]).

pub mod clock;
pub mod error;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::TokenError;
pub use token::{Claims, Credentials, SignedToken, TokenIssuer, TokenVerifier};

/// Generate a random signing secret (32 bytes, hex encoded).
pub fn generate_secret() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_hex_and_distinct() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
