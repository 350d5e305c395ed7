//! Bounded-lifetime HS256 tokens embedded in exported URLs.
//!
//! Tokens are compact JWS strings (`header.claims.signature`, unpadded
//! base64url) so the proxy that checks them can use any HS256 verifier with
//! the shared secret. They are integrity-protected, not encrypted.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use sl_core::{ResourceId, Role};

use crate::clock::Clock;
use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// Fields embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Resource the token grants access to.
    pub rid: String,
    /// Item path within the resource, without surrounding slashes.
    pub path: String,
    pub role: Role,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: i64,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A key/secret pair. The key travels in the URL next to the token; the
/// secret never leaves the process.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret: String,
}

impl Credentials {
    /// Returns `None` unless both halves are non-empty.
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Option<Self> {
        let api_key = api_key.into();
        let secret = secret.into();
        if api_key.is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self { api_key, secret })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| TokenError::Encode(e.to_string()))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Issuer
// ---------------------------------------------------------------------------

/// A freshly issued token together with what the URL builder needs to
/// place it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub api_key: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues tokens for one credential set with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    credentials: Credentials,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(
        credentials: Credentials,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenError> {
        let ttl = TimeDelta::from_std(ttl).map_err(|e| TokenError::Encode(e.to_string()))?;
        Ok(Self {
            credentials,
            ttl,
            clock,
        })
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issue a token for `(resource, path, role)` expiring `ttl` from now.
    pub fn issue(
        &self,
        resource: &ResourceId,
        path: &str,
        role: Role,
    ) -> Result<SignedToken, TokenError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encode("token expiry overflows".into()))?;

        let claims = Claims {
            rid: resource.to_string(),
            path: path.trim_matches('/').to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| TokenError::Encode(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER_JSON),
            URL_SAFE_NO_PAD.encode(claims_json)
        );
        let mut mac = self.credentials.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(SignedToken {
            token: format!("{signing_input}.{signature}"),
            api_key: self.credentials.api_key.clone(),
            expires_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Verifier
// ---------------------------------------------------------------------------

/// Checks tokens issued with the same credentials. Production verification
/// happens in the proxy; this is the reference used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self { credentials, clock }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header), Some(claims), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed("expected three segments".into()));
        };

        let header: Header = decode_segment(header, "header")?;
        if header.alg != "HS256" {
            return Err(TokenError::Malformed(format!(
                "unsupported algorithm {}",
                header.alg
            )));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| TokenError::Malformed(format!("signature: {e}")))?;
        let signing_input = &token[..token.len() - signature_b64.len() - 1];
        let mut mac = self.credentials.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = decode_segment(claims, "claims")?;
        let expired_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::Malformed("exp out of range".into()))?;
        if self.clock.now() >= expired_at {
            return Err(TokenError::Expired { expired_at });
        }
        Ok(claims)
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(
    segment: &str,
    what: &str,
) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("{what}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Malformed(format!("{what}: {e}")))
}
