//! Per-type token policy and the two credential sets.

use std::sync::Arc;
use std::time::Duration;

use sl_core::config::Config;
use sl_core::{Error, ResourceId, Result, Role};
use sl_sign::{Clock, Credentials, SignedToken, TokenError, TokenIssuer};

/// Which credential set signs a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    /// Tokens checked by internal services.
    General,
    /// Tokens checked by the HTTP proxy serving external players.
    Proxy,
}

impl Credential {
    fn name(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Proxy => "proxy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPolicy {
    /// Never attach a token.
    None,
    /// Attach a token when credentials exist, otherwise emit the URL unsigned.
    Optional(Credential),
    /// Attach a token; missing credentials fail the export.
    Required(Credential),
}

/// Issuers for both credential sets, built once at startup.
#[derive(Debug, Clone)]
pub struct Signers {
    general: Option<TokenIssuer>,
    proxy: Option<TokenIssuer>,
    default_role: Role,
    proxy_required: bool,
}

impl Signers {
    pub fn from_config(cfg: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let general = issuer(
            &cfg.signing.api_key,
            &cfg.signing.api_secret,
            cfg.signing.token_ttl_secs,
            clock.clone(),
        )?;
        let proxy = issuer(
            &cfg.proxy_signing.api_key,
            &cfg.proxy_signing.api_secret,
            cfg.proxy_signing.token_ttl_secs,
            clock,
        )?;

        let default_role = cfg.signing.api_role.parse().unwrap_or_else(|_| {
            tracing::warn!(
                role = %cfg.signing.api_role,
                "Unknown signing.api_role; tokens default to the free role"
            );
            Role::Free
        });

        if proxy.is_none() {
            if cfg.proxy_signing.required {
                tracing::warn!(
                    "Proxy signing is required but not configured; \
                     download and stream exports will fail"
                );
            } else {
                tracing::info!(
                    "Proxy signing not configured; download and stream URLs are unsigned"
                );
            }
        }

        Ok(Self {
            general,
            proxy,
            default_role,
            proxy_required: cfg.proxy_signing.required,
        })
    }

    /// Token policy for URLs handed to external players (download, stream).
    pub fn player_policy(&self) -> TokenPolicy {
        if self.proxy_required {
            TokenPolicy::Required(Credential::Proxy)
        } else {
            TokenPolicy::Optional(Credential::Proxy)
        }
    }

    fn issuer(&self, credential: Credential) -> Option<&TokenIssuer> {
        match credential {
            Credential::General => self.general.as_ref(),
            Credential::Proxy => self.proxy.as_ref(),
        }
    }

    /// Issue a token according to `policy`. The embedded role is the
    /// caller's, or the configured default when the caller has none.
    pub fn sign(
        &self,
        policy: TokenPolicy,
        resource: &ResourceId,
        path: &str,
        role: Option<Role>,
    ) -> Result<Option<SignedToken>> {
        let (credential, required) = match policy {
            TokenPolicy::None => return Ok(None),
            TokenPolicy::Optional(c) => (c, false),
            TokenPolicy::Required(c) => (c, true),
        };

        let Some(issuer) = self.issuer(credential) else {
            if required {
                return Err(TokenError::MissingCredential(credential.name()).into());
            }
            tracing::debug!(
                credential = credential.name(),
                resource = %resource,
                "No signing credentials; emitting unsigned URL"
            );
            return Ok(None);
        };

        issuer
            .issue(resource, path, role.unwrap_or(self.default_role))
            .map(Some)
            .map_err(Error::from)
    }
}

fn issuer(
    api_key: &str,
    api_secret: &str,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
) -> Result<Option<TokenIssuer>> {
    let Some(credentials) = Credentials::new(api_key, api_secret) else {
        return Ok(None);
    };
    TokenIssuer::new(credentials, Duration::from_secs(ttl_secs), clock)
        .map(Some)
        .map_err(|e| Error::Misconfiguration(format!("token ttl {ttl_secs}s: {e}")))
}
