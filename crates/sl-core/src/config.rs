//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! routing, signing and subtitle-backend sections. Every section defaults
//! sensibly so a completely empty `{}` file is valid. The configuration is
//! built once at process start and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::{Error, Role};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub export: ExportConfig,
    pub signing: SigningConfig,
    pub proxy_signing: ProxySigningConfig,
    pub subtitles: SubtitlesConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, failing if it cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.export.domain.is_empty() {
            warnings.push(
                "export.domain is empty; exports will use the request host".into(),
            );
        }

        if self.export.use_subdomains && self.export.shard_count == 0 {
            warnings.push(
                "export.shard_count is 0; subdomain sharding is disabled".into(),
            );
        }

        if !self.export.path_prefix.starts_with('/') {
            warnings.push(format!(
                "export.path_prefix '{}' does not start with '/'",
                self.export.path_prefix
            ));
        }

        if self.signing.api_role.parse::<Role>().is_err() {
            warnings.push(format!(
                "signing.api_role '{}' is not a recognized role (valid: free, premium)",
                self.signing.api_role
            ));
        }

        if self.signing.api_key.is_empty() != self.signing.api_secret.is_empty() {
            warnings.push(
                "signing.api_key and signing.api_secret must be set together".into(),
            );
        }

        if self.proxy_signing.api_key.is_empty() != self.proxy_signing.api_secret.is_empty() {
            warnings.push(
                "proxy_signing.api_key and proxy_signing.api_secret must be set together"
                    .into(),
            );
        }

        if self.proxy_signing.required && !self.proxy_signing.is_complete() {
            warnings.push(
                "proxy_signing.required is set but proxy credentials are incomplete; \
                 download and stream exports will fail"
                    .into(),
            );
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Routing settings: scheme, domains, sharding and path prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub scheme: String,
    /// Default base domain. Empty means "use the request host".
    pub domain: String,
    /// Domain for premium callers. Empty means "same as `domain`".
    pub premium_domain: String,
    /// Fixed prefix prepended to every generated path.
    pub path_prefix: String,
    pub use_subdomains: bool,
    /// Backend pool name used in shard subdomains.
    pub pool: String,
    /// Number of members in the backend pool.
    pub shard_count: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scheme: "https".into(),
            domain: String::new(),
            premium_domain: String::new(),
            path_prefix: "/".into(),
            use_subdomains: true,
            pool: "seeder".into(),
            shard_count: 8,
        }
    }
}

/// General signing credentials for tokens checked by internal services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Role embedded in tokens when the request carries none.
    pub api_role: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            api_role: "free".into(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

impl SigningConfig {
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// Signing credentials for URLs played by external players through the
/// HTTP proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySigningConfig {
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Fail proxy-signed export types instead of emitting unsigned URLs
    /// when the credentials are missing.
    pub required: bool,
}

impl Default for ProxySigningConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            required: false,
        }
    }
}

impl ProxySigningConfig {
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

fn default_token_ttl() -> u64 {
    600
}

/// Address of the subtitle / video-info backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitlesConfig {
    pub host: String,
    pub port: u16,
}

impl SubtitlesConfig {
    /// A backend counts as configured when either part of the address is set.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() || self.port != 0
    }
}
