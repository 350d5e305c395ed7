//! Domain and shard selection.
//!
//! A [`RoutingDecision`] is a pure function of the configuration, the
//! resource id, the caller's role and (only when no domain is configured)
//! the request host. The shard label never depends on anything request-local,
//! so one resource keeps landing on the same pool member.

use std::num::NonZeroU32;

use sha2::{Digest, Sha256};

use sl_core::config::ExportConfig;
use sl_core::{Error, ResourceId, Result, Role};

/// Where a URL for one resource points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub scheme: String,
    /// Full host name, including the shard subdomain when sharded.
    pub host: String,
    /// The free or premium domain the host was derived from.
    pub base_domain: String,
    /// `{pool}-{label}` when sharding applied.
    pub shard: Option<String>,
    /// Non-empty segments of the configured path prefix.
    pub path_prefix: Vec<String>,
}

#[derive(Debug, Clone)]
struct Sharding {
    pool: String,
    count: NonZeroU32,
}

/// Routing settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct Routing {
    scheme: String,
    domain: String,
    premium_domain: String,
    path_prefix: Vec<String>,
    sharding: Option<Sharding>,
}

impl Routing {
    pub fn from_config(cfg: &ExportConfig) -> Result<Self> {
        let scheme = cfg.scheme.trim().to_ascii_lowercase();
        let valid = |c: char| c.is_ascii_alphanumeric() || "+-.".contains(c);
        if scheme.is_empty() || !scheme.chars().all(valid) {
            return Err(Error::Misconfiguration(format!(
                "export scheme '{}' is not a valid URL scheme",
                cfg.scheme
            )));
        }

        let sharding = match (cfg.use_subdomains, NonZeroU32::new(cfg.shard_count)) {
            (true, Some(count)) if !cfg.pool.is_empty() => Some(Sharding {
                pool: cfg.pool.clone(),
                count,
            }),
            (true, _) => {
                tracing::warn!(
                    pool = %cfg.pool,
                    shard_count = cfg.shard_count,
                    "Subdomain sharding requested without a pool name or members; disabled"
                );
                None
            }
            (false, _) => None,
        };

        Ok(Self {
            scheme,
            domain: cfg.domain.trim().to_string(),
            premium_domain: cfg.premium_domain.trim().to_string(),
            path_prefix: cfg
                .path_prefix
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            sharding,
        })
    }

    pub fn is_sharded(&self) -> bool {
        self.sharding.is_some()
    }

    /// Pick scheme, host and path prefix for `resource` as seen by `role`.
    ///
    /// Without a configured domain the request host is used verbatim and no
    /// shard subdomain is added.
    pub fn select(
        &self,
        resource: &ResourceId,
        role: Option<Role>,
        request_host: Option<&str>,
    ) -> Result<RoutingDecision> {
        let premium = role.is_some_and(Role::is_premium) && !self.premium_domain.is_empty();
        let configured = if premium {
            &self.premium_domain
        } else {
            &self.domain
        };

        let (host, base_domain, shard) = if configured.is_empty() {
            let host = request_host
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .ok_or_else(|| {
                    Error::Misconfiguration(
                        "no export domain configured and the request carries no host".into(),
                    )
                })?;
            (host.to_string(), host.to_string(), None)
        } else if let Some(sharding) = &self.sharding {
            let shard = format!(
                "{}-{}",
                sharding.pool,
                shard_label(resource, sharding.count)
            );
            (format!("{shard}.{configured}"), configured.clone(), Some(shard))
        } else {
            (configured.clone(), configured.clone(), None)
        };

        Ok(RoutingDecision {
            scheme: self.scheme.clone(),
            host,
            base_domain,
            shard,
            path_prefix: self.path_prefix.clone(),
        })
    }
}

/// Stable pool member index for a resource: the first eight bytes of
/// SHA-256 of the id, big-endian, modulo the pool size.
pub fn shard_label(resource: &ResourceId, count: NonZeroU32) -> u32 {
    let digest = Sha256::digest(resource.as_str().as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % u64::from(count.get())) as u32
}
