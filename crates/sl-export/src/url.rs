//! URL synthesis: scheme, routed host, path prefix, canonical resource path
//! and a per-type set of query parameters, signed when the type's policy
//! asks for it.
//!
//! [`UrlBuilder::build`] returns `Ok(None)` when a type does not apply to
//! an item; exporters pass that through as "not applicable".

use std::sync::Arc;

use sha2::{Digest, Sha256};
use url::Url;

use sl_core::config::Config;
use sl_core::{Error, ExportType, ListItem, MediaFormat, Resource, Result};
use sl_sign::Clock;

use crate::exporter::ExportRequest;
use crate::response::ExportMeta;
use crate::routing::{Routing, RoutingDecision};
use crate::signing::{Credential, Signers, TokenPolicy};

/// Reserved query parameter carrying the signed token.
pub const TOKEN_PARAM: &str = "token";
/// Reserved query parameter carrying the key of the signing credentials.
pub const API_KEY_PARAM: &str = "api-key";

/// A built URL plus the routing it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportUrl {
    url: Url,
    unsigned: String,
    routing: RoutingDecision,
    expires_at: Option<i64>,
}

impl ExportUrl {
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn routing(&self) -> &RoutingDecision {
        &self.routing
    }

    /// Whether a token was attached.
    pub fn is_signed(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Derive the opaque export-meta descriptor for this URL.
    pub fn export_meta(&self) -> ExportMeta {
        ExportMeta {
            domain: self.routing.host.clone(),
            shard: self.routing.shard.clone(),
            path: self.url.path().to_string(),
            cache_key: hex::encode(Sha256::digest(self.unsigned.as_bytes())),
            expires_at: self.expires_at,
        }
    }
}

impl std::fmt::Display for ExportUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Where the type's path lands relative to the item path.
struct PathPlan {
    /// Appended to the last item segment, e.g. `~hls`.
    marker: Option<&'static str>,
    /// Extra segments after the item path.
    tail: Vec<String>,
}

impl PathPlan {
    fn plain() -> Self {
        Self {
            marker: None,
            tail: Vec::new(),
        }
    }

    fn marked(marker: &'static str, tail: &[&str]) -> Self {
        Self {
            marker: Some(marker),
            tail: tail.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Shared, read-only routing and signing context for every exporter.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    routing: Routing,
    signers: Signers,
}

impl UrlBuilder {
    pub fn new(routing: Routing, signers: Signers) -> Self {
        Self { routing, signers }
    }

    pub fn from_config(cfg: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self::new(
            Routing::from_config(&cfg.export)?,
            Signers::from_config(cfg, clock)?,
        ))
    }

    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    /// Caller query parameters each type forwards. Everything else is
    /// dropped, reserved token parameters included.
    pub fn allowed_params(export_type: ExportType) -> &'static [&'static str] {
        match export_type {
            ExportType::Download => &["filename", "rate"],
            ExportType::Stream => &["audio", "subtitles", "rate"],
            ExportType::Subtitles => &["lang"],
            ExportType::MediaProbe => &["refresh"],
            ExportType::TorrentClientStat | ExportType::AndroidPlayer => &[],
        }
    }

    pub fn token_policy(&self, export_type: ExportType) -> TokenPolicy {
        match export_type {
            ExportType::Download | ExportType::Stream => self.signers.player_policy(),
            ExportType::TorrentClientStat | ExportType::Subtitles | ExportType::MediaProbe => {
                TokenPolicy::Optional(Credential::General)
            }
            ExportType::AndroidPlayer => TokenPolicy::None,
        }
    }

    /// `scheme://host/` for this request, with no path or query.
    pub fn base_url(&self, req: &ExportRequest<'_>) -> Result<(Url, RoutingDecision)> {
        let routing = self.routing.select(
            &req.resource.id,
            req.params.role,
            req.params.host.as_deref(),
        )?;
        let url = Url::parse(&format!("{}://{}/", routing.scheme, routing.host)).map_err(|e| {
            Error::upstream("routing", format!("invalid base url for host {}: {e}", routing.host))
        })?;
        Ok((url, routing))
    }

    /// Build the URL of `export_type` for the request, or `None` when the
    /// type does not apply to the item.
    pub fn build(
        &self,
        req: &ExportRequest<'_>,
        export_type: ExportType,
    ) -> Result<Option<ExportUrl>> {
        let Some(plan) = path_plan(export_type, req.resource, req.item)? else {
            return Ok(None);
        };

        let (mut url, routing) = self.base_url(req)?;
        set_path(&mut url, &routing.path_prefix, req.resource, req.item, &plan)?;

        let pairs: Vec<(&str, &str)> = Self::allowed_params(export_type)
            .iter()
            .filter_map(|k| req.params.get(k).map(|v| (*k, v)))
            .collect();
        set_query(&mut url, &pairs);
        let unsigned = url.to_string();

        let token = self.signers.sign(
            self.token_policy(export_type),
            &req.resource.id,
            req.item.trimmed_path(),
            req.params.role,
        )?;
        let expires_at = token.as_ref().map(|t| t.expires_at.timestamp());
        if let Some(token) = &token {
            let mut signed = pairs.clone();
            signed.push((API_KEY_PARAM, token.api_key.as_str()));
            signed.push((TOKEN_PARAM, token.token.as_str()));
            set_query(&mut url, &signed);
        }

        Ok(Some(ExportUrl {
            url,
            unsigned,
            routing,
            expires_at,
        }))
    }
}

fn path_plan(
    export_type: ExportType,
    resource: &Resource,
    item: &ListItem,
) -> Result<Option<PathPlan>> {
    let format = item.media_format;
    let plan = match export_type {
        ExportType::Download if item.is_directory() => {
            let name = [item.name.as_str(), resource.name.as_deref().unwrap_or_default()]
                .into_iter()
                .find(|n| !n.is_empty())
                .unwrap_or(resource.id.as_str());
            Some(PathPlan {
                marker: None,
                tail: vec!["~arch".to_string(), format!("{name}.zip")],
            })
        }
        ExportType::Download => Some(PathPlan::plain()),
        ExportType::AndroidPlayer => {
            return Err(Error::Internal(
                "android_player URLs are composed by their exporter".into(),
            ))
        }
        _ if item.is_directory() => None,
        ExportType::Stream => match format {
            MediaFormat::Video | MediaFormat::Audio => {
                Some(PathPlan::marked("~hls", &["index.m3u8"]))
            }
            MediaFormat::Image => Some(PathPlan::plain()),
            MediaFormat::None => None,
        },
        ExportType::TorrentClientStat => Some(PathPlan::marked("~stat", &[])),
        ExportType::Subtitles => {
            (format == MediaFormat::Video).then(|| PathPlan::marked("~vi", &["subtitles.json"]))
        }
        ExportType::MediaProbe => matches!(format, MediaFormat::Video | MediaFormat::Audio)
            .then(|| PathPlan::marked("~mp", &["index.json"])),
    };
    Ok(plan)
}

fn set_path(
    url: &mut Url,
    prefix: &[String],
    resource: &Resource,
    item: &ListItem,
    plan: &PathPlan,
) -> Result<()> {
    let mut segments: Vec<String> = item_segments(item)?
        .into_iter()
        .map(str::to_string)
        .collect();
    if let Some(marker) = plan.marker {
        match segments.last_mut() {
            Some(last) => last.push_str(marker),
            None => segments.push(marker.to_string()),
        }
    }

    url.path_segments_mut()
        .map_err(|_| Error::upstream("url", "base url cannot carry a path"))?
        .clear()
        .extend(prefix)
        .push(resource.id.as_str())
        .extend(&segments)
        .extend(&plan.tail);
    Ok(())
}

/// Non-empty item path segments. `.` and `..` are refused: URL
/// normalization would resolve them to a different file than the one the
/// token is issued for.
pub(crate) fn item_segments(item: &ListItem) -> Result<Vec<&str>> {
    item.segments()
        .map(|s| match s {
            "." | ".." => Err(Error::InvalidRequest(format!(
                "item path \"{}\" contains a dot segment",
                item.path
            ))),
            _ => Ok(s),
        })
        .collect()
}

fn set_query(url: &mut Url, pairs: &[(&str, &str)]) {
    url.set_query(None);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}
