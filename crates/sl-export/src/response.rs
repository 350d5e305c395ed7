//! Export items and the response assembled by the dispatcher.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sl_core::{ExportType, ListItem};

use crate::tag::StreamTag;

/// Opaque descriptor attached to download and stream items for client-side
/// caching and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<String>,
    pub path: String,
    /// Hex SHA-256 of the URL without its token parameters; stable across
    /// re-signing.
    pub cache_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// One exported URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportItem {
    #[serde(rename = "type")]
    pub export_type: ExportType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ExportMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<StreamTag>,
}

impl ExportItem {
    pub fn new(export_type: ExportType, url: impl Into<String>) -> Self {
        Self {
            export_type,
            url: url.into(),
            meta: None,
            tag: None,
        }
    }

    pub fn with_meta(mut self, meta: ExportMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_tag(mut self, tag: Option<StreamTag>) -> Self {
        self.tag = tag;
        self
    }
}

/// The echoed source item plus at most one item per export type. A missing
/// key means "not applicable".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub source: ListItem,
    pub export_items: BTreeMap<ExportType, ExportItem>,
}

impl ExportResponse {
    pub fn get(&self, export_type: ExportType) -> Option<&ExportItem> {
        self.export_items.get(&export_type)
    }

    pub fn contains(&self, export_type: ExportType) -> bool {
        self.export_items.contains_key(&export_type)
    }

    pub fn len(&self) -> usize {
        self.export_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.export_items.is_empty()
    }
}
