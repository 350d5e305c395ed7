//! The [`Exporter`] trait: one policy object per export type.

use sl_core::{ExportType, ListItem, RequestParams, Resource, Result};

use crate::response::ExportItem;
use crate::url::UrlBuilder;

/// Immutable inputs of one resolution, shared by every exporter it runs.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub resource: &'a Resource,
    pub item: &'a ListItem,
    pub params: &'a RequestParams,
}

/// Outcome of a single exporter call. `Skipped` is not an error; the type
/// is simply absent from the response.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Produced(ExportItem),
    Skipped(&'static str),
}

/// A policy producing at most one [`ExportItem`] of its type.
///
/// Exporters are built once at startup and shared read-only across
/// requests; the routing and signing context is passed in by reference.
pub trait Exporter: Send + Sync {
    fn export_type(&self) -> ExportType;

    /// Cheap applicability check run before [`export`](Exporter::export).
    /// Returns `true` by default.
    fn applicable(&self, _req: &ExportRequest<'_>) -> bool {
        true
    }

    fn export(&self, urls: &UrlBuilder, req: &ExportRequest<'_>) -> Result<ExportOutcome>;
}
