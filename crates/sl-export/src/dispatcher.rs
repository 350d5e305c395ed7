//! Export Dispatcher: resolve requested export types against the
//! registered exporters and assemble the response.

use std::collections::BTreeMap;
use std::sync::Arc;

use sl_core::config::Config;
use sl_core::{parse_export_types, ExportType, ListItem, RequestParams, Resource, Result};
use sl_sign::{Clock, SystemClock};

use crate::exporter::{ExportOutcome, ExportRequest, Exporter};
use crate::exporters::{
    AndroidPlayerExporter, DownloadExporter, MediaProbeExporter, StreamExporter,
    SubtitlesExporter, TorrentStatExporter,
};
use crate::response::ExportResponse;
use crate::tag::TagBuilder;
use crate::url::UrlBuilder;

/// Stock exporters in registration order. Subtitles is absent when no
/// subtitle backend is configured.
pub fn default_exporters(cfg: &Config, tags: Arc<dyn TagBuilder>) -> Vec<Box<dyn Exporter>> {
    let mut exporters: Vec<Box<dyn Exporter>> = Vec::with_capacity(ExportType::ALL.len());
    exporters.push(Box::new(DownloadExporter));
    exporters.push(Box::new(StreamExporter::new(tags)));
    exporters.push(Box::new(TorrentStatExporter));
    if let Some(subtitles) = SubtitlesExporter::from_config(&cfg.subtitles) {
        exporters.push(Box::new(subtitles));
    }
    exporters.push(Box::new(MediaProbeExporter));
    exporters.push(Box::new(AndroidPlayerExporter));
    exporters
}

/// Collects exporters before the registry is frozen.
pub struct DispatcherBuilder {
    urls: UrlBuilder,
    exporters: BTreeMap<ExportType, Vec<Box<dyn Exporter>>>,
}

impl DispatcherBuilder {
    /// Register an exporter. Exporters of one type run in registration order.
    pub fn register(mut self, exporter: Box<dyn Exporter>) -> Self {
        self.exporters
            .entry(exporter.export_type())
            .or_default()
            .push(exporter);
        self
    }

    pub fn register_all(self, exporters: impl IntoIterator<Item = Box<dyn Exporter>>) -> Self {
        exporters.into_iter().fold(self, Self::register)
    }

    pub fn build(self) -> ExportDispatcher {
        ExportDispatcher {
            urls: self.urls,
            exporters: self.exporters,
        }
    }
}

/// Immutable registry of exporters keyed by export type, shared across
/// requests.
pub struct ExportDispatcher {
    urls: UrlBuilder,
    exporters: BTreeMap<ExportType, Vec<Box<dyn Exporter>>>,
}

impl ExportDispatcher {
    pub fn builder(urls: UrlBuilder) -> DispatcherBuilder {
        DispatcherBuilder {
            urls,
            exporters: BTreeMap::new(),
        }
    }

    /// Dispatcher with the stock exporters, signing against the system clock.
    pub fn from_config(cfg: &Config, tags: Arc<dyn TagBuilder>) -> Result<Self> {
        Self::from_config_with_clock(cfg, tags, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(
        cfg: &Config,
        tags: Arc<dyn TagBuilder>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let urls = UrlBuilder::from_config(cfg, clock)?;
        let dispatcher = Self::builder(urls)
            .register_all(default_exporters(cfg, tags))
            .build();
        tracing::debug!(
            types = ?dispatcher.exporters.keys().collect::<Vec<_>>(),
            sharded = dispatcher.urls.routing().is_sharded(),
            "Export dispatcher ready"
        );
        Ok(dispatcher)
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Number of exporters registered for `export_type`.
    pub fn registered(&self, export_type: ExportType) -> usize {
        self.exporters.get(&export_type).map_or(0, Vec::len)
    }

    /// Parse the caller's comma-separated type list and resolve it. An
    /// unknown type fails before any exporter runs.
    pub fn get_exports(
        &self,
        resource: &Resource,
        item: &ListItem,
        types: Option<&str>,
        params: &RequestParams,
    ) -> Result<ExportResponse> {
        let types = parse_export_types(types)?;
        self.resolve(resource, item, &types, params)
    }

    /// Run every registered exporter of each requested type, in order.
    ///
    /// A later result for a type replaces an earlier one; a skip leaves any
    /// earlier result in place. The first exporter error aborts the whole
    /// resolution and no partial response is returned.
    pub fn resolve(
        &self,
        resource: &Resource,
        item: &ListItem,
        types: &[ExportType],
        params: &RequestParams,
    ) -> Result<ExportResponse> {
        let req = ExportRequest {
            resource,
            item,
            params,
        };
        let mut export_items = BTreeMap::new();

        for &export_type in types {
            let Some(exporters) = self.exporters.get(&export_type) else {
                tracing::debug!(export_type = %export_type, "No exporter registered");
                continue;
            };
            for exporter in exporters {
                if !exporter.applicable(&req) {
                    tracing::debug!(
                        export_type = %export_type,
                        resource = %resource.id,
                        path = %item.path,
                        "Export not applicable"
                    );
                    continue;
                }
                match exporter.export(&self.urls, &req).map_err(|e| {
                    tracing::warn!(
                        export_type = %export_type,
                        resource = %resource.id,
                        error = %e,
                        "Export failed"
                    );
                    e
                })? {
                    ExportOutcome::Produced(export_item) => {
                        export_items.insert(export_type, export_item);
                    }
                    ExportOutcome::Skipped(reason) => {
                        tracing::debug!(export_type = %export_type, reason, "Export skipped");
                    }
                }
            }
        }

        Ok(ExportResponse {
            source: item.clone(),
            export_items,
        })
    }
}

impl std::fmt::Debug for ExportDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: BTreeMap<ExportType, usize> =
            self.exporters.iter().map(|(t, e)| (*t, e.len())).collect();
        f.debug_struct("ExportDispatcher")
            .field("urls", &self.urls)
            .field("registered", &registered)
            .finish()
    }
}
