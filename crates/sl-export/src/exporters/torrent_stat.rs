use sl_core::{ExportType, Result};

use super::{produced_or_skipped, url_item};
use crate::exporter::{ExportOutcome, ExportRequest, Exporter};
use crate::url::UrlBuilder;

/// Torrent-client statistics for a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TorrentStatExporter;

impl Exporter for TorrentStatExporter {
    fn export_type(&self) -> ExportType {
        ExportType::TorrentClientStat
    }

    fn export(&self, urls: &UrlBuilder, req: &ExportRequest<'_>) -> Result<ExportOutcome> {
        url_item(urls, req, ExportType::TorrentClientStat).map(produced_or_skipped)
    }
}
