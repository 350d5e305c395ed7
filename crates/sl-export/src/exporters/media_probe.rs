use sl_core::{ExportType, Result};

use super::{produced_or_skipped, url_item};
use crate::exporter::{ExportOutcome, ExportRequest, Exporter};
use crate::url::UrlBuilder;

/// Media probe (container/stream info) for audio and video files.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaProbeExporter;

impl Exporter for MediaProbeExporter {
    fn export_type(&self) -> ExportType {
        ExportType::MediaProbe
    }

    fn export(&self, urls: &UrlBuilder, req: &ExportRequest<'_>) -> Result<ExportOutcome> {
        url_item(urls, req, ExportType::MediaProbe).map(produced_or_skipped)
    }
}
