use sl_core::{ExportType, Result};

use super::{produced_or_skipped, url_item};
use crate::exporter::{ExportOutcome, ExportRequest, Exporter};
use crate::url::UrlBuilder;

/// Direct download of a file, or an archive of a directory. Always
/// applicable; carries export meta.
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadExporter;

impl Exporter for DownloadExporter {
    fn export_type(&self) -> ExportType {
        ExportType::Download
    }

    fn export(&self, urls: &UrlBuilder, req: &ExportRequest<'_>) -> Result<ExportOutcome> {
        url_item(urls, req, ExportType::Download).map(produced_or_skipped)
    }
}
