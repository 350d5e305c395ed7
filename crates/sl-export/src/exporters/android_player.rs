use sl_core::{Error, ExportType, Result};

use crate::exporter::{ExportOutcome, ExportRequest, Exporter};
use crate::response::ExportItem;
use crate::url::{item_segments, UrlBuilder};

/// Points Android clients at the REST endpoint that hands out a
/// ready-to-play URL. Unlike `stream` it is produced for directories too,
/// so a client browsing a season folder still has a stable endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidPlayerExporter;

impl Exporter for AndroidPlayerExporter {
    fn export_type(&self) -> ExportType {
        ExportType::AndroidPlayer
    }

    fn export(&self, urls: &UrlBuilder, req: &ExportRequest<'_>) -> Result<ExportOutcome> {
        item_segments(req.item)?;
        let (mut url, _) = urls.base_url(req)?;
        url.path_segments_mut()
            .map_err(|_| Error::upstream("android_player", "base url cannot carry a path"))?
            .clear()
            .extend(["resource", req.resource.id.as_str(), "android-player"]);

        let path = req.item.trimmed_path();
        if !req.item.is_directory() && !path.is_empty() {
            url.query_pairs_mut().append_pair("path", path);
        }

        Ok(ExportOutcome::Produced(ExportItem::new(
            ExportType::AndroidPlayer,
            url.to_string(),
        )))
    }
}
