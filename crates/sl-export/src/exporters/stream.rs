use std::sync::Arc;

use sl_core::{ExportType, Result};

use super::url_item;
use crate::exporter::{ExportOutcome, ExportRequest, Exporter};
use crate::tag::TagBuilder;
use crate::url::UrlBuilder;

/// Adaptive stream for media items, decorated with a tag from the
/// configured [`TagBuilder`].
#[derive(Clone)]
pub struct StreamExporter {
    tags: Arc<dyn TagBuilder>,
}

impl StreamExporter {
    pub fn new(tags: Arc<dyn TagBuilder>) -> Self {
        Self { tags }
    }
}

impl std::fmt::Debug for StreamExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamExporter").finish_non_exhaustive()
    }
}

impl Exporter for StreamExporter {
    fn export_type(&self) -> ExportType {
        ExportType::Stream
    }

    fn applicable(&self, req: &ExportRequest<'_>) -> bool {
        req.item.media_format.is_media()
    }

    fn export(&self, urls: &UrlBuilder, req: &ExportRequest<'_>) -> Result<ExportOutcome> {
        let Some(item) = url_item(urls, req, ExportType::Stream)? else {
            return Ok(ExportOutcome::Skipped("url builder declined item"));
        };
        let tag = self.tags.build(req)?;
        Ok(ExportOutcome::Produced(item.with_tag(tag)))
    }
}
