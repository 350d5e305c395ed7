use sl_core::config::SubtitlesConfig;
use sl_core::{ExportType, MediaFormat, Result};

use super::{produced_or_skipped, url_item};
use crate::exporter::{ExportOutcome, ExportRequest, Exporter};
use crate::url::UrlBuilder;

/// Subtitle listing for video files, served by the video-info backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtitlesExporter;

impl SubtitlesExporter {
    /// `None` when no subtitle backend is configured; the type is then
    /// not registered at all.
    pub fn from_config(cfg: &SubtitlesConfig) -> Option<Self> {
        if !cfg.is_configured() {
            tracing::info!("No subtitle backend configured; subtitles exports disabled");
            return None;
        }
        Some(Self)
    }
}

impl Exporter for SubtitlesExporter {
    fn export_type(&self) -> ExportType {
        ExportType::Subtitles
    }

    fn applicable(&self, req: &ExportRequest<'_>) -> bool {
        req.item.media_format == MediaFormat::Video
    }

    fn export(&self, urls: &UrlBuilder, req: &ExportRequest<'_>) -> Result<ExportOutcome> {
        url_item(urls, req, ExportType::Subtitles).map(produced_or_skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_only_with_backend() {
        assert!(SubtitlesExporter::from_config(&SubtitlesConfig::default()).is_none());
        let cfg = SubtitlesConfig {
            host: "video-info".into(),
            port: 0,
        };
        assert!(SubtitlesExporter::from_config(&cfg).is_some());
        let cfg = SubtitlesConfig {
            host: String::new(),
            port: 8080,
        };
        assert!(SubtitlesExporter::from_config(&cfg).is_some());
    }
}
