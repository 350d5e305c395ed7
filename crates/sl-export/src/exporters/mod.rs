//! Built-in exporters, one per export type.

mod android_player;
mod download;
mod media_probe;
mod stream;
mod subtitles;
mod torrent_stat;

pub use android_player::AndroidPlayerExporter;
pub use download::DownloadExporter;
pub use media_probe::MediaProbeExporter;
pub use stream::StreamExporter;
pub use subtitles::SubtitlesExporter;
pub use torrent_stat::TorrentStatExporter;

use sl_core::{ExportType, Result};

use crate::exporter::{ExportOutcome, ExportRequest};
use crate::response::ExportItem;
use crate::url::UrlBuilder;

/// Build the generic URL for `export_type`, attaching export meta when the
/// type supports it. `None` when the URL builder declines the item.
fn url_item(
    urls: &UrlBuilder,
    req: &ExportRequest<'_>,
    export_type: ExportType,
) -> Result<Option<ExportItem>> {
    let Some(url) = urls.build(req, export_type)? else {
        return Ok(None);
    };
    let mut item = ExportItem::new(export_type, url.to_string());
    if export_type.supports_meta() {
        item = item.with_meta(url.export_meta());
    }
    Ok(Some(item))
}

fn produced_or_skipped(item: Option<ExportItem>) -> ExportOutcome {
    item.map_or(ExportOutcome::Skipped("url builder declined item"), ExportOutcome::Produced)
}
