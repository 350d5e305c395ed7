//! Tag Builder contract for stream exports.
//!
//! A tag is opaque JSON attached verbatim to the stream item; the export
//! layer never inspects it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use sl_core::{MediaFormat, Result};

use crate::exporter::ExportRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamTag(pub Value);

pub trait TagBuilder: Send + Sync {
    /// Build the client-facing descriptor for a stream export. `Ok(None)`
    /// leaves the stream item without a tag.
    fn build(&self, req: &ExportRequest<'_>) -> Result<Option<StreamTag>>;
}

/// Stock builder describing the HTML element a web player should create.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaTagBuilder;

impl TagBuilder for MediaTagBuilder {
    fn build(&self, req: &ExportRequest<'_>) -> Result<Option<StreamTag>> {
        let name = match req.item.media_format {
            MediaFormat::Video => "video",
            MediaFormat::Audio => "audio",
            MediaFormat::Image => "img",
            MediaFormat::None => return Ok(None),
        };

        let mut attributes = Map::new();
        attributes.insert("crossorigin".into(), json!("anonymous"));
        if name != "img" {
            attributes.insert("preload".into(), json!("metadata"));
            attributes.insert("controls".into(), json!(true));
        }
        if let Some(lang) = req.params.get("lang") {
            attributes.insert("lang".into(), json!(lang));
        }
        if !req.item.name.is_empty() {
            attributes.insert("title".into(), json!(req.item.name));
        }

        Ok(Some(StreamTag(json!({
            "name": name,
            "attributes": attributes,
        }))))
    }
}
