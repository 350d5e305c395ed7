//! The closed set of export types and parsing of caller type lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A client-facing URL purpose.
///
/// Ordering follows declaration order, which is also the expansion order
/// when a caller asks for every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    Download,
    Stream,
    TorrentClientStat,
    Subtitles,
    MediaProbe,
    AndroidPlayer,
}

impl ExportType {
    /// Every declared type, in declaration order.
    pub const ALL: [ExportType; 6] = [
        Self::Download,
        Self::Stream,
        Self::TorrentClientStat,
        Self::Subtitles,
        Self::MediaProbe,
        Self::AndroidPlayer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Stream => "stream",
            Self::TorrentClientStat => "torrent_client_stat",
            Self::Subtitles => "subtitles",
            Self::MediaProbe => "media_probe",
            Self::AndroidPlayer => "android_player",
        }
    }

    /// Whether items of this type carry an export-meta descriptor.
    pub fn supports_meta(self) -> bool {
        matches!(self, Self::Download | Self::Stream)
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportType {
    type Err = Error;

    /// Exact, case-sensitive match against the declared names.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::unknown_export_type(s))
    }
}

/// Parse a caller-supplied, comma-separated type list.
///
/// `None` or an empty string expands to [`ExportType::ALL`]. Each token is
/// trimmed and must name a declared type; the first unknown token fails the
/// whole list. Duplicates are preserved.
pub fn parse_export_types(raw: Option<&str>) -> Result<Vec<ExportType>> {
    match raw {
        None | Some("") => Ok(ExportType::ALL.to_vec()),
        Some(list) => list.split(',').map(|t| t.trim().parse()).collect(),
    }
}
