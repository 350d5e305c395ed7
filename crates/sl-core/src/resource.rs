//! Resource and list-item model as seen by the export layer.
//!
//! Only the fields exporters read are modeled. All values are immutable
//! snapshots handed in by the caller; nothing here is mutated during a
//! resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

// ---------------------------------------------------------------------------
// ResourceId / Resource
// ---------------------------------------------------------------------------

/// Opaque content-bundle identifier (typically a torrent infohash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Parse an identifier, rejecting values that cannot be used as a
    /// single URL path segment.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::InvalidRequest("resource id is empty".into()));
        }
        if raw.contains('/') || raw.chars().any(char::is_whitespace) {
            return Err(Error::InvalidRequest(format!(
                "resource id \"{raw}\" contains '/' or whitespace"
            )));
        }
        if raw == "." || raw == ".." {
            return Err(Error::InvalidRequest(format!(
                "resource id \"{raw}\" is a dot segment"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An addressable content bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    /// Display name of the bundle, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Resource {
    pub fn new(id: ResourceId) -> Self {
        Self { id, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ListKind
// ---------------------------------------------------------------------------

/// Whether a list item is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    File,
    Directory,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

impl FromStr for ListKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "file" => Ok(Self::File),
            "directory" => Ok(Self::Directory),
            other => Err(Error::InvalidRequest(format!("unknown item kind \"{other}\""))),
        }
    }
}

// ---------------------------------------------------------------------------
// MediaFormat
// ---------------------------------------------------------------------------

/// Media-format classifier of a list item. The empty classifier means the
/// item is not playable media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MediaFormat {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "audio")]
    Audio,
    #[serde(rename = "image")]
    Image,
}

impl MediaFormat {
    /// True for any non-empty classifier.
    pub fn is_media(self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Self::None),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "image" => Ok(Self::Image),
            other => Err(Error::InvalidRequest(format!(
                "unknown media format \"{other}\""
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ListItem
// ---------------------------------------------------------------------------

/// One entry in a resource's file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub name: String,
    /// Path relative to the resource root, `/`-separated.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ListKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub media_format: MediaFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ListItem {
    /// A file entry. The name is the last path segment.
    pub fn file(path: impl Into<String>, media_format: MediaFormat) -> Self {
        Self::new(path.into(), ListKind::File, media_format)
    }

    /// A directory entry. An empty path denotes the resource root.
    pub fn directory(path: impl Into<String>) -> Self {
        Self::new(path.into(), ListKind::Directory, MediaFormat::None)
    }

    fn new(path: String, kind: ListKind, media_format: MediaFormat) -> Self {
        let name = path
            .trim_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            path,
            kind,
            size: 0,
            media_format,
            mime_type: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == ListKind::Directory
    }

    /// The relative path without leading or trailing separators.
    pub fn trimmed_path(&self) -> &str {
        self.path.trim_matches('/')
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Service tier of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Free,
    Premium,
}

impl Role {
    pub fn is_premium(self) -> bool {
        self == Self::Premium
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            other => Err(Error::InvalidRequest(format!("unknown role \"{other}\""))),
        }
    }
}

// ---------------------------------------------------------------------------
// RequestParams
// ---------------------------------------------------------------------------

/// Caller-side inputs of one export request: the caller's claimed tier, the
/// inbound host, and the raw query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pub role: Option<Role>,
    pub host: Option<String>,
    pub query: BTreeMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Value of a query parameter, treating an empty value as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_rejects_bad_values() {
        assert!(ResourceId::parse("").is_err());
        assert!(ResourceId::parse("abc/def").is_err());
        assert!(ResourceId::parse("abc def").is_err());
        assert!(ResourceId::parse(".").is_err());
        assert!(ResourceId::parse("..").is_err());
        assert!(ResourceId::parse("..abc").is_ok());
        assert_eq!(ResourceId::parse("abc123").unwrap().as_str(), "abc123");
    }

    #[test]
    fn file_name_is_last_segment() {
        let item = ListItem::file("/season1/e01.mkv", MediaFormat::Video);
        assert_eq!(item.name, "e01.mkv");
        assert_eq!(item.trimmed_path(), "season1/e01.mkv");
        assert_eq!(item.segments().collect::<Vec<_>>(), ["season1", "e01.mkv"]);
    }

    #[test]
    fn root_directory_has_no_segments() {
        let item = ListItem::directory("/");
        assert!(item.is_directory());
        assert_eq!(item.name, "");
        assert_eq!(item.trimmed_path(), "");
        assert_eq!(item.segments().count(), 0);
    }

    #[test]
    fn media_format_serde_uses_classifier_strings() {
        let json = serde_json::to_string(&MediaFormat::None).unwrap();
        assert_eq!(json, "\"\"");
        let back: MediaFormat = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(back, MediaFormat::Video);
        assert!(back.is_media());
        assert!(!MediaFormat::None.is_media());
    }

    #[test]
    fn list_item_json_shape() {
        let item = ListItem::file("a/b.mp3", MediaFormat::Audio);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "file");
        assert_eq!(value["media_format"], "audio");
        assert!(value.get("mime_type").is_none());
    }

    #[test]
    fn role_parsing() {
        assert_eq!("premium".parse::<Role>().unwrap(), Role::Premium);
        assert_eq!("free".parse::<Role>().unwrap(), Role::Free);
        assert!("Premium".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Free);
    }

    #[test]
    fn empty_query_value_is_absent() {
        let params = RequestParams::new()
            .with_query("lang", "")
            .with_query("rate", "2");
        assert_eq!(params.get("lang"), None);
        assert_eq!(params.get("rate"), Some("2"));
    }
}
