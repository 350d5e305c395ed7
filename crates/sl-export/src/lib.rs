//! sl-export: turn one listed item of a resource into the set of URLs a
//! client can use for it.
//!
//! The [`ExportDispatcher`] owns an immutable registry of [`Exporter`]s keyed
//! by [`ExportType`](sl_core::ExportType). Each exporter decides whether its
//! type applies to the item and, if so, asks the shared [`UrlBuilder`] for a
//! URL. The builder routes the request to a (possibly sharded) host via
//! [`Routing`] and attaches a signed token when the type's [`TokenPolicy`]
//! asks for one.

pub mod dispatcher;
pub mod exporter;
pub mod exporters;
pub mod response;
pub mod routing;
pub mod signing;
pub mod tag;
pub mod url;

pub use dispatcher::{default_exporters, DispatcherBuilder, ExportDispatcher};
pub use exporter::{ExportOutcome, ExportRequest, Exporter};
pub use response::{ExportItem, ExportMeta, ExportResponse};
pub use routing::{shard_label, Routing, RoutingDecision};
pub use signing::{Credential, Signers, TokenPolicy};
pub use tag::{MediaTagBuilder, StreamTag, TagBuilder};
pub use self::url::{ExportUrl, UrlBuilder, API_KEY_PARAM, TOKEN_PARAM};
