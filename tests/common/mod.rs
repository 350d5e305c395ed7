//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds a configuration and an
//! [`ExportDispatcher`] signing against a fixed clock, plus helpers to verify
//! the tokens it emits.

#![allow(dead_code)]

use std::sync::Arc;

use sl_core::config::Config;
use sl_core::{ExportType, ListItem, RequestParams, Resource, ResourceId, Result};
use sl_export::{ExportDispatcher, ExportResponse, MediaTagBuilder};
use sl_sign::{Claims, Credentials, FixedClock, TokenVerifier};
use url::Url;

/// Issue time of every token minted through the harness.
pub const T0: i64 = 1_700_000_000;

pub const GENERAL_KEY: &str = "general-key";
pub const GENERAL_SECRET: &str = "general-secret";
pub const PROXY_KEY: &str = "proxy-key";
pub const PROXY_SECRET: &str = "proxy-secret";

/// Config with fixed domains and sharding on, no credentials.
pub fn base_config() -> Config {
    let mut config = Config::default();
    config.export.domain = "example.com".into();
    config.export.premium_domain = "premium.example.com".into();
    config
}

/// [`base_config`] with both credential sets and a subtitle backend.
pub fn full_config() -> Config {
    let mut config = base_config();
    config.signing.api_key = GENERAL_KEY.into();
    config.signing.api_secret = GENERAL_SECRET.into();
    config.proxy_signing.api_key = PROXY_KEY.into();
    config.proxy_signing.api_secret = PROXY_SECRET.into();
    config.subtitles.host = "video-info".into();
    config.subtitles.port = 8080;
    config
}

pub struct TestHarness {
    pub config: Config,
    pub dispatcher: ExportDispatcher,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(base_config())
    }

    pub fn with_config(config: Config) -> Self {
        let dispatcher = ExportDispatcher::from_config_with_clock(
            &config,
            Arc::new(MediaTagBuilder),
            Arc::new(FixedClock::at_unix(T0)),
        )
        .expect("dispatcher from test config");
        Self { config, dispatcher }
    }

    pub fn resource(&self) -> Resource {
        Resource::new(ResourceId::parse("abc123").unwrap())
    }

    pub fn export(
        &self,
        item: &ListItem,
        types: Option<&str>,
        params: &RequestParams,
    ) -> Result<ExportResponse> {
        self.dispatcher
            .get_exports(&self.resource(), item, types, params)
    }

    /// URL of `export_type` in `response`, parsed.
    pub fn url_of(response: &ExportResponse, export_type: ExportType) -> Url {
        let item = response
            .get(export_type)
            .unwrap_or_else(|| panic!("missing {export_type} in response"));
        Url::parse(&item.url).expect("export url parses")
    }

    pub fn query_value(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Verify `token` against the given credentials at `now`.
pub fn verify(
    token: &str,
    key: &str,
    secret: &str,
    now: i64,
) -> std::result::Result<Claims, sl_sign::TokenError> {
    TokenVerifier::new(
        Credentials::new(key, secret).unwrap(),
        Arc::new(FixedClock::at_unix(now)),
    )
    .verify(token)
}
