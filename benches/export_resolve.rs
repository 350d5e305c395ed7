//! Benchmark export resolution for a single item across all export types.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sl_core::config::Config;
use sl_core::{ListItem, MediaFormat, RequestParams, Resource, ResourceId, Role};
use sl_export::{ExportDispatcher, MediaTagBuilder};
use sl_sign::FixedClock;

fn dispatcher(signed: bool) -> ExportDispatcher {
    let mut config = Config::default();
    config.export.domain = "example.com".into();
    config.subtitles.host = "video-info".into();
    if signed {
        config.signing.api_key = "general-key".into();
        config.signing.api_secret = "general-secret".into();
        config.proxy_signing.api_key = "proxy-key".into();
        config.proxy_signing.api_secret = "proxy-secret".into();
    }
    ExportDispatcher::from_config_with_clock(
        &config,
        Arc::new(MediaTagBuilder),
        Arc::new(FixedClock::at_unix(1_700_000_000)),
    )
    .expect("dispatcher")
}

fn bench_resolve(c: &mut Criterion) {
    let id = ResourceId::parse("08ada5a7a6183aae1e09d831df6748d566095a10").unwrap();
    let resource = Resource::new(id);
    let item = ListItem::file("Season 1/Episode 01 [1080p].mkv", MediaFormat::Video);
    let params = RequestParams::new()
        .with_role(Role::Premium)
        .with_query("rate", "2")
        .with_query("lang", "en");

    let mut group = c.benchmark_group("export_resolve");
    for (name, signed) in [("unsigned", false), ("signed", true)] {
        let dispatcher = dispatcher(signed);
        group.bench_function(name, |b| {
            b.iter(|| {
                dispatcher
                    .get_exports(black_box(&resource), black_box(&item), None, &params)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_parse_types(c: &mut Criterion) {
    c.bench_function("parse_export_types", |b| {
        b.iter(|| {
            let raw = black_box(Some("download, stream,subtitles ,media_probe"));
            sl_core::parse_export_types(raw).unwrap()
        })
    });
}

criterion_group!(benches, bench_resolve, bench_parse_types);
criterion_main!(benches);
