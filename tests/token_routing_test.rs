//! Integration tests for shard routing and the token issuer/verifier pair.

mod common;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use common::{verify, GENERAL_KEY, GENERAL_SECRET, T0};
use sl_core::config::ExportConfig;
use sl_core::{ResourceId, Role};
use sl_export::{shard_label, Routing};
use sl_sign::{Credentials, FixedClock, TokenError, TokenIssuer};

fn issuer(ttl_secs: u64) -> TokenIssuer {
    TokenIssuer::new(
        Credentials::new(GENERAL_KEY, GENERAL_SECRET).unwrap(),
        Duration::from_secs(ttl_secs),
        Arc::new(FixedClock::at_unix(T0)),
    )
    .unwrap()
}

fn rid(s: &str) -> ResourceId {
    ResourceId::parse(s).unwrap()
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn shard_label_is_deterministic_and_in_range() {
    let count = NonZeroU32::new(8).unwrap();
    for i in 0..200 {
        let id = rid(&format!("res{i:04}"));
        let first = shard_label(&id, count);
        assert_eq!(first, shard_label(&id, count));
        assert!(first < 8);
    }
}

#[test]
fn shards_spread_over_the_pool() {
    let count = NonZeroU32::new(4).unwrap();
    let mut seen = [false; 4];
    for i in 0..200 {
        seen[shard_label(&rid(&format!("r{i}")), count) as usize] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
fn routing_instances_agree() {
    let cfg = ExportConfig {
        domain: "example.com".into(),
        ..ExportConfig::default()
    };
    let a = Routing::from_config(&cfg).unwrap();
    let b = Routing::from_config(&cfg).unwrap();
    let id = rid("abc123");
    assert_eq!(
        a.select(&id, None, None).unwrap(),
        b.select(&id, Some(Role::Free), None).unwrap()
    );
}

#[test]
fn premium_domain_is_sharded_too() {
    let cfg = ExportConfig {
        domain: "example.com".into(),
        premium_domain: "premium.example.com".into(),
        ..ExportConfig::default()
    };
    let routing = Routing::from_config(&cfg).unwrap();
    let decision = routing.select(&rid("abc123"), Some(Role::Premium), None).unwrap();
    assert_eq!(decision.base_domain, "premium.example.com");
    let shard = decision.shard.unwrap();
    assert_eq!(decision.host, format!("{shard}.premium.example.com"));
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[test]
fn token_valid_until_ttl_elapses() {
    let token = issuer(600).issue(&rid("abc123"), "/season1/e01.mkv", Role::Free).unwrap();
    assert_eq!(token.api_key, GENERAL_KEY);
    assert_eq!(token.expires_at.timestamp(), T0 + 600);

    let claims = verify(&token.token, GENERAL_KEY, GENERAL_SECRET, T0).unwrap();
    assert_eq!(claims.path, "season1/e01.mkv");
    assert_eq!(claims.iat, T0);
    assert!(verify(&token.token, GENERAL_KEY, GENERAL_SECRET, T0 + 599).is_ok());

    let err = verify(&token.token, GENERAL_KEY, GENERAL_SECRET, T0 + 600).unwrap_err();
    assert!(matches!(err, TokenError::Expired { .. }));
}

#[test]
fn token_from_other_secret_is_rejected() {
    let token = issuer(600).issue(&rid("abc123"), "a", Role::Free).unwrap();
    let err = verify(&token.token, GENERAL_KEY, "another-secret", T0).unwrap_err();
    assert!(matches!(err, TokenError::BadSignature));
}

#[test]
fn tampered_claims_are_rejected() {
    let token = issuer(600).issue(&rid("abc123"), "a", Role::Free).unwrap();
    let parts: Vec<&str> = token.token.split('.').collect();
    let premium = issuer(600).issue(&rid("abc123"), "a", Role::Premium).unwrap();
    let premium_claims = premium.token.split('.').nth(1).unwrap();

    let forged = format!("{}.{}.{}", parts[0], premium_claims, parts[2]);
    let err = verify(&forged, GENERAL_KEY, GENERAL_SECRET, T0).unwrap_err();
    assert!(matches!(err, TokenError::BadSignature));
}

#[test]
fn token_errors_map_to_unauthorized() {
    let err: sl_core::Error = verify("not-a-token", GENERAL_KEY, GENERAL_SECRET, T0)
        .unwrap_err()
        .into();
    assert_eq!(err.http_status(), 401);
}
