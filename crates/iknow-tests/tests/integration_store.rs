// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # Token Store Integration Tests
//!
//! The store contract across every backend, plus claim decoding of stored
//! tokens.
//!
//! ## Test Categories
//!
//! - `test_store_*`: get/set/remove/exists
//! - `test_unavailable_*`: Environments without persistent storage
//! - `test_file_*`: File persistence
//! - `test_decode_*`: Claim decoding edge cases

use std::sync::Arc;

use iknow_auth::{
    decode, DecodeError, FileStorage, GateState, MemoryStorage, StorageBackend, Token, TokenStore,
    UnavailableStorage,
};
use iknow_tests::prelude::*;

fn backends() -> Vec<(&'static str, Arc<dyn StorageBackend>, Option<tempfile::TempDir>)> {
    let dir = temp_test_dir("iknow-store");
    let memory: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());
    let file: Arc<dyn StorageBackend> = Arc::new(FileStorage::new(
        dir.path().join(format!("{}.json", unique_test_id())),
    ));
    vec![
        ("memory", memory, None),
        ("file", file, Some(dir)),
    ]
}

// =============================================================================
// Store Contract
// =============================================================================

#[test]
fn test_store_contract_holds_for_every_backend() {
    for (name, backend, _dir) in backends() {
        let store = TokenStore::new(backend);

        assert_eq!(store.get(), None, "{}", name);
        assert!(!store.exists(), "{}", name);

        store.set(&Token::new("first.token.x")).unwrap();
        store.set(&Token::new("second.token.x")).unwrap();
        assert_eq!(store.get(), Some(Token::new("second.token.x")), "{}", name);
        assert!(store.exists(), "{}", name);

        store.remove().unwrap();
        store.remove().unwrap();
        assert_eq!(store.get(), None, "{}", name);
    }
}

#[test]
fn test_store_empty_value_does_not_exist() {
    let store = TokenStore::new(Arc::new(MemoryStorage::with_item("token", "")));

    assert_eq!(store.get(), Some(Token::new("")));
    assert!(!store.exists());
}

#[test]
fn test_store_custom_key_is_isolated() {
    let backend: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());
    let default_store = TokenStore::new(backend.clone());
    let custom_store = TokenStore::with_key(backend, "iknow.token");

    custom_store.set(&TokenFixtures::student()).unwrap();

    assert!(!default_store.exists());
    assert!(custom_store.exists());
    assert_eq!(custom_store.key(), "iknow.token");
}

#[test]
fn test_store_read_failure_is_absent_not_error() {
    let backend = Arc::new(FailingStorage::new());
    let store = TokenStore::new(backend.clone());
    store.set(&TokenFixtures::student()).unwrap();

    backend.fail_reads(true);
    assert_eq!(store.get(), None);
    assert!(!store.exists());

    backend.fail_reads(false);
    assert!(store.exists());
}

#[test]
fn test_store_write_failure_is_reported() {
    let backend = Arc::new(FailingStorage::new());
    backend.fail_writes(true);

    let store = TokenStore::new(backend);
    assert!(store.set(&TokenFixtures::student()).is_err());
}

#[test]
fn test_store_get_issues_one_backend_read() {
    let backend = Arc::new(CountingStorage::new());
    let store = TokenStore::new(backend.clone());

    store.get();
    store.exists();

    assert_eq!(backend.get_count(), 2);
    assert_eq!(backend.mutation_count(), 0);
}

// =============================================================================
// Unavailable Storage
// =============================================================================

#[test]
fn test_unavailable_reads_absent_and_ignores_writes() {
    let store = TokenStore::new(Arc::new(UnavailableStorage));

    store.set(&TokenFixtures::admin()).unwrap();
    assert_eq!(store.get(), None);
    assert!(!store.exists());
    store.remove().unwrap();
}

#[test]
fn test_unavailable_guard_redirects_to_login() {
    let harness = AuthHarness::with_backend(Arc::new(UnavailableStorage));
    harness.store_token(&TokenFixtures::admin());

    harness.mount_guard(Some("admin"));
    assert!(harness.redirector().mount().is_none());

    harness.navigator.assert_history(&["/auth/login"]);
}

// =============================================================================
// File Storage
// =============================================================================

#[test]
fn test_file_writes_plain_json_map() {
    let harness = AuthHarness::with_file_storage();
    harness.store_token(&Token::new("a.b.c"));

    let content = std::fs::read_to_string(harness.storage_path().unwrap()).unwrap();
    let map: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(map, serde_json::json!({ "token": "a.b.c" }));
}

#[test]
fn test_file_corrupt_content_reads_absent_and_is_overwritten() {
    let dir = temp_test_dir("iknow-corrupt");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = TokenStore::new(Arc::new(FileStorage::new(&path)));

    assert_eq!(store.get(), None);
    store.set(&Token::new("a.b.c")).unwrap();
    assert_eq!(store.get(), Some(Token::new("a.b.c")));
}

#[test]
fn test_file_corrupt_content_remove_recovers() {
    let dir = temp_test_dir("iknow-corrupt");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = TokenStore::new(Arc::new(FileStorage::new(&path)));
    store.remove().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&content).unwrap(), serde_json::json!({}));
}

#[test]
fn test_file_corrupt_content_sign_in_recovers_session() {
    let dir = temp_test_dir("iknow-corrupt");
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();
    let harness = AuthHarness::with_backend(Arc::new(FileStorage::new(&path)));

    let mut posts = harness.guard(Some("student"));
    assert_eq!(posts.mount(), GateState::Denied);

    harness.session().sign_in(TokenFixtures::student()).unwrap();

    assert_eq!(posts.recheck(), GateState::Allowed);
    harness
        .navigator
        .assert_history(&["/auth/login", "/home/posts"]);
}

// =============================================================================
// Claim Decoding
// =============================================================================

#[test]
fn test_decode_signed_fixture() {
    let claims = decode(&TokenFixtures::admin()).unwrap();

    assert_eq!(claims.role(), Some("admin"));
    assert_eq!(claims.id.as_deref(), Some("admin-1"));
    assert_eq!(claims.exp, Some(NOW + HOUR));
}

#[test]
fn test_decode_ignores_signature() {
    let token = TokenBuilder::new()
        .role("admin")
        .signature("tampered")
        .build();

    assert_eq!(decode(&token).unwrap().role(), Some("admin"));
}

#[test]
fn test_decode_accepts_every_base64_variant() {
    for encoding in [
        PayloadEncoding::UrlSafe,
        PayloadEncoding::UrlSafePadded,
        PayloadEncoding::Standard,
    ] {
        let token = TokenBuilder::new()
            .role("student")
            .claim("name", serde_json::json!("Student One?>"))
            .encoding(encoding)
            .build();

        let claims = decode(&token).unwrap();
        assert_eq!(claims.role(), Some("student"), "{:?}", encoding);
    }
}

#[test]
fn test_decode_float_exp_keeps_sub_second_part() {
    let token = TokenBuilder::new()
        .role("student")
        .claim("exp", serde_json::json!(1_750_000_000.75))
        .build();

    let claims = decode(&token).unwrap();
    assert_eq!(claims.exp, Some(1_750_000_000));
    assert_eq!(
        claims.expires_at(),
        chrono::DateTime::from_timestamp(1_750_000_000, 750_000_000)
    );
}

#[test]
fn test_decode_keeps_extra_claims() {
    let token = TokenBuilder::new()
        .role("admin")
        .claim("department", serde_json::json!("physics"))
        .build();

    let claims = decode(&token).unwrap();
    assert_eq!(claims.extra.get("department"), Some(&serde_json::json!("physics")));
}

#[test]
fn test_decode_rejects_malformed_tokens() {
    assert!(matches!(
        decode(&TokenFixtures::malformed()),
        Err(DecodeError::SegmentCount { found: 1 })
    ));
    assert!(matches!(
        decode(&Token::new("a.b.c.d")),
        Err(DecodeError::SegmentCount { found: 4 })
    ));
    assert!(matches!(
        decode(&Token::new("a.!!!.c")),
        Err(DecodeError::Encoding(_))
    ));
    assert!(matches!(
        decode(&TokenBuilder::new().raw_payload("{role").build()),
        Err(DecodeError::Payload(_))
    ));
    assert!(matches!(
        decode(&TokenBuilder::new().raw_payload("[1,2]").build()),
        Err(DecodeError::NotAnObject)
    ));
}
