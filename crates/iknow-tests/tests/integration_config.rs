// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! # Configuration Integration Tests
//!
//! Integration tests for iknow-config functionality including:
//!
//! - Loading YAML, TOML and JSON files
//! - Validation rules
//! - Building an auth context from a loaded configuration
//!
//! ## Test Categories
//!
//! - `test_load_*`: File loading
//! - `test_validation_*`: Rejected configurations
//! - `test_context_*`: Wiring the auth core from configuration

use std::path::Path;
use std::sync::Arc;

use iknow_auth::{GateState, RecordingNavigator, RedirectPolicy, RenderPolicy};
use iknow_config::{
    ClientConfig, ConfigError, ConfigFormat, ConfigLoader, LogFormat, LogLevel, StorageBackendKind,
};
use iknow_tests::prelude::*;

/// A loader that ignores the process environment.
fn hermetic_loader() -> ConfigLoader {
    ConfigLoader::new().with_env_prefix("IKNOW_IT_UNUSED_PREFIX")
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}

const FULL_YAML: &str = r#"
auth:
  storage_key: iknow.token
  render_policy: eager
  redirect_policy: strict
  purge_invalid_tokens: false
  routes:
    login: /signin
    unmapped_role: /home
storage:
  backend: file
  path: tokens.json
logging:
  level: debug
  format: json
"#;

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_yaml_file() {
    init_test_logging();
    let dir = temp_test_dir("iknow-config");
    let path = write(dir.path(), "iknow.yaml", FULL_YAML);

    let config = hermetic_loader().load(&path).unwrap();

    assert_eq!(config.auth.storage_key, "iknow.token");
    assert_eq!(config.auth.render_policy, RenderPolicy::Eager);
    assert_eq!(config.auth.redirect_policy, RedirectPolicy::Strict);
    assert!(!config.auth.purge_invalid_tokens);
    assert_eq!(config.auth.routes.login, "/signin");
    assert_eq!(config.auth.routes.unmapped_role.as_deref(), Some("/home"));
    // Unset routes keep their defaults.
    assert_eq!(config.auth.routes.student_home, "/home/posts");
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_load_relative_storage_path_resolves_against_file() {
    let dir = temp_test_dir("iknow-config");
    let path = write(dir.path(), "iknow.yaml", FULL_YAML);

    let config = hermetic_loader().load(&path).unwrap();

    assert_eq!(config.storage.path, dir.path().join("tokens.json"));
}

#[test]
fn test_load_toml_and_json_match_yaml() {
    let dir = temp_test_dir("iknow-config");
    let toml = write(
        dir.path(),
        "iknow.toml",
        r#"
[auth]
render_policy = "eager"

[storage]
backend = "memory"
"#,
    );
    let json = write(
        dir.path(),
        "iknow.json",
        r#"{ "auth": { "render_policy": "eager" }, "storage": { "backend": "memory" } }"#,
    );
    let yaml = write(
        dir.path(),
        "iknow.yml",
        "auth:\n  render_policy: eager\nstorage:\n  backend: memory\n",
    );

    let loader = hermetic_loader().with_path_resolution(false);
    let from_toml = loader.load(&toml).unwrap();
    let from_json = loader.load(&json).unwrap();
    let from_yaml = loader.load(&yaml).unwrap();

    assert_eq!(from_toml, from_json);
    assert_eq!(from_json, from_yaml);
    assert_eq!(from_yaml.storage.backend, StorageBackendKind::Memory);
}

#[test]
fn test_load_missing_file() {
    let dir = temp_test_dir("iknow-config");
    let path = dir.path().join("absent.yaml");

    let err = hermetic_loader().load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));

    let config = hermetic_loader()
        .with_path_resolution(false)
        .load_or_default(&path)
        .unwrap();
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn test_load_unknown_extension_is_rejected() {
    let dir = temp_test_dir("iknow-config");
    let path = write(dir.path(), "iknow.ini", "[auth]\n");

    let err = hermetic_loader().load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn test_load_placeholder_default_is_used() {
    let content = "storage:\n  backend: file\n  path: \"${IKNOW_IT_UNSET_HOME_7F3A:/var/lib/iknow}/storage.json\"\n";

    let config = hermetic_loader()
        .load_from_str(content, ConfigFormat::Yaml)
        .unwrap();

    assert_eq!(
        config.storage.path,
        std::path::PathBuf::from("/var/lib/iknow/storage.json")
    );
}

#[test]
fn test_load_syntax_error_names_the_file() {
    let dir = temp_test_dir("iknow-config");
    let path = write(dir.path(), "broken.json", "{ \"auth\": ");

    match hermetic_loader().load(&path).unwrap_err() {
        ConfigError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected Parse error, got {:?}", other),
    }
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validation_relative_route_is_rejected() {
    let err = hermetic_loader()
        .load_from_str("auth:\n  routes:\n    login: auth/login\n", ConfigFormat::Yaml)
        .unwrap_err();

    assert!(matches!(err, ConfigError::Auth(_)));
    assert!(err.to_string().contains("routes.login"));
}

#[test]
fn test_validation_empty_storage_key_is_rejected() {
    let err = hermetic_loader()
        .load_from_str(r#"{ "auth": { "storage_key": "" } }"#, ConfigFormat::Json)
        .unwrap_err();

    assert!(matches!(err, ConfigError::Auth(_)));
}

#[test]
fn test_validation_bad_render_policy_is_a_parse_error() {
    let err = hermetic_loader()
        .load_from_str(r#"{ "auth": { "render_policy": "lazy" } }"#, ConfigFormat::Json)
        .unwrap_err();

    assert!(!matches!(err, ConfigError::Auth(_)));
}

// =============================================================================
// Auth Context
// =============================================================================

#[test]
fn test_context_from_file_config_persists_tokens() {
    let dir = temp_test_dir("iknow-config");
    let path = write(dir.path(), "iknow.yaml", FULL_YAML);
    let config = hermetic_loader().load(&path).unwrap();

    let navigator = Arc::new(RecordingNavigator::new());
    let ctx = config.auth_context(navigator.clone());
    ctx.session().sign_in(TokenFixtures::student()).unwrap();

    let content = std::fs::read_to_string(dir.path().join("tokens.json")).unwrap();
    assert!(content.contains("iknow.token"));

    // A fresh context over the same config sees the stored token.
    let again = config.auth_context(navigator.clone());
    assert!(again.store().exists());
}

#[test]
fn test_context_routes_come_from_config() {
    let config = hermetic_loader()
        .with_path_resolution(false)
        .load_from_str(
            "auth:\n  routes:\n    login: /signin\nstorage:\n  backend: memory\n",
            ConfigFormat::Yaml,
        )
        .unwrap();

    let navigator = Arc::new(RecordingNavigator::new());
    let ctx = config.auth_context(navigator.clone());
    let mut guard = ctx.guard(Some("admin"));

    assert_eq!(guard.mount(), GateState::Denied);
    navigator.assert_history(&["/signin"]);
}

#[test]
fn test_context_unavailable_backend_never_signs_in() {
    let config = hermetic_loader()
        .load_from_str(r#"{ "storage": { "backend": "unavailable" } }"#, ConfigFormat::Json)
        .unwrap();

    let ctx = config.auth_context(Arc::new(RecordingNavigator::new()));
    ctx.session().sign_in(TokenFixtures::admin()).unwrap();

    assert!(!ctx.session().is_authenticated());
}
