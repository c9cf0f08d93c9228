// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 IKnow Team. All rights reserved.

//! Configuration loading and processing.
//!
//! # Loading Pipeline
//!
//! 1. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw file
//! 2. Parse YAML, TOML or JSON by file extension
//! 3. Apply `IKNOW_*` environment overrides
//! 4. Resolve the storage path against the config file's directory
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! IKNOW_AUTH_STORAGE_KEY=token
//! IKNOW_AUTH_UNMAPPED_ROLE_ROUTE=/home
//! IKNOW_AUTH_RENDER_POLICY=eager
//! IKNOW_AUTH_REDIRECT_POLICY=strict
//! IKNOW_STORAGE_BACKEND=memory
//! IKNOW_STORAGE_PATH=/var/lib/iknow/storage.json
//! IKNOW_LOG_LEVEL=debug
//! IKNOW_LOG_FORMAT=json
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use iknow_auth::{RedirectPolicy, RenderPolicy};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{ClientConfig, LogFormat, LogLevel, StorageBackendKind};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "IKNOW";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use iknow_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("iknow.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory for resolving relative paths.
    base_path: Option<PathBuf>,

    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve environment variables.
    resolve_env_vars: bool,

    /// Whether to resolve relative paths.
    resolve_paths: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            base_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
            resolve_paths: true,
        }
    }

    /// Sets the base path for resolving relative paths.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Enables or disables relative path resolution.
    pub fn with_path_resolution(mut self, enabled: bool) -> Self {
        self.resolve_paths = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<ClientConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        self.finish(&mut config, Some(path))?;

        debug!(
            storage_backend = config.storage.backend.as_str(),
            storage_key = %config.auth.storage_key,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from a file, falling back to defaults (plus
    /// environment overrides) when the file does not exist.
    pub fn load_or_default(&self, path: impl AsRef<Path>) -> ConfigResult<ClientConfig> {
        let path = path.as_ref();
        if path.exists() {
            return self.load(path);
        }

        debug!("No configuration file at {}, using defaults", path.display());
        let mut config = ClientConfig::default();
        self.finish(&mut config, None)?;
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<ClientConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        let mut config = parse_str(&content, format)?;
        self.finish(&mut config, None)?;
        Ok(config)
    }

    fn finish(&self, config: &mut ClientConfig, path: Option<&Path>) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_env_overrides(config)?;
        }

        if self.resolve_paths {
            let base_path = self
                .base_path
                .clone()
                .or_else(|| path.and_then(Path::parent).map(Path::to_path_buf));
            if let Some(base_path) = base_path {
                if config.storage.path.is_relative() {
                    config.storage.path = base_path.join(&config.storage.path);
                }
            }
        }

        config.validate()
    }

    /// Reads file content.
    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Parses content based on format.
    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<ClientConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    /// Resolves environment variable placeholders in content.
    ///
    /// Supports the format: `${VAR_NAME}` or `${VAR_NAME:default}`
    fn resolve_env_placeholders(&self, content: &str) -> String {
        resolve_placeholders(content, |name| env::var(name).ok())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut ClientConfig) -> ConfigResult<()> {
        apply_overrides(config, &self.env_prefix, |name| env::var(name).ok())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<ClientConfig> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML parsing through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

fn resolve_placeholders(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next(); // '{'

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (lookup(var_name), default_value) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!("Environment variable '{}' not found", var_name);
                result.push_str("${");
                result.push_str(var_name);
                result.push('}');
            }
        }
    }

    result
}

fn apply_overrides(
    config: &mut ClientConfig,
    prefix: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    let var = |suffix: &str| {
        let name = format!("{}_{}", prefix, suffix);
        lookup(&name).map(|value| (name, value))
    };

    if let Some((_, value)) = var("AUTH_STORAGE_KEY") {
        config.auth.storage_key = value;
    }
    if let Some((_, value)) = var("AUTH_UNMAPPED_ROLE_ROUTE") {
        config.auth.routes.unmapped_role = Some(value).filter(|v| !v.is_empty());
    }
    if let Some((name, value)) = var("AUTH_RENDER_POLICY") {
        config.auth.render_policy = match value.to_lowercase().as_str() {
            "blocking" => RenderPolicy::Blocking,
            "eager" => RenderPolicy::Eager,
            _ => return Err(ConfigError::invalid_env_var(name, "expected blocking or eager")),
        };
    }
    if let Some((name, value)) = var("AUTH_REDIRECT_POLICY") {
        config.auth.redirect_policy = match value.to_lowercase().as_str() {
            "presence" => RedirectPolicy::Presence,
            "strict" => RedirectPolicy::Strict,
            _ => return Err(ConfigError::invalid_env_var(name, "expected presence or strict")),
        };
    }
    if let Some((name, value)) = var("STORAGE_BACKEND") {
        config.storage.backend = StorageBackendKind::parse(&value).ok_or_else(|| {
            ConfigError::invalid_env_var(name, "expected file, memory or unavailable")
        })?;
    }
    if let Some((_, value)) = var("STORAGE_PATH") {
        config.storage.path = PathBuf::from(value);
    }
    if let Some((_, value)) = var("LOG_LEVEL") {
        match LogLevel::parse(&value) {
            Some(level) => config.logging.level = level,
            None => warn!(value = %value, "Ignoring unknown log level override"),
        }
    }
    if let Some((_, value)) = var("LOG_FORMAT") {
        match LogFormat::parse(&value) {
            Some(format) => config.logging.format = format,
            None => warn!(value = %value, "Ignoring unknown log format override"),
        }
    }

    Ok(())
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<ClientConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a file, or defaults when it does not exist.
pub fn load_config_or_default(path: impl AsRef<Path>) -> ConfigResult<ClientConfig> {
    ConfigLoader::new().load_or_default(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<ClientConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
auth:
  storage_key: iknow_token
  render_policy: eager
  routes:
    unmapped_role: /home

storage:
  backend: memory

logging:
  level: debug
"#;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = ConfigLoader::new().with_env_vars(false).load(file.path()).unwrap();

        assert_eq!(config.auth.storage_key, "iknow_token");
        assert_eq!(config.auth.render_policy, RenderPolicy::Eager);
        assert_eq!(config.auth.routes.unmapped_role.as_deref(), Some("/home"));
        assert_eq!(config.auth.routes.login, "/auth/login");
        assert_eq!(config.storage.backend, StorageBackendKind::Memory);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_load_toml_resolves_storage_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iknow.toml");
        fs::write(
            &path,
            "[auth]\nredirect_policy = \"strict\"\n\n[storage]\npath = \"state/storage.json\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new().with_env_vars(false).load(&path).unwrap();

        assert_eq!(config.auth.redirect_policy, RedirectPolicy::Strict);
        assert_eq!(config.storage.path, dir.path().join("state/storage.json"));
    }

    #[test]
    fn test_load_json_rejects_relative_route() {
        let loader = ConfigLoader::new().with_env_vars(false);
        let result = loader.load_from_str(r#"{"auth":{"routes":{"login":"login"}}}"#, ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigError::Auth(_))));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{ nope").unwrap();

        let result = ConfigLoader::new().with_env_vars(false).load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("iknow.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("iknow.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("iknow.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("iknow")).is_err());
    }

    #[test]
    fn test_placeholders() {
        let vars = lookup(&[("STORAGE_KEY", "campus")]);

        assert_eq!(resolve_placeholders("key: ${STORAGE_KEY}", &vars), "key: campus");
        assert_eq!(resolve_placeholders("key: ${MISSING:token}", &vars), "key: token");
        assert_eq!(resolve_placeholders("key: ${MISSING}", &vars), "key: ${MISSING}");
        assert_eq!(resolve_placeholders("key: ${OPEN", &vars), "key: ${OPEN");
        assert_eq!(resolve_placeholders("cost: $5", &vars), "cost: $5");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        let vars = lookup(&[
            ("IKNOW_AUTH_STORAGE_KEY", "campus_token"),
            ("IKNOW_AUTH_UNMAPPED_ROLE_ROUTE", "/home"),
            ("IKNOW_AUTH_RENDER_POLICY", "Eager"),
            ("IKNOW_AUTH_REDIRECT_POLICY", "strict"),
            ("IKNOW_STORAGE_BACKEND", "memory"),
            ("IKNOW_STORAGE_PATH", "/tmp/iknow.json"),
            ("IKNOW_LOG_LEVEL", "trace"),
            ("IKNOW_LOG_FORMAT", "json"),
        ]);

        apply_overrides(&mut config, "IKNOW", vars).unwrap();

        assert_eq!(config.auth.storage_key, "campus_token");
        assert_eq!(config.auth.routes.unmapped_role.as_deref(), Some("/home"));
        assert_eq!(config.auth.render_policy, RenderPolicy::Eager);
        assert_eq!(config.auth.redirect_policy, RedirectPolicy::Strict);
        assert_eq!(config.storage.backend, StorageBackendKind::Memory);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/iknow.json"));
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_env_override() {
        let mut config = ClientConfig::default();
        let result = apply_overrides(
            &mut config,
            "IKNOW",
            lookup(&[("IKNOW_STORAGE_BACKEND", "redis")]),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { name, .. }) if name == "IKNOW_STORAGE_BACKEND"
        ));
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/iknow.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new()
            .with_env_vars(false)
            .load_or_default(dir.path().join("iknow.yaml"))
            .unwrap();

        assert_eq!(config.auth, iknow_auth::AuthConfig::default());
        assert!(config.storage.path.is_relative());
    }
}
