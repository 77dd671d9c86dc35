//! Configuration loading, validation, and management for threadsmith.
//!
//! Loads configuration from `~/.threadsmith/config.toml` with environment
//! variable overrides. Validates all settings at startup. The resulting
//! [`AppConfig`] is passed down explicitly; nothing below the CLI reads the
//! environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use threadsmith_core::credentials::{
    ACCESS_TOKEN_SECRET_VAR, ACCESS_TOKEN_VAR, API_KEY_VAR, API_SECRET_VAR,
};
use threadsmith_core::renderer::{DEFAULT_BACKGROUND, DEFAULT_SCALE, DEFAULT_WIDTH};
use threadsmith_core::{
    CredentialError, CredentialSource, Credentials, DEFAULT_MAX_UNIT_LENGTH, Segmenter, Theme,
};

/// Overrides the thread unit limit.
pub const MAX_UNIT_LENGTH_VAR: &str = "THREADSMITH_MAX_UNIT_LENGTH";

/// The root configuration structure.
///
/// Maps directly to `~/.threadsmith/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Thread segmentation settings
    #[serde(default)]
    pub thread: ThreadConfig,

    /// Publishing credentials
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Which publisher posts the chunks
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Diagram rendering defaults
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadConfig {
    #[serde(default = "default_max_unit_length")]
    pub max_unit_length: usize,
}

fn default_max_unit_length() -> usize {
    DEFAULT_MAX_UNIT_LENGTH
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_unit_length: default_max_unit_length(),
        }
    }
}

/// The four publishing secrets. Any may be absent until resolved.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("access_token", &redact(&self.access_token))
            .field("access_token_secret", &redact(&self.access_token_secret))
            .finish()
    }
}

impl CredentialsConfig {
    /// Overlay `other` on top of `self`: any value present in `other` wins.
    pub fn merged_with(&self, other: &CredentialsConfig) -> CredentialsConfig {
        CredentialsConfig {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            api_secret: other.api_secret.clone().or_else(|| self.api_secret.clone()),
            access_token: other.access_token.clone().or_else(|| self.access_token.clone()),
            access_token_secret: other
                .access_token_secret
                .clone()
                .or_else(|| self.access_token_secret.clone()),
        }
    }

    /// Convert to [`Credentials`], leaving absent values blank.
    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(
            self.api_key.clone().unwrap_or_default(),
            self.api_secret.clone().unwrap_or_default(),
            self.access_token.clone().unwrap_or_default(),
            self.access_token_secret.clone().unwrap_or_default(),
        )
    }

    pub fn is_complete(&self) -> bool {
        self.to_credentials().is_complete()
    }
}

impl CredentialSource for CredentialsConfig {
    fn credentials(&self) -> Result<Credentials, CredentialError> {
        self.to_credentials().require_complete()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherKind {
    /// Hand each chunk to an external program
    #[default]
    Command,
    /// Print chunks to stdout without posting
    Console,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    #[serde(default)]
    pub kind: PublisherKind,

    /// Program invoked once per chunk (command publisher only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Extra arguments passed to `program`
    #[serde(default)]
    pub args: Vec<String>,

    /// Per-post timeout in seconds
    #[serde(default = "default_publish_timeout")]
    pub timeout_secs: u64,
}

fn default_publish_timeout() -> u64 {
    30
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            kind: PublisherKind::default(),
            program: None,
            args: vec![],
            timeout_secs: default_publish_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Renderer timeout in seconds
    #[serde(default = "default_render_timeout")]
    pub timeout_secs: u64,

    /// Override the renderer executable (defaults to `mmdc` on PATH)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.into()
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_scale() -> u32 {
    DEFAULT_SCALE
}
fn default_render_timeout() -> u64 {
    60
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            background: default_background(),
            width: default_width(),
            scale: default_scale(),
            timeout_secs: default_render_timeout(),
            program: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.threadsmith/config.toml).
    ///
    /// Environment variables override file values:
    /// - `TWITTER_API_KEY`, `TWITTER_API_SECRET`,
    ///   `TWITTER_ACCESS_TOKEN`, `TWITTER_ACCESS_TOKEN_SECRET`
    /// - `THREADSMITH_MAX_UNIT_LENGTH`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let from_env = CredentialsConfig {
            api_key: get(API_KEY_VAR),
            api_secret: get(API_SECRET_VAR),
            access_token: get(ACCESS_TOKEN_VAR),
            access_token_secret: get(ACCESS_TOKEN_SECRET_VAR),
        };
        self.credentials = self.credentials.merged_with(&from_env);

        if let Some(raw) = get(MAX_UNIT_LENGTH_VAR) {
            self.thread.max_unit_length = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "{MAX_UNIT_LENGTH_VAR} must be a positive integer, got '{raw}'"
                ))
            })?;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".threadsmith")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Segmenter::new(self.thread.max_unit_length)
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("thread.max_unit_length: {e}")))?;

        if self.render.width == 0 || self.render.scale == 0 {
            return Err(ConfigError::ValidationError(
                "render.width and render.scale must be > 0".into(),
            ));
        }

        if self.render.timeout_secs == 0 || self.publisher.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be > 0 seconds".into(),
            ));
        }

        Ok(())
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for threadsmith_core::Error {
    fn from(e: ConfigError) -> Self {
        threadsmith_core::Error::Config {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.thread.max_unit_length, 280);
        assert_eq!(config.publisher.kind, PublisherKind::Command);
        assert_eq!(config.render.width, 1200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.thread.max_unit_length, config.thread.max_unit_length);
        assert_eq!(parsed.render.theme, config.render.theme);
    }

    #[test]
    fn parses_full_file() {
        let toml_str = r#"
[thread]
max_unit_length = 500

[credentials]
api_key = "k"
api_secret = "s"

[publisher]
kind = "command"
program = "post-tweet"
args = ["--json"]

[render]
theme = "forest"
background = "transparent"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.thread.max_unit_length, 500);
        assert_eq!(config.credentials.api_key.as_deref(), Some("k"));
        assert!(!config.credentials.is_complete());
        assert_eq!(config.publisher.program.as_deref(), Some("post-tweet"));
        assert_eq!(config.publisher.args, vec!["--json"]);
        assert_eq!(config.render.theme, Theme::Forest);
        assert_eq!(config.render.scale, 2);
    }

    #[test]
    fn unknown_publisher_kind_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[publisher]\nkind = \"carrier-pigeon\"");
        assert!(result.is_err());
    }

    #[test]
    fn tiny_unit_length_rejected() {
        let mut config = AppConfig::default();
        config.thread.max_unit_length = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_width_rejected() {
        let mut config = AppConfig::default();
        config.render.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().thread.max_unit_length, 280);
    }

    #[test]
    fn load_from_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[thread]\nmax_unit_length = 140\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.thread.max_unit_length, 140);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[thread\nmax_unit_length = ").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_credentials_and_limit() {
        let mut config = AppConfig::default();
        config.credentials.api_key = Some("from-file".into());

        config
            .apply_env(env(&[
                ("TWITTER_API_KEY", "from-env"),
                ("TWITTER_API_SECRET", "s"),
                ("TWITTER_ACCESS_TOKEN", "t"),
                ("TWITTER_ACCESS_TOKEN_SECRET", "ts"),
                ("THREADSMITH_MAX_UNIT_LENGTH", "500"),
            ]))
            .unwrap();

        assert_eq!(config.credentials.api_key.as_deref(), Some("from-env"));
        assert!(config.credentials.is_complete());
        assert_eq!(config.thread.max_unit_length, 500);
    }

    #[test]
    fn blank_env_values_do_not_override() {
        let mut config = AppConfig::default();
        config.credentials.api_key = Some("from-file".into());
        config.apply_env(env(&[("TWITTER_API_KEY", "  ")])).unwrap();
        assert_eq!(config.credentials.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn bad_env_limit_rejected() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("THREADSMITH_MAX_UNIT_LENGTH", "lots")])).is_err());
        assert!(config.apply_env(env(&[("THREADSMITH_MAX_UNIT_LENGTH", "3")])).is_err());
    }

    #[test]
    fn credential_source_reports_missing() {
        let creds = CredentialsConfig {
            api_key: Some("k".into()),
            ..Default::default()
        };
        let err = creds.credentials().unwrap_err();
        assert_eq!(
            err,
            CredentialError::Missing(vec![
                "TWITTER_API_SECRET",
                "TWITTER_ACCESS_TOKEN",
                "TWITTER_ACCESS_TOKEN_SECRET",
            ])
        );
    }

    #[test]
    fn merge_prefers_overlay() {
        let base = CredentialsConfig {
            api_key: Some("a".into()),
            api_secret: Some("b".into()),
            ..Default::default()
        };
        let overlay = CredentialsConfig {
            api_secret: Some("B".into()),
            ..Default::default()
        };
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.api_key.as_deref(), Some("a"));
        assert_eq!(merged.api_secret.as_deref(), Some("B"));
    }

    #[test]
    fn debug_redacts_credentials() {
        let creds = CredentialsConfig {
            api_key: Some("super-secret".into()),
            ..Default::default()
        };
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
