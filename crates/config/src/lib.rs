//! Configuration loading, validation, and management for MirrorMind.
//!
//! Loads configuration from `~/.mirrormind/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.mirrormind/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key, if the configured endpoint needs one (Ollama does not)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub model: String,

    /// Engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Thought journal configuration
    #[serde(default)]
    pub journal: JournalConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Chat facade configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Channel configurations
    #[serde(default)]
    pub channels: HashMap<String, ChannelConfig>,
}

fn default_provider() -> String {
    "ollama".into()
}
fn default_model() -> String {
    "tinyllama".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("engine", &self.engine)
            .field("journal", &self.journal)
            .field("gateway", &self.gateway)
            .field("chat", &self.chat)
            .field("providers", &self.providers)
            .field("channels", &self.channels)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Recursion engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Depth used when a caller does not specify one
    #[serde(default = "default_depth")]
    pub default_depth: u32,

    /// Hard upper bound on requested depth
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// What to do when the provider fails mid-sequence: "halt" or "placeholder"
    #[serde(default = "default_failure_policy")]
    pub failure_policy: String,

    /// Maximum tokens per completion (0 = provider default)
    #[serde(default)]
    pub max_tokens: u32,
}

fn default_depth() -> u32 {
    3
}
fn default_max_depth() -> u32 {
    10
}
fn default_failure_policy() -> String {
    "halt".into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            max_depth: default_max_depth(),
            failure_policy: default_failure_policy(),
            max_tokens: 0,
        }
    }
}

/// Thought journal (NDJSON log) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Directory holding the per-day NDJSON files
    #[serde(default = "default_journal_dir")]
    pub dir: PathBuf,
}

fn default_journal_dir() -> PathBuf {
    AppConfig::config_dir().join("logs")
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            dir: default_journal_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8888
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Chat facade settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Delay between streamed thought messages, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Depth used by the `!think` command
    #[serde(default = "default_depth")]
    pub think_depth: u32,
}

fn default_pacing_ms() -> u64 {
    1000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            think_depth: default_depth(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Allowlist of sender IDs. Empty = deny all. ["*"] = allow all.
    #[serde(default)]
    pub allowed_users: Vec<String>,

    /// Channel-specific settings (varies by platform)
    #[serde(flatten)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.mirrormind/config.toml).
    ///
    /// Also checks environment variables:
    /// - `MIRRORMIND_API_KEY` — API key for the configured endpoint
    /// - `MIRRORMIND_PROVIDER` — override the default provider
    /// - `MIRRORMIND_MODEL` — override the default model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("MIRRORMIND_API_KEY").ok();
        }

        if let Ok(provider) = std::env::var("MIRRORMIND_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("MIRRORMIND_MODEL") {
            config.model = model;
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mirrormind")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_depth == 0 || self.engine.max_depth > 32 {
            return Err(ConfigError::ValidationError(
                "engine.max_depth must be between 1 and 32".into(),
            ));
        }

        if self.engine.default_depth == 0 || self.engine.default_depth > self.engine.max_depth {
            return Err(ConfigError::ValidationError(format!(
                "engine.default_depth must be between 1 and {}",
                self.engine.max_depth
            )));
        }

        if !matches!(self.engine.failure_policy.as_str(), "halt" | "placeholder") {
            return Err(ConfigError::ValidationError(format!(
                "engine.failure_policy must be \"halt\" or \"placeholder\", got \"{}\"",
                self.engine.failure_policy
            )));
        }

        if self.chat.pacing_ms > 60_000 {
            return Err(ConfigError::ValidationError(
                "chat.pacing_ms must be at most 60000".into(),
            ));
        }

        if self.chat.think_depth == 0 || self.chat.think_depth > self.engine.max_depth {
            return Err(ConfigError::ValidationError(format!(
                "chat.think_depth must be between 1 and {}",
                self.engine.max_depth
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            engine: EngineConfig::default(),
            journal: JournalConfig::default(),
            gateway: GatewayConfig::default(),
            chat: ChatConfig::default(),
            providers: HashMap::new(),
            channels: HashMap::new(),
        }
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
