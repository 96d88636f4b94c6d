//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/datainsights/config.toml` and then
//! overridden by environment variables:
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `FILE_DIR` | `source.directory` |
//! | `OPENAI_API_KEY` | `llm.api_key` |
//! | `EMAIL_FROM` | `email.from_address` |
//! | `EMAIL_FROM_PASS` | `email.password` |
//! | `EMAIL_TO` | `email.to_address` |
//! | `RECIPIENT_NAME` | `email.recipient_name` |
//! | `SMTP_HOST` | `email.smtp_host` |
//! | `SMTP_PORT` | `email.smtp_port` |
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/datainsights/` (~/.config/datainsights/)
//! - State/Logs: `$XDG_STATE_HOME/datainsights/` (~/.local/state/datainsights/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where export files are read from
    #[serde(default)]
    pub source: SourceConfig,

    /// Metrics engine tuning
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Report delivery
    #[serde(default)]
    pub email: EmailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Export file discovery settings
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Directory scanned for export files
    pub directory: Option<PathBuf>,

    /// Glob pattern, relative to `directory`
    #[serde(default = "default_source_pattern")]
    pub pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            directory: None,
            pattern: default_source_pattern(),
        }
    }
}

fn default_source_pattern() -> String {
    "**/*.json".to_string()
}

/// Metrics engine settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Minimum records a group needs to be reported
    #[serde(default = "default_threshold")]
    pub threshold: usize,

    /// Length of the top and bottom slices
    #[serde(default = "default_top_bottom_count")]
    pub top_bottom_count: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            top_bottom_count: default_top_bottom_count(),
        }
    }
}

fn default_threshold() -> usize {
    100
}

fn default_top_bottom_count() -> usize {
    5
}

/// OpenAI-compatible chat completion settings
#[derive(Deserialize, Clone)]
pub struct LlmConfig {
    /// Model to use
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// API base URL; `/v1/chat/completions` is appended
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    /// API key (can also use env var)
    pub api_key: Option<String>,
    /// Completion token limit
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    /// Role the prompt is sent as
    #[serde(default = "default_llm_sender_role")]
    pub sender_role: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            endpoint: default_llm_endpoint(),
            api_key: None,
            max_tokens: default_llm_max_tokens(),
            sender_role: default_llm_sender_role(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("max_tokens", &self.max_tokens)
            .field("sender_role", &self.sender_role)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_llm_max_tokens() -> u32 {
    1500
}

fn default_llm_sender_role() -> String {
    "user".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

/// SMTP delivery settings
#[derive(Deserialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Sender address, also the SMTP username
    pub from_address: Option<String>,
    /// SMTP password; leave unset for a relay that takes no login
    pub password: Option<String>,
    pub to_address: Option<String>,
    /// Name used in the greeting line
    pub recipient_name: Option<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Use STARTTLS
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
    /// SMTP command timeout in seconds
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            from_address: None,
            password: None,
            to_address: None,
            recipient_name: None,
            subject: default_subject(),
            use_tls: default_use_tls(),
            timeout_secs: default_smtp_timeout(),
        }
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("from_address", &self.from_address)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("to_address", &self.to_address)
            .field("recipient_name", &self.recipient_name)
            .field("subject", &self.subject)
            .field("use_tls", &self.use_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "Website Metrics Insights".to_string()
}

fn default_use_tls() -> bool {
    true
}

fn default_smtp_timeout() -> u64 {
    60
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path and apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Config::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific path (no environment overrides)
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("FILE_DIR") {
            self.source.directory = Some(PathBuf::from(dir));
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(from) = get("EMAIL_FROM") {
            self.email.from_address = Some(from);
        }
        if let Some(password) = get("EMAIL_FROM_PASS") {
            self.email.password = Some(password);
        }
        if let Some(to) = get("EMAIL_TO") {
            self.email.to_address = Some(to);
        }
        if let Some(name) = get("RECIPIENT_NAME") {
            self.email.recipient_name = Some(name);
        }
        if let Some(host) = get("SMTP_HOST") {
            self.email.smtp_host = Some(host);
        }
        if let Some(port) = get("SMTP_PORT") {
            self.email.smtp_port = port.trim().parse().map_err(|_| {
                Error::Config(format!("SMTP_PORT must be a valid port number, got {:?}", port))
            })?;
        }
        Ok(())
    }

    /// Validate the settings needed to discover and read files
    pub fn validate_source(&self) -> Result<()> {
        if self.source.directory.is_none() {
            return Err(Error::Config(
                "source.directory (or FILE_DIR) is required".to_string(),
            ));
        }
        if self.source.pattern.trim().is_empty() {
            return Err(Error::Config("source.pattern must not be empty".to_string()));
        }
        Ok(())
    }

    /// Validate everything a full run (LLM + email) needs
    pub fn validate(&self) -> Result<()> {
        self.validate_source()?;

        let required = [
            ("llm.api_key (or OPENAI_API_KEY)", self.llm.api_key.is_some()),
            ("email.smtp_host (or SMTP_HOST)", self.email.smtp_host.is_some()),
            ("email.from_address (or EMAIL_FROM)", self.email.from_address.is_some()),
            ("email.to_address (or EMAIL_TO)", self.email.to_address.is_some()),
            ("email.recipient_name (or RECIPIENT_NAME)", self.email.recipient_name.is_some()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, present)| !present) {
            return Err(Error::Config(format!("{} is required", name)));
        }
        if self.llm.max_tokens == 0 {
            return Err(Error::Config("llm.max_tokens must be positive".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/datainsights/config.toml` (~/.config/datainsights/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("datainsights").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/datainsights/` (~/.local/state/datainsights/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("datainsights")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
