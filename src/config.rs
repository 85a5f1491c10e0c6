//! Configuration management for quill.
//!
//! Configuration is loaded once at startup from `~/.config/quill/config.toml`
//! (or `$QUILL_CONFIG`), then overridden by environment variables.

use crate::error::Error;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint and credential.
    #[serde(default)]
    pub api: ApiSettings,
    /// Model selection per mode.
    #[serde(default)]
    pub models: ModelSettings,
    /// Clipboard collaborator used in proofread mode.
    #[serde(default)]
    pub clipboard: ClipboardSettings,
}

/// Completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Messages endpoint URL.
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Value of the `anthropic-version` header.
    #[serde(default = "default_api_version")]
    pub version: String,
    /// Request deadline in seconds, must be non-zero.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// API key (prefer the API_KEY env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key, if one is configured and not blank.
    pub fn require_api_key(&self) -> Result<&str, Error> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(Error::MissingApiKey)
    }
}

/// Models used by each mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model for proofreading (default: claude-3-haiku-20240307).
    #[serde(default = "default_proofread_model")]
    pub proofread: String,
    /// Model for programming questions (default: claude-3-5-sonnet-latest).
    #[serde(default = "default_question_model")]
    pub question: String,
    /// Output token limit for every request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            proofread: default_proofread_model(),
            question: default_question_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Clipboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardSettings {
    /// Copy proofread results to the clipboard.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Program and arguments that read the text on stdin.
    /// Falls back to a platform default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_proofread_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_question_model() -> String {
    "claude-3-5-sonnet-latest".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("quill"))
            .context("Could not determine config directory")
    }

    /// Get the config file path, honouring `$QUILL_CONFIG`.
    pub fn config_path() -> Result<PathBuf> {
        match std::env::var_os("QUILL_CONFIG") {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(Self::config_dir()?.join("config.toml")),
        }
    }

    /// Load configuration from file and environment, using defaults for anything unset.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from `path`, using defaults if the file does not exist.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        tracing::debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to read variables.
    ///
    /// `API_KEY` takes priority over `ANTHROPIC_API_KEY`; both override the file.
    /// `QUILL_CLIPBOARD_COMMAND` is split on whitespace, so a program path
    /// containing spaces must be set through the `[clipboard] command` array
    /// instead. An empty value disables copying.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("API_KEY").or_else(|| lookup("ANTHROPIC_API_KEY")) {
            self.api.api_key = Some(key);
        }
        if let Some(url) = lookup("QUILL_API_URL").filter(|u| !u.is_empty()) {
            self.api.url = url;
        }
        if let Some(command) = lookup("QUILL_CLIPBOARD_COMMAND") {
            let parts: Vec<String> = command.split_whitespace().map(String::from).collect();
            if parts.is_empty() {
                self.clipboard.enabled = false;
            } else {
                self.clipboard.enabled = true;
                self.clipboard.command = Some(parts);
            }
        }
    }
}
