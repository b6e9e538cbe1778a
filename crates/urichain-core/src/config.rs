//! Configuration system for urichain.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $URICHAIN_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/urichain/config.toml
//!   3. ~/.config/urichain/config.toml

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ret_code::RetCode;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UriChainConfig {
    pub session: SessionConfig,
    pub host: HostConfig,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Id the simulator gives its single session.
    pub id: i64,
}

/// What the host side has wired up. Resolved once when a session is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub sync_handler: bool,
    pub async_handler: bool,
    pub registration_listener: bool,
    /// Host announces its delegate as soon as the session exists.
    pub register_on_start: bool,
    /// Simulated latency before an async answer is delivered.
    pub async_delay_ms: u64,
    /// Scripted host answers, keyed by uri.
    pub resources: BTreeMap<String, ScriptedResource>,
}

/// One scripted host answer. `text = None` means the resource carries no
/// content payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedResource {
    pub ret_code: RetCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Attach an in-memory loader behind the host delegate.
    pub enabled: bool,
    /// uri → content.
    pub resources: BTreeMap<String, String>,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for SessionConfig {
    fn default() -> Self {
        Self { id: 1 }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            sync_handler: true,
            async_handler: true,
            registration_listener: true,
            register_on_start: false,
            async_delay_ms: 0,
            resources: BTreeMap::new(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resources: BTreeMap::new(),
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("urichain")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl UriChainConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            UriChainConfig::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("URICHAIN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Apply URICHAIN_* overrides read through `var`.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let flag = |v: String| v == "true" || v == "1";
        if let Some(v) = var("URICHAIN_HOST__SYNC_HANDLER") {
            self.host.sync_handler = flag(v);
        }
        if let Some(v) = var("URICHAIN_HOST__ASYNC_HANDLER") {
            self.host.async_handler = flag(v);
        }
        if let Some(v) = var("URICHAIN_HOST__REGISTER_ON_START") {
            self.host.register_on_start = flag(v);
        }
        if let Some(v) = var("URICHAIN_LOADER__ENABLED") {
            self.loader.enabled = flag(v);
        }
        if let Some(v) = var("URICHAIN_SESSION__ID") {
            if let Ok(id) = v.parse() {
                self.session.id = id;
            }
        }
    }
}
