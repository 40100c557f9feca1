//! Configuration management for the flame CLI
//!
//! Settings come from a single YAML file, looked up in this order:
//! 1. the `--config` flag
//! 2. the `FLAME_CONFIG` environment variable
//! 3. `~/.config/flame/config.yaml` (platform config dir)
//!
//! A missing file is not an error; defaults are used instead. `FLAME_ADDRESS`
//! and the `--address` flag override the registry address from the file.
//!
//! ## Environment Variable Expansion
//!
//! The file is preprocessed before parsing:
//! - `${VAR}` - Simple substitution
//! - `${VAR:-default}` - Use default if VAR is unset or empty
//! - `${VAR-default}` - Use default if VAR is unset
//! - `${VAR:+alt}` - Use alt if VAR is set and non-empty
//! - `${VAR+alt}` - Use alt if VAR is set

use crate::constants::{CONFIG_ENV, CONFIG_FILE, CONFIG_SUBDIR, DEFAULT_ADDRESS};
use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs, path::PathBuf};

/// User configuration loaded from `config.yaml`
///
/// # Example
///
/// ```yaml
/// address: ${REGISTRY_ADDRESS:-http://localhost:8080}
/// auth:
///   type: bearer
///   tokenEnv: REGISTRY_TOKEN
/// pageSize: 50
/// getErrors: fail
/// unmatched: ignore
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FlameConfig {
    /// Base URL of the registry's HTTP API
    pub address: String,
    /// Credentials forwarded with every request
    pub auth: AuthConfig,
    /// Page size requested from list operations; server default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// What `list`/`get` do when fetching a single resource fails
    pub get_errors: GetErrorMode,
    /// What `list` does with input that is not a resource name
    pub unmatched: UnmatchedMode,
}

impl Default for FlameConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            auth: AuthConfig::None,
            page_size: None,
            timeout_seconds: 30,
            get_errors: GetErrorMode::default(),
            unmatched: UnmatchedMode::default(),
        }
    }
}

/// Authentication configuration for registry access
///
/// Credentials are always sourced from environment variables.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[serde(tag = "type")]
#[derive(Default)]
pub enum AuthConfig {
    /// No authentication (anonymous access)
    #[default]
    None,
    /// HTTP Basic authentication
    Basic {
        username: String,
        /// Environment variable containing the password
        #[serde(rename = "passwordEnv")]
        password_env: String,
    },
    /// Raw token sent as the Authorization header
    Token {
        #[serde(rename = "tokenEnv")]
        token_env: String,
    },
    /// Bearer token authentication
    Bearer {
        #[serde(rename = "tokenEnv")]
        token_env: String,
    },
}

/// Behavior when fetching a single resource fails
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GetErrorMode {
    /// Report the registry's error and fail the command
    #[default]
    Fail,
    /// Render an empty record, log the error as a warning and succeed
    Render,
}

/// Behavior for input that matches no resource name pattern
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedMode {
    /// Do nothing and succeed
    #[default]
    Ignore,
    /// Fail with an "unrecognized resource name" error
    Fail,
}

/// Where the config file lives when no explicit path is given.
pub fn default_config_path() -> PathBuf {
    env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push(CONFIG_SUBDIR);
            p.push(CONFIG_FILE);
            p
        })
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<FlameConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(FlameConfig::default());
    }
    let data = preprocess_config(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let blank = data.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(FlameConfig::default());
    }
    let cfg: FlameConfig = serde_yaml::from_str(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

pub fn save_config(cfg: &FlameConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_yaml::to_string(cfg)?;
    fs::write(path, data)?;
    Ok(())
}

impl FlameConfig {
    /// Apply `FLAME_ADDRESS` and then an explicit `--address`, later wins.
    pub fn with_overrides(mut self, address: Option<String>) -> Self {
        if let Ok(addr) = env::var(crate::constants::ADDRESS_ENV) {
            if !addr.is_empty() {
                self.address = addr;
            }
        }
        if let Some(addr) = address {
            self.address = addr;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.address.starts_with("http://") || self.address.starts_with("https://")) {
            anyhow::bail!(
                "registry address must start with http:// or https://, got '{}'",
                self.address
            );
        }
        if self.page_size == Some(0) {
            anyhow::bail!("pageSize must be greater than zero");
        }
        Ok(())
    }
}

pub fn expand_env_placeholders(input: &str) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?[-+])([^}]*))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let op = caps.get(2).map_or("", |m| m.as_str());
        let val = caps.get(3).map_or("", |m| m.as_str());
        let var = env::var(var_name).ok();

        match (var.as_deref(), op) {
            (Some(v), "") => v.to_string(),                       // ${VAR}
            (Some(v), ":-") if !v.is_empty() => v.to_string(),    // ${VAR:-default}
            (_, ":-") => val.to_string(),
            (Some(v), "-") => v.to_string(),                      // ${VAR-default}
            (None, "-") => val.to_string(),
            (Some(v), ":+") if !v.is_empty() => val.to_string(),  // ${VAR:+alt}
            (Some(_), "+") => val.to_string(),                    // ${VAR+alt}
            _ => "".to_string(),
        }
    })
    .to_string()
}

pub fn preprocess_config(path: &Path) -> anyhow::Result<String> {
    let raw_data = fs::read_to_string(path)?;
    Ok(expand_env_placeholders(&raw_data))
}
