//! Shared configuration for the sdnview CLI and TUI.
//!
//! TOML profiles, environment overrides and translation to
//! `sdnview_core::ControllerConfig`. Both binaries depend on this crate;
//! the CLI layers its `GlobalOpts` on top through [`Overrides`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use sdnview_core::config::DEFAULT_CONTROLLER_URL;
use sdnview_core::{Canvas, ControllerConfig};

/// Points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SDNVIEW_CONFIG";
/// Controller URL override honoured by every sdnview tool.
pub const RYU_URL_ENV: &str = "RYU_URL";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' is not defined")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Auto-refresh period in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_refresh_interval() -> u64 {
    3
}

/// A named controller profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "http://10.0.0.254:8080").
    #[serde(alias = "controller")]
    pub controller_url: String,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override refresh period (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u64>,
}

impl Profile {
    pub fn new(controller_url: impl Into<String>) -> Self {
        Self {
            controller_url: controller_url.into(),
            timeout: None,
            refresh_interval: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$SDNVIEW_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "sdnview", "sdnview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sdnview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (a missing file is fine) layered under `SDNVIEW_*`.
///
/// Nested keys use a double underscore: `SDNVIEW_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SDNVIEW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// Values supplied on the command line. `None` falls through to env/config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub controller_url: Option<String>,
    pub timeout: Option<u64>,
    pub refresh_interval: Option<Duration>,
    pub canvas: Option<Canvas>,
}

impl Config {
    /// The profile to use: the requested one (which must exist), else the
    /// configured default if it is defined.
    pub fn active_profile(
        &self,
        requested: Option<&str>,
    ) -> Result<Option<(&str, &Profile)>, ConfigError> {
        if let Some(name) = requested {
            return self
                .profiles
                .get_key_value(name)
                .map(|(k, p)| Some((k.as_str(), p)))
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() });
        }
        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.profiles.get_key_value(name))
            .map(|(k, p)| (k.as_str(), p)))
    }
}

/// Build a `ControllerConfig`.
///
/// URL precedence: `overrides.controller_url`, `$RYU_URL`, the active
/// profile, then `http://127.0.0.1:8080`.
pub fn resolve(config: &Config, overrides: &Overrides) -> Result<ControllerConfig, ConfigError> {
    let profile = config
        .active_profile(overrides.profile.as_deref())?
        .map(|(_, p)| p);

    let raw_url = overrides
        .controller_url
        .clone()
        .or_else(env_controller_url)
        .or_else(|| profile.map(|p| p.controller_url.clone()))
        .unwrap_or_else(|| DEFAULT_CONTROLLER_URL.into());
    let url = parse_controller_url(&raw_url)?;

    let timeout = overrides
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(config.defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let refresh_interval = overrides.refresh_interval.unwrap_or_else(|| {
        Duration::from_secs(
            profile
                .and_then(|p| p.refresh_interval)
                .unwrap_or(config.defaults.refresh_interval),
        )
    });

    Ok(ControllerConfig {
        url,
        timeout: Duration::from_secs(timeout),
        refresh_interval,
        canvas: overrides.canvas.unwrap_or_default(),
    })
}

/// `RYU_URL`, ignored when blank.
fn env_controller_url() -> Option<String> {
    std::env::var(RYU_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Parse and check an `http`/`https` controller URL.
pub fn parse_controller_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.trim().parse().map_err(|e| ConfigError::Validation {
        field: "controller_url".into(),
        reason: format!("'{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "controller_url".into(),
            reason: format!("'{raw}': expected an http or https URL"),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_scheme() {
        assert!(parse_controller_url("ftp://10.0.0.1").is_err());
        assert!(parse_controller_url("not a url").is_err());
        assert!(parse_controller_url(" http://10.0.0.1:8080 ").is_ok());
    }

    #[test]
    fn unknown_requested_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.active_profile(Some("lab")),
            Err(ConfigError::UnknownProfile { .. })
        ));
        assert!(matches!(cfg.active_profile(None), Ok(None)));
    }
}
