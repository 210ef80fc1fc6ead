//! CLI configuration: a thin wrapper around `sdnview_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--profile`, `--controller`, `--timeout`).

use std::time::Duration;

use sdnview_core::{Canvas, ControllerConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sdnview_config::{
    Config, Overrides, Profile, config_path, load_config, load_config_or_default,
    parse_controller_url, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ControllerConfig` from the config file, profile and flags.
pub fn build_controller_config(
    global: &GlobalOpts,
    canvas: Option<Canvas>,
    refresh_interval: Option<Duration>,
) -> Result<ControllerConfig, CliError> {
    let cfg = load_config()?;

    if let Some(ref name) = global.profile {
        if !cfg.profiles.contains_key(name) {
            let available = if cfg.profiles.is_empty() {
                "(none)".to_owned()
            } else {
                cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
            };
            return Err(CliError::ProfileNotFound {
                name: name.clone(),
                available,
            });
        }
    }

    let overrides = Overrides {
        profile: global.profile.clone(),
        controller_url: global.controller.clone(),
        timeout: global.timeout,
        refresh_interval,
        canvas,
    };
    Ok(sdnview_config::resolve(&cfg, &overrides)?)
}
