//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sdnview_config::ConfigError;
use sdnview_core::{CoreError, DpidParseError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const FLOW_REJECTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(sdnview::connection_failed),
        help(
            "Check that ryu-manager is running with ofctl_rest and rest_topology.\n\
             URL: {url}\n\
             Override with --controller or RYU_URL."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(sdnview::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Controller responses ─────────────────────────────────────────
    #[error("Controller returned HTTP {status}: {message}")]
    #[diagnostic(
        code(sdnview::api_error),
        help("Is the rest_topology application loaded? Run: ryu-manager --observe-links ...")
    )]
    ApiError { status: u16, message: String },

    #[error("Unexpected response from controller: {message}")]
    #[diagnostic(
        code(sdnview::invalid_response),
        help("Re-run with --raw to see what the controller sent.")
    )]
    InvalidResponse { message: String },

    #[error("Controller rejected flow {action} (HTTP {status})")]
    #[diagnostic(code(sdnview::flow_rejected), help("Controller said: {body}"))]
    FlowRejected {
        action: String,
        status: u16,
        body: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid DPID")]
    #[diagnostic(
        code(sdnview::invalid_dpid),
        help("Use decimal (26), hex with a prefix (0x1a) or hex with letters (1a).")
    )]
    InvalidDpid(#[from] DpidParseError),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sdnview::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sdnview::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sdnview config init --name {name} --url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(sdnview::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sdnview::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::FlowRejected { .. } => exit_code::FLOW_REJECTED,
            Self::InvalidDpid(_)
            | Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Decode { message } => CliError::InvalidResponse { message },
            CoreError::InvalidDpid(e) => CliError::InvalidDpid(e),
            CoreError::Api { status, message } => CliError::ApiError { status, message },
            CoreError::Config { message } => CliError::Validation {
                field: "controller".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "run `sdnview config profiles`".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let timeout = CliError::from(CoreError::Timeout { timeout_secs: 3 });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let missing = CliError::from(CoreError::Api {
            status: 404,
            message: "not found".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let rejected = CliError::FlowRejected {
            action: "add".into(),
            status: 400,
            body: "Invalid syntax".into(),
        };
        assert_eq!(rejected.exit_code(), exit_code::FLOW_REJECTED);
        let usage = CliError::from(DpidParseError::Empty);
        assert_eq!(usage.exit_code(), exit_code::USAGE);
    }
}
