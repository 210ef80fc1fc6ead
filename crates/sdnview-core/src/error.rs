// ── Core error types ──
//
// User-facing errors from sdnview-core. Consumers see domain variants,
// not reqwest internals. The `From<sdnview_api::Error>` impl translates
// transport-layer failures into the taxonomy the scheduler and the CLI
// reason about: transport, decode, format, API status and config.

use thiserror::Error;

use crate::model::DpidParseError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed controller response: {message}")]
    Decode { message: String },

    /// Operator input that is not a DPID. Raised before any request is sent.
    #[error("Invalid DPID: {0}")]
    InvalidDpid(#[from] DpidParseError),

    // ── API errors ───────────────────────────────────────────────────
    #[error("Controller returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Connection refused, DNS failure or timeout.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }

    /// HTTP status carried by the error, if the controller answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sdnview_api::Error> for CoreError {
    fn from(err: sdnview_api::Error) -> Self {
        match err {
            // The client reports timeouts as `Error::Timeout`.
            sdnview_api::Error::Transport(e) => CoreError::ConnectionFailed {
                url: e.url().map_or("<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            sdnview_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            sdnview_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sdnview_api::Error::ClientBuild(message) => CoreError::Config {
                message: format!("HTTP client setup failed: {message}"),
            },
            sdnview_api::Error::Api { status, body } => CoreError::Api {
                status,
                message: body,
            },
            sdnview_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_is_preserved() {
        let err = CoreError::from(sdnview_api::Error::Api {
            status: 503,
            body: "unavailable".into(),
        });
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_transport());
    }

    #[test]
    fn deserialization_becomes_decode() {
        let err = CoreError::from(sdnview_api::Error::Deserialization {
            message: "missing field `dpid`".into(),
            body: "[{}]".into(),
        });
        let CoreError::Decode { message } = &err else {
            panic!("expected decode error, got {err:?}");
        };
        assert!(message.contains("dpid"));
    }

    #[test]
    fn timeout_is_transport() {
        let err = CoreError::from(sdnview_api::Error::Timeout { timeout_secs: 10 });
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Controller request timed out after 10s");
    }
}
