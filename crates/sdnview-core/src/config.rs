// ── Runtime controller configuration ──
//
// Describes *which* controller to talk to and how often to poll it. Never
// touches disk: the CLI/TUI builds a `ControllerConfig` from files, env
// and flags (see `sdnview-config`) and hands it in.

use std::time::Duration;

use url::Url;

use crate::layout::Canvas;
use crate::scheduler::DEFAULT_REFRESH_INTERVAL;

/// Ryu's default `wsgi` listener.
pub const DEFAULT_CONTROLLER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Controller base URL (e.g., `http://127.0.0.1:8080`).
    pub url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Auto-refresh period.
    pub refresh_interval: Duration,
    /// Layout area for rendered frames.
    pub canvas: Canvas,
}

impl ControllerConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CONTROLLER_URL
                .parse()
                .expect("default controller URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            canvas: Canvas::default(),
        }
    }
}
