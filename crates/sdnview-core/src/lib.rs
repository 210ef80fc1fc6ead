// sdnview-core: topology pipeline and flow-rule control shared by the CLI and TUI.

pub mod command;
pub mod config;
pub mod controller;
mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod scheduler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{FlowCommand, FlowOutcome};
pub use config::ControllerConfig;
pub use controller::Controller;
pub use error::CoreError;
pub use layout::{Canvas, Layout, Position, layout, layout_with_rng};
pub use render::{ChannelSink, Entity, FetchFailure, Phase, RenderFrame, RenderSink};
pub use scheduler::{PassReport, RefreshMode, RefreshScheduler, SchedulerState, TopologySource};

pub use model::{
    DpidParseError, Host, Link, MacAddress, SwitchId, TopologySnapshot, format_short, parse_dpid,
    render_short,
};

// Wire-level endpoint selector, needed by callers of `Controller::fetch_raw`.
pub use sdnview_api::TopologyEndpoint;
