//! `sdnview-tui`: live terminal view of a Ryu controller's topology.
//!
//! Logs go to a file (default `/tmp/sdnview-tui.log`) so they never
//! corrupt the screen.

mod action;
mod app;
mod event;
mod theme;
mod tui;
mod view;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sdnview_config::Overrides;
use sdnview_core::Controller;

use crate::app::App;

#[derive(Parser, Debug)]
#[command(name = "sdnview-tui", version, about)]
struct Cli {
    /// Controller URL (overrides profile and RYU_URL)
    #[arg(short = 'c', long, env = "SDNVIEW_CONTROLLER")]
    controller: Option<String>,

    /// Controller profile from the config file
    #[arg(short = 'p', long, env = "SDNVIEW_PROFILE")]
    profile: Option<String>,

    /// Auto refresh period (e.g. "3s")
    #[arg(short = 'i', long, value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Start with auto refresh off
    #[arg(long)]
    manual: bool,

    #[arg(long, default_value = "/tmp/sdnview-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("sdnview_tui={level},sdnview_core={level}"))
    });

    let dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("sdnview-tui.log"));
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    guard
}

fn build_controller(cli: &Cli) -> Result<Controller> {
    let config = sdnview_config::load_config()?;
    let overrides = Overrides {
        profile: cli.profile.clone(),
        controller_url: cli.controller.clone(),
        refresh_interval: cli.interval,
        ..Overrides::default()
    };
    let controller_config = sdnview_config::resolve(&config, &overrides)?;
    Ok(Controller::new(controller_config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let controller = build_controller(&cli)?;
    info!(url = %controller.base_url(), "starting sdnview-tui");

    App::new(&controller, !cli.manual).run().await
}
