//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod flow;
pub mod topology;
pub mod util;

use clap::CommandFactory;

use sdnview_core::{Canvas, Controller, TopologyEndpoint};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Run one parsed command.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        // Config and completions never talk to a controller
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "sdnview", &mut std::io::stdout());
            Ok(())
        }

        Command::Switches(args) => {
            let controller = connect(global, None)?;
            topology::list(&controller, TopologyEndpoint::Switches, &args, global).await
        }
        Command::Links(args) => {
            let controller = connect(global, None)?;
            topology::list(&controller, TopologyEndpoint::Links, &args, global).await
        }
        Command::Hosts(args) => {
            let controller = connect(global, None)?;
            topology::list(&controller, TopologyEndpoint::Hosts, &args, global).await
        }
        Command::Topology(args) => {
            let canvas = Canvas::new(args.width, args.height);
            let controller = connect_with(global, Some(canvas), args.interval)?;
            topology::show(&controller, &args, global).await
        }
        Command::Flow(args) => flow::handle(&connect(global, None)?, args, global).await,
    }
}

fn connect(global: &GlobalOpts, canvas: Option<Canvas>) -> Result<Controller, CliError> {
    connect_with(global, canvas, None)
}

fn connect_with(
    global: &GlobalOpts,
    canvas: Option<Canvas>,
    refresh_interval: Option<std::time::Duration>,
) -> Result<Controller, CliError> {
    let controller_config = config::build_controller_config(global, canvas, refresh_interval)?;
    tracing::debug!(url = %controller_config.url, "using controller");
    Ok(Controller::new(controller_config)?)
}
