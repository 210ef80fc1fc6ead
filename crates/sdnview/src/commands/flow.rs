//! Flow subcommand handlers.

use serde::Serialize;

use sdnview_core::{Controller, FlowCommand as CoreFlow, FlowOutcome};

use crate::cli::{FlowArgs, FlowCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct OutcomeView<'a> {
    action: &'a str,
    dpid: String,
    status: u16,
    body: &'a str,
}

fn to_core(cmd: FlowCommand) -> CoreFlow {
    match cmd {
        FlowCommand::Add {
            dpid,
            in_port,
            out_port,
            cookie,
            priority,
        } => CoreFlow::Add {
            dpid,
            in_port,
            out_port,
            cookie,
            priority,
        },
        FlowCommand::Delete {
            dpid,
            in_port,
            table_id,
        } => CoreFlow::DeleteByMatch {
            dpid,
            in_port,
            table_id,
        },
        FlowCommand::Clear { dpid } => CoreFlow::Clear { dpid },
    }
}

pub async fn handle(
    controller: &Controller,
    args: FlowArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cmd = to_core(args.command);

    if let CoreFlow::Clear { dpid } = cmd {
        let prompt = format!("Remove every flow on switch {dpid}?");
        if !util::confirm("flow clear", &prompt, global.yes)? {
            return Ok(());
        }
    }

    let action = cmd.name();
    let dpid = cmd.dpid();
    let outcome = controller.execute(cmd).await?;
    let ok = outcome.is_success();
    let FlowOutcome { status, body } = outcome;

    if !ok {
        return Err(CliError::FlowRejected {
            action: action.into(),
            status,
            body,
        });
    }

    let view = OutcomeView {
        action,
        dpid: dpid.to_string(),
        status,
        body: &body,
    };
    let color = output::should_color(global.color);
    let out = match global.output {
        OutputFormat::Table => {
            let line = format!("✓ {action} on {dpid}: HTTP {status}");
            output::paint_status(&line, true, color)
        }
        format => {
            let id = |v: &OutcomeView<'_>| v.status.to_string();
            output::render_single(format, &view, |_| String::new(), id)?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
