//! Topology command handlers: `switches`, `links`, `hosts`, `topology`.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use sdnview_core::{
    ChannelSink, Controller, Entity, Host, Link, RenderFrame, SwitchId, TopologyEndpoint,
    TopologySnapshot,
};

use crate::cli::{GlobalOpts, ListArgs, OutputFormat, TopologyArgs};
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SwitchView {
    dpid: String,
    value: u64,
    short: String,
}

impl From<SwitchId> for SwitchView {
    fn from(id: SwitchId) -> Self {
        Self {
            dpid: id.to_string(),
            value: id.value(),
            short: id.short(),
        }
    }
}

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "DPID")]
    dpid: String,
    #[tabled(rename = "Decimal")]
    value: u64,
    #[tabled(rename = "Label")]
    short: String,
}

impl From<&SwitchView> for SwitchRow {
    fn from(s: &SwitchView) -> Self {
        Self {
            dpid: s.dpid.clone(),
            value: s.value,
            short: s.short.clone(),
        }
    }
}

#[derive(Serialize)]
struct LinkView {
    src: String,
    src_port: Option<u32>,
    dst: String,
    dst_port: Option<u32>,
}

impl From<&Link> for LinkView {
    fn from(l: &Link) -> Self {
        Self {
            src: l.src.to_string(),
            src_port: l.src_port,
            dst: l.dst.to_string(),
            dst_port: l.dst_port,
        }
    }
}

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Source")]
    src: String,
    #[tabled(rename = "Src Port")]
    src_port: String,
    #[tabled(rename = "Destination")]
    dst: String,
    #[tabled(rename = "Dst Port")]
    dst_port: String,
}

impl From<&LinkView> for LinkRow {
    fn from(l: &LinkView) -> Self {
        Self {
            src: l.src.clone(),
            src_port: port_cell(l.src_port),
            dst: l.dst.clone(),
            dst_port: port_cell(l.dst_port),
        }
    }
}

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IPv4")]
    ipv4: String,
    #[tabled(rename = "Switch")]
    switch: String,
    #[tabled(rename = "Port")]
    port: String,
}

impl From<&Host> for HostRow {
    fn from(h: &Host) -> Self {
        Self {
            name: h.display_name.clone(),
            mac: h.mac.to_string(),
            ipv4: h.ipv4.clone(),
            switch: h.attached_switch.to_string(),
            port: port_cell(h.port_no),
        }
    }
}

fn port_cell(port: Option<u32>) -> String {
    port.map(|p| p.to_string()).unwrap_or_default()
}

// ── Listing ─────────────────────────────────────────────────────────

pub async fn list(
    controller: &Controller,
    endpoint: TopologyEndpoint,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.raw {
        let body = controller.fetch_raw(endpoint).await?;
        output::print_output(&body, global.quiet);
        return Ok(());
    }

    let out = match endpoint {
        TopologyEndpoint::Switches => {
            let switches = controller.fetch_switches().await?;
            let snapshot = TopologySnapshot::build(switches, Vec::new(), Vec::new());
            let views: Vec<SwitchView> = snapshot
                .switches()
                .iter()
                .copied()
                .map(SwitchView::from)
                .collect();
            let id = |s: &SwitchView| s.dpid.clone();
            output::render_list(global.output, &views, |s| SwitchRow::from(s), id)?
        }
        TopologyEndpoint::Links => {
            let links = controller.fetch_links().await?;
            let views: Vec<LinkView> = links.iter().map(LinkView::from).collect();
            let id = |l: &LinkView| format!("{} {}", l.src, l.dst);
            output::render_list(global.output, &views, |l| LinkRow::from(l), id)?
        }
        TopologyEndpoint::Hosts => {
            let hosts = controller.fetch_hosts().await?;
            let id = |h: &Host| h.mac.to_string();
            output::render_list(global.output, &hosts, |h| HostRow::from(h), id)?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Layout ──────────────────────────────────────────────────────────

pub async fn show(
    controller: &Controller,
    args: &TopologyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.watch {
        return watch(controller, global).await;
    }

    let scheduler = controller.scheduler(Arc::new(|_frame: Arc<RenderFrame>| {}));
    let report = scheduler.refresh_now().await;
    debug!(seq = report.seq, "topology pass finished");
    let Some(frame) = scheduler.current() else {
        return Ok(());
    };

    // Nothing came back: fetch once more so the typed error sets the exit code.
    if [Entity::Switches, Entity::Links, Entity::Hosts]
        .into_iter()
        .all(|e| frame.failed(e))
    {
        controller.fetch_switches().await?;
    }

    let color = output::should_color(global.color);
    report_failures(&frame, color);

    let url = controller.base_url().to_string();
    let out = output::render_single(
        global.output,
        frame.as_ref(),
        |f| detail(f, &url),
        |f| f.status_line(&url),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(frame: &RenderFrame, url: &str) -> String {
    let mut out = frame.status_line(url);
    out.push_str("\n\n");
    let _ = writeln!(
        out,
        "canvas {}x{}  radius {:.1}",
        frame.layout.canvas.width, frame.layout.canvas.height, frame.layout.radius
    );
    for (id, pos) in &frame.layout.switches {
        let _ = writeln!(
            out,
            "  {}  {id}  ({:7.1}, {:7.1})",
            id.short(),
            pos.x,
            pos.y
        );
    }
    for edge in &frame.layout.edges {
        let _ = writeln!(out, "  {} -> {}", edge.src.short(), edge.dst.short());
    }
    for (name, host) in &frame.layout.hosts {
        let _ = writeln!(
            out,
            "  {name:<5} on {}  ({:7.1}, {:7.1})",
            host.switch.short(),
            host.position.x,
            host.position.y
        );
    }
    out.trim_end().to_owned()
}

fn report_failures(frame: &RenderFrame, color: bool) {
    for failure in &frame.failures {
        let line = format!(
            "warning: {} unavailable: {}",
            failure.entity, failure.message
        );
        eprintln!("{}", output::paint_status(&line, false, color));
    }
}

// ── Watch ───────────────────────────────────────────────────────────

async fn watch(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let (sink, mut frames) = ChannelSink::new();
    let scheduler = controller.scheduler(Arc::new(sink));
    let url = controller.base_url().to_string();
    let color = output::should_color(global.color);

    scheduler.enable_auto().await;
    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                if !frame.is_complete() {
                    continue;
                }
                print_watch_line(&frame, &url, global.output, color)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    scheduler.shutdown().await;
    Ok(())
}

fn print_watch_line(
    frame: &RenderFrame,
    url: &str,
    format: OutputFormat,
    color: bool,
) -> Result<(), CliError> {
    let line = match format {
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(frame)?,
        _ => {
            let stamp = frame.completed_at.format("%H:%M:%S").to_string();
            let stamp = output::paint_dim(&stamp, color);
            let ok = frame.failures.is_empty();
            let status = output::paint_status(&frame.status_line(url), ok, color);
            format!("{stamp}  {status}")
        }
    };
    println!("{line}");
    Ok(())
}
