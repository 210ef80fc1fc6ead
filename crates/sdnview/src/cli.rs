//! Clap derive structures for the `sdnview` CLI.
//!
//! Defines the command tree, global flags and shared value types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sdnview_core::command::{DEFAULT_COOKIE, DEFAULT_PRIORITY, DEFAULT_TABLE_ID};
use sdnview_core::{DpidParseError, SwitchId, parse_dpid};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sdnview -- inspect and program a Ryu SDN controller
#[derive(Debug, Parser)]
#[command(
    name = "sdnview",
    version,
    about = "Inspect topology and manage flow rules on a Ryu SDN controller",
    long_about = "A client for the Ryu controller's northbound REST API.\n\n\
        Reads switches, links and hosts from rest_topology and adds or\n\
        removes flow entries through ofctl_rest.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "SDNVIEW_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile and RYU_URL)
    #[arg(long, short = 'c', env = "SDNVIEW_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SDNVIEW_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SDNVIEW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List switches
    #[command(alias = "sw")]
    Switches(ListArgs),

    /// List inter-switch links
    Links(ListArgs),

    /// List learned hosts
    Hosts(ListArgs),

    /// Lay out the topology, once or continuously
    #[command(alias = "topo")]
    Topology(TopologyArgs),

    /// Add or remove flow entries
    Flow(FlowArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Topology ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print the controller's JSON response verbatim
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Args)]
pub struct TopologyArgs {
    /// Canvas width used for layout
    #[arg(long, default_value_t = 900.0)]
    pub width: f64,

    /// Canvas height used for layout
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Keep refreshing and print one status line per frame (Ctrl-C to stop)
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Refresh period for --watch (e.g. "3s", "500ms")
    #[arg(long, value_parser = humantime::parse_duration, requires = "watch")]
    pub interval: Option<Duration>,
}

// ── Flow rules ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FlowArgs {
    #[command(subcommand)]
    pub command: FlowCommand,
}

#[derive(Debug, Subcommand)]
pub enum FlowCommand {
    /// Forward packets from one port to another
    Add {
        /// Switch DPID: decimal, or hex with a 0x prefix or a-f digits
        #[arg(long, value_parser = dpid_arg)]
        dpid: SwitchId,

        /// Ingress port to match
        #[arg(long)]
        in_port: u32,

        /// Egress port for the OUTPUT action
        #[arg(long)]
        out_port: u32,

        #[arg(long, default_value_t = DEFAULT_COOKIE)]
        cookie: u64,

        #[arg(long, default_value_t = DEFAULT_PRIORITY)]
        priority: u32,
    },

    /// Delete flows matching an ingress port
    Delete {
        /// Switch DPID: decimal, or hex with a 0x prefix or a-f digits
        #[arg(long, value_parser = dpid_arg)]
        dpid: SwitchId,

        /// Ingress port to match
        #[arg(long)]
        in_port: u32,

        #[arg(long, default_value_t = DEFAULT_TABLE_ID)]
        table_id: u32,
    },

    /// Delete every flow on a switch
    Clear {
        /// Switch DPID: decimal, or hex with a 0x prefix or a-f digits
        #[arg(long, value_parser = dpid_arg)]
        dpid: SwitchId,
    },
}

fn dpid_arg(raw: &str) -> Result<SwitchId, DpidParseError> {
    parse_dpid(raw)
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile in the config file
    Init {
        /// Controller URL for the profile (prompted when omitted)
        #[arg(long = "url")]
        url: Option<String>,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// Display the loaded configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
