// Domain model: switches, links, hosts and the snapshot that joins them.

mod dpid;
mod mac;
mod topology;

pub use dpid::{DpidParseError, Radix, SwitchId, format_short, parse_dpid, render_short};
pub use mac::MacAddress;
pub use topology::{Host, Link, TopologySnapshot};
