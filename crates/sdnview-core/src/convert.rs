// ── API-to-domain type conversions ──
//
// Bridges raw `sdnview_api` records into `sdnview_core::model` types.
// Dpids are decoded strictly: a record whose dpid is not hex fails the
// whole response with `CoreError::Decode`. Port numbers are best-effort.

use sdnview_api::{HostRecord, LinkRecord, PortRef, SwitchRecord};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Host, Link, MacAddress, SwitchId};

// ── Helpers ────────────────────────────────────────────────────────

fn decode_dpid(raw: &str, field: &str) -> Result<SwitchId, CoreError> {
    SwitchId::from_controller(raw).map_err(|e| CoreError::Decode {
        message: format!("{field}: {e}"),
    })
}

/// Ryu encodes port numbers as 8 hex digits. Unparseable values are dropped.
fn port_no(port: &PortRef) -> Option<u32> {
    port.port_no
        .as_deref()
        .and_then(|raw| u32::from_str_radix(raw.trim(), 16).ok())
}

// ── Switches ───────────────────────────────────────────────────────

pub(crate) fn switches(records: Vec<SwitchRecord>) -> Result<Vec<SwitchId>, CoreError> {
    records
        .into_iter()
        .map(|r| decode_dpid(&r.dpid, "switch dpid"))
        .collect()
}

// ── Links ──────────────────────────────────────────────────────────

impl TryFrom<LinkRecord> for Link {
    type Error = CoreError;

    fn try_from(record: LinkRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            src: decode_dpid(&record.src.dpid, "link src.dpid")?,
            dst: decode_dpid(&record.dst.dpid, "link dst.dpid")?,
            src_port: port_no(&record.src),
            dst_port: port_no(&record.dst),
        })
    }
}

/// Decode links, discarding self-loops.
pub(crate) fn links(records: Vec<LinkRecord>) -> Result<Vec<Link>, CoreError> {
    let mut links = Vec::with_capacity(records.len());
    for record in records {
        let link = Link::try_from(record)?;
        if link.is_self_loop() {
            debug!(dpid = %link.src, "ignoring self-loop link");
            continue;
        }
        links.push(link);
    }
    Ok(links)
}

// ── Hosts ──────────────────────────────────────────────────────────

/// Decode hosts, naming them `h1`, `h2`, … in response order.
pub(crate) fn hosts(records: Vec<HostRecord>) -> Result<Vec<Host>, CoreError> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            Ok(Host {
                display_name: format!("h{}", idx + 1),
                mac: MacAddress::new(&record.mac),
                ipv4: record.ipv4.into_iter().next().unwrap_or_default(),
                attached_switch: decode_dpid(&record.port.dpid, "host port.dpid")?,
                port_no: port_no(&record.port),
            })
        })
        .collect()
}
