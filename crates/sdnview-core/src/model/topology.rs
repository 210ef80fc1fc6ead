// ── Topology snapshot ──
//
// One consistent view of the controller's graph, assembled from a single
// refresh pass. Snapshots are never mutated after `build`; the scheduler
// shares them as `Arc<TopologySnapshot>`.

use serde::Serialize;
use tracing::debug;

use super::dpid::SwitchId;
use super::mac::MacAddress;

/// Directed inter-switch link, as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    pub src: SwitchId,
    pub dst: SwitchId,
    pub src_port: Option<u32>,
    pub dst_port: Option<u32>,
}

impl Link {
    pub const fn new(src: SwitchId, dst: SwitchId) -> Self {
        Self {
            src,
            dst,
            src_port: None,
            dst_port: None,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}

/// End host learned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    /// `h1`, `h2`, … in response order. Not stable across refreshes.
    pub display_name: String,
    pub mac: MacAddress,
    /// First IPv4 address, or empty when the controller has none.
    pub ipv4: String,
    pub attached_switch: SwitchId,
    pub port_no: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopologySnapshot {
    switches: Vec<SwitchId>,
    links: Vec<Link>,
    hosts: Vec<Host>,
}

impl TopologySnapshot {
    /// Assemble a snapshot.
    ///
    /// Switches are ordered by display string and deduplicated; links and
    /// hosts keep the order they were received in. References to unknown
    /// switches are kept: layout skips them.
    pub fn build(mut switches: Vec<SwitchId>, links: Vec<Link>, hosts: Vec<Host>) -> Self {
        switches.sort_by_cached_key(ToString::to_string);
        switches.dedup();

        let before = links.len();
        let links: Vec<Link> = links.into_iter().filter(|l| !l.is_self_loop()).collect();
        if links.len() != before {
            debug!(dropped = before - links.len(), "dropped self-loop links");
        }

        Self {
            switches,
            links,
            hosts,
        }
    }

    /// Same switches and links with a new host set.
    pub fn with_hosts(&self, hosts: Vec<Host>) -> Self {
        Self {
            switches: self.switches.clone(),
            links: self.links.clone(),
            hosts,
        }
    }

    pub fn switches(&self) -> &[SwitchId] {
        &self.switches
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn id(v: u64) -> SwitchId {
        SwitchId::new(v)
    }

    #[test]
    fn switches_sorted_and_deduplicated() {
        let snap = TopologySnapshot::build(vec![id(2), id(1), id(0x10), id(2)], vec![], vec![]);
        assert_eq!(snap.switches(), &[id(1), id(2), id(0x10)]);
    }

    #[test]
    fn links_keep_order_and_drop_self_loops() {
        let links = vec![
            Link::new(id(2), id(1)),
            Link::new(id(3), id(3)),
            Link::new(id(1), id(2)),
        ];
        let snap = TopologySnapshot::build(vec![id(1), id(2)], links, vec![]);
        assert_eq!(
            snap.links(),
            &[Link::new(id(2), id(1)), Link::new(id(1), id(2))]
        );
        assert!(snap.links().iter().all(|l| !l.is_self_loop()));
    }

    #[test]
    fn with_hosts_keeps_graph() {
        let snap = TopologySnapshot::build(vec![id(1)], vec![], vec![]);
        let host = Host {
            display_name: "h1".into(),
            mac: MacAddress::new("00:00:00:00:00:01"),
            ipv4: "10.0.0.1".into(),
            attached_switch: id(1),
            port_no: Some(1),
        };
        let full = snap.with_hosts(vec![host.clone()]);
        assert_eq!(full.switches(), snap.switches());
        assert_eq!(full.hosts(), &[host]);
        assert!(snap.hosts().is_empty());
    }
}
