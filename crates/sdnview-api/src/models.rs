// Ryu REST wire types
//
// Topology records mirror the `rest_topology` JSON shapes. Only the fields
// the client consumes are required; everything else is optional because
// controller builds differ in what they attach to ports.
//
// Flow entry bodies mirror the `ofctl_rest` request shapes. `dpid` is the
// integer datapath id, not the 16-digit hex string topology responses use.

use serde::{Deserialize, Serialize};

// ── Topology ─────────────────────────────────────────────────────────

/// A port reference as embedded in switches, links and hosts.
///
/// ```json
/// { "dpid": "0000000000000001", "port_no": "00000002", "hw_addr": "..", "name": "s1-eth2" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRef {
    pub dpid: String,
    #[serde(default)]
    pub port_no: Option<String>,
    #[serde(default)]
    pub hw_addr: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Element of `GET /v1.0/topology/switches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRecord {
    pub dpid: String,
    #[serde(default)]
    pub ports: Vec<PortRef>,
}

/// Element of `GET /v1.0/topology/links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub src: PortRef,
    pub dst: PortRef,
}

/// Element of `GET /v1.0/topology/hosts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub mac: String,
    pub ipv4: Vec<String>,
    #[serde(default)]
    pub ipv6: Vec<String>,
    pub port: PortRef,
}

// ── Flow entries ─────────────────────────────────────────────────────

/// Flow selector. Only the ingress port is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlowMatch {
    pub in_port: u32,
}

/// Instruction applied to matching packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowAction {
    /// `{"type": "OUTPUT", "port": N}`
    Output { port: u32 },
}

/// Body of `POST /stats/flowentry/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEntryAdd {
    pub dpid: u64,
    pub cookie: u64,
    pub priority: u32,
    #[serde(rename = "match")]
    pub flow_match: FlowMatch,
    pub actions: Vec<FlowAction>,
}

/// Body of `POST /stats/flowentry/delete`.
///
/// Deletion matches on selector fields only: no actions, cookie or priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEntryDelete {
    pub dpid: u64,
    pub table_id: u32,
    #[serde(rename = "match")]
    pub flow_match: FlowMatch,
}

/// Body of `POST /stats/flowentry/clear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEntryClear {
    pub dpid: u64,
}

/// Outcome of a flow mutation, reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowResponse {
    pub status: u16,
    pub body: String,
}

impl FlowResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn add_body_shape() {
        let body = FlowEntryAdd {
            dpid: 1,
            cookie: 1,
            priority: 100,
            flow_match: FlowMatch { in_port: 1 },
            actions: vec![FlowAction::Output { port: 2 }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "dpid": 1,
                "cookie": 1,
                "priority": 100,
                "match": { "in_port": 1 },
                "actions": [{ "type": "OUTPUT", "port": 2 }]
            })
        );
    }

    #[test]
    fn delete_body_has_only_selector_fields() {
        let body = FlowEntryDelete {
            dpid: 1,
            table_id: 0,
            flow_match: FlowMatch { in_port: 3 },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "dpid": 1, "table_id": 0, "match": { "in_port": 3 } })
        );
    }

    #[test]
    fn large_dpid_serializes_as_integer() {
        let body = FlowEntryClear { dpid: u64::MAX };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"dpid":18446744073709551615}"#
        );
    }

    #[test]
    fn host_record_requires_ipv4_array() {
        let raw = json!({ "mac": "00:00:00:00:00:01", "port": { "dpid": "0000000000000001" } });
        assert!(serde_json::from_value::<HostRecord>(raw).is_err());
    }

    #[test]
    fn flow_response_success_range() {
        let ok = FlowResponse {
            status: 200,
            body: String::new(),
        };
        let bad = FlowResponse {
            status: 400,
            body: "Invalid syntax".into(),
        };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
