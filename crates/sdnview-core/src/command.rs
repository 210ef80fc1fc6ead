// ── Flow-rule commands ──
//
// Mutations the operator can apply to a switch's flow table. The DPID is
// already resolved; ports, cookie and priority are passed through as-is
// and the controller decides whether they are acceptable.

use sdnview_api::{
    FlowAction, FlowEntryAdd, FlowEntryClear, FlowEntryDelete, FlowMatch, FlowResponse,
};
use serde::Serialize;

use crate::model::SwitchId;

pub const DEFAULT_COOKIE: u64 = 1;
pub const DEFAULT_PRIORITY: u32 = 100;
pub const DEFAULT_TABLE_ID: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FlowCommand {
    /// Forward traffic arriving on `in_port` out of `out_port`.
    Add {
        dpid: SwitchId,
        in_port: u32,
        out_port: u32,
        cookie: u64,
        priority: u32,
    },
    /// Remove flows in `table_id` matching `in_port`.
    DeleteByMatch {
        dpid: SwitchId,
        in_port: u32,
        table_id: u32,
    },
    /// Remove every flow on the switch.
    Clear { dpid: SwitchId },
}

impl FlowCommand {
    /// Add with cookie 1 and priority 100.
    pub fn add(dpid: SwitchId, in_port: u32, out_port: u32) -> Self {
        Self::Add {
            dpid,
            in_port,
            out_port,
            cookie: DEFAULT_COOKIE,
            priority: DEFAULT_PRIORITY,
        }
    }

    /// Delete from table 0.
    pub fn delete_by_match(dpid: SwitchId, in_port: u32) -> Self {
        Self::DeleteByMatch {
            dpid,
            in_port,
            table_id: DEFAULT_TABLE_ID,
        }
    }

    pub fn clear(dpid: SwitchId) -> Self {
        Self::Clear { dpid }
    }

    pub fn dpid(&self) -> SwitchId {
        match self {
            Self::Add { dpid, .. } | Self::DeleteByMatch { dpid, .. } | Self::Clear { dpid } => {
                *dpid
            }
        }
    }

    /// `add`, `delete_by_match` or `clear`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub(crate) fn into_request(self) -> FlowRequest {
        match self {
            Self::Add {
                dpid,
                in_port,
                out_port,
                cookie,
                priority,
            } => FlowRequest::Add(FlowEntryAdd {
                dpid: dpid.value(),
                cookie,
                priority,
                flow_match: FlowMatch { in_port },
                actions: vec![FlowAction::Output { port: out_port }],
            }),
            Self::DeleteByMatch {
                dpid,
                in_port,
                table_id,
            } => FlowRequest::Delete(FlowEntryDelete {
                dpid: dpid.value(),
                table_id,
                flow_match: FlowMatch { in_port },
            }),
            Self::Clear { dpid } => FlowRequest::Clear(FlowEntryClear { dpid: dpid.value() }),
        }
    }
}

/// Wire body for a [`FlowCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FlowRequest {
    Add(FlowEntryAdd),
    Delete(FlowEntryDelete),
    Clear(FlowEntryClear),
}

/// The controller's answer, verbatim. Non-2xx is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowOutcome {
    pub status: u16,
    pub body: String,
}

impl FlowOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<FlowResponse> for FlowOutcome {
    fn from(resp: FlowResponse) -> Self {
        Self {
            status: resp.status,
            body: resp.body,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn add_uses_default_cookie_and_priority() {
        let FlowRequest::Add(body) = FlowCommand::add(SwitchId::new(1), 1, 2).into_request() else {
            panic!("expected add body");
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
    fn delete_by_match_body() {
        let FlowRequest::Delete(body) =
            FlowCommand::delete_by_match(SwitchId::new(1), 3).into_request()
        else {
            panic!("expected delete body");
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"dpid":1,"table_id":0,"match":{"in_port":3}}"#
        );
    }

    #[test]
    fn names_and_dpid() {
        let cmd = FlowCommand::clear(SwitchId::new(26));
        assert_eq!(cmd.name(), "clear");
        assert_eq!(cmd.dpid().value(), 26);
        let delete = FlowCommand::delete_by_match(SwitchId::new(1), 1);
        assert_eq!(delete.name(), "delete_by_match");
    }
}
