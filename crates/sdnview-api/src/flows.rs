// Flow entry endpoints
//
// Mutations via `ofctl_rest`. The controller's answer is the source of
// truth: every response, including non-2xx, comes back as a
// `FlowResponse` for the caller to interpret.

use tracing::debug;

use crate::client::RyuClient;
use crate::error::Error;
use crate::models::{FlowEntryAdd, FlowEntryClear, FlowEntryDelete, FlowResponse};

impl RyuClient {
    /// Install a flow entry.
    ///
    /// `POST /stats/flowentry/add`
    pub async fn add_flow_entry(&self, entry: &FlowEntryAdd) -> Result<FlowResponse, Error> {
        let url = self.endpoint_url("/stats/flowentry/add")?;
        debug!(
            dpid = entry.dpid,
            in_port = entry.flow_match.in_port,
            "adding flow entry"
        );
        self.post_json(url, entry).await
    }

    /// Delete flow entries matching a selector.
    ///
    /// `POST /stats/flowentry/delete`
    pub async fn delete_flow_entry(&self, entry: &FlowEntryDelete) -> Result<FlowResponse, Error> {
        let url = self.endpoint_url("/stats/flowentry/delete")?;
        debug!(
            dpid = entry.dpid,
            in_port = entry.flow_match.in_port,
            "deleting flow entries"
        );
        self.post_json(url, entry).await
    }

    /// Remove every flow entry from a switch.
    ///
    /// `POST /stats/flowentry/clear` with `{"dpid": N}`
    pub async fn clear_flow_entries(&self, entry: &FlowEntryClear) -> Result<FlowResponse, Error> {
        let url = self.endpoint_url("/stats/flowentry/clear")?;
        debug!(dpid = entry.dpid, "clearing flow table");
        self.post_json(url, entry).await
    }
}
