// ── Controller facade ──
//
// The entry point consumers use: typed topology fetches, flow-rule
// execution, and a `RefreshScheduler` bound to this controller. Wraps a
// `RyuClient` behind an `Arc` so clones are cheap and share one
// connection pool.

use std::sync::Arc;

use sdnview_api::{RyuClient, TopologyEndpoint, TransportConfig};
use tracing::{debug, info};
use url::Url;

use crate::command::{FlowCommand, FlowOutcome, FlowRequest};
use crate::config::ControllerConfig;
use crate::convert;
use crate::error::CoreError;
use crate::model::{Host, Link, SwitchId, TopologySnapshot};
use crate::render::RenderSink;
use crate::scheduler::{RefreshScheduler, TopologySource};

/// Handle to one Ryu controller.
#[derive(Debug, Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

#[derive(Debug)]
struct ControllerInner {
    config: ControllerConfig,
    client: RyuClient,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = RyuClient::new(config.url.clone(), &transport)?;
        debug!(url = %config.url, timeout = ?config.timeout, "controller client ready");
        Ok(Self {
            inner: Arc::new(ControllerInner { config, client }),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn base_url(&self) -> &Url {
        self.inner.client.base_url()
    }

    // ── Topology ─────────────────────────────────────────────────────

    /// Switch dpids in response order.
    pub async fn fetch_switches(&self) -> Result<Vec<SwitchId>, CoreError> {
        let records = self.inner.client.list_switches().await?;
        convert::switches(records)
    }

    /// Inter-switch links without self-loops.
    pub async fn fetch_links(&self) -> Result<Vec<Link>, CoreError> {
        let records = self.inner.client.list_links().await?;
        convert::links(records)
    }

    /// Hosts named `h1`, `h2`, … in response order.
    pub async fn fetch_hosts(&self) -> Result<Vec<Host>, CoreError> {
        let records = self.inner.client.list_hosts().await?;
        convert::hosts(records)
    }

    /// Response body of a topology endpoint, undecoded.
    pub async fn fetch_raw(&self, endpoint: TopologyEndpoint) -> Result<String, CoreError> {
        Ok(self.inner.client.raw_get(endpoint).await?)
    }

    /// All three collections, concurrently. Any failure fails the whole call.
    pub async fn snapshot(&self) -> Result<TopologySnapshot, CoreError> {
        let (switches, links, hosts) = tokio::try_join!(
            self.fetch_switches(),
            self.fetch_links(),
            self.fetch_hosts()
        )?;
        Ok(TopologySnapshot::build(switches, links, hosts))
    }

    // ── Flow rules ───────────────────────────────────────────────────

    /// Send a flow-rule mutation. Whatever the controller answers is
    /// returned; only transport failures are errors.
    pub async fn execute(&self, command: FlowCommand) -> Result<FlowOutcome, CoreError> {
        let name = command.name();
        let dpid = command.dpid();
        let client = &self.inner.client;

        let response = match command.into_request() {
            FlowRequest::Add(body) => client.add_flow_entry(&body).await?,
            FlowRequest::Delete(body) => client.delete_flow_entry(&body).await?,
            FlowRequest::Clear(body) => client.clear_flow_entries(&body).await?,
        };

        info!(command = name, %dpid, status = response.status, "flow command sent");
        Ok(response.into())
    }

    /// Add a flow with the default cookie and priority.
    pub async fn add_flow(
        &self,
        dpid: SwitchId,
        in_port: u32,
        out_port: u32,
    ) -> Result<FlowOutcome, CoreError> {
        let command = FlowCommand::add(dpid, in_port, out_port);
        self.execute(command).await
    }

    /// Delete flows in table 0 matching `in_port`.
    pub async fn delete_flow_by_match(
        &self,
        dpid: SwitchId,
        in_port: u32,
    ) -> Result<FlowOutcome, CoreError> {
        let command = FlowCommand::delete_by_match(dpid, in_port);
        self.execute(command).await
    }

    /// Remove every flow on the switch.
    pub async fn clear_flows(&self, dpid: SwitchId) -> Result<FlowOutcome, CoreError> {
        self.execute(FlowCommand::clear(dpid)).await
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// A scheduler polling this controller with the configured period and canvas.
    pub fn scheduler(&self, sink: Arc<dyn RenderSink>) -> RefreshScheduler<Self> {
        RefreshScheduler::new(
            self.clone(),
            sink,
            self.inner.config.refresh_interval,
            self.inner.config.canvas,
        )
    }
}

impl TopologySource for Controller {
    async fn fetch_switches(&self) -> Result<Vec<SwitchId>, CoreError> {
        Controller::fetch_switches(self).await
    }

    async fn fetch_links(&self) -> Result<Vec<Link>, CoreError> {
        Controller::fetch_links(self).await
    }

    async fn fetch_hosts(&self) -> Result<Vec<Host>, CoreError> {
        Controller::fetch_hosts(self).await
    }
}
