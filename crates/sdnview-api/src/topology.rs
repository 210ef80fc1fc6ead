// Topology discovery endpoints
//
// Read-only views of the controller's `rest_topology` application:
// switches, inter-switch links and learned hosts.

use tracing::debug;

use crate::client::RyuClient;
use crate::error::Error;
use crate::models::{HostRecord, LinkRecord, SwitchRecord};

/// The three topology collections the controller exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyEndpoint {
    Switches,
    Links,
    Hosts,
}

impl TopologyEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Switches => "/v1.0/topology/switches",
            Self::Links => "/v1.0/topology/links",
            Self::Hosts => "/v1.0/topology/hosts",
        }
    }
}

impl RyuClient {
    /// List all connected switches.
    ///
    /// `GET /v1.0/topology/switches`
    pub async fn list_switches(&self) -> Result<Vec<SwitchRecord>, Error> {
        let url = self.endpoint_url(TopologyEndpoint::Switches.path())?;
        debug!("listing switches");
        self.get_json(url).await
    }

    /// List all discovered links, as reported (self-loops included).
    ///
    /// `GET /v1.0/topology/links`
    pub async fn list_links(&self) -> Result<Vec<LinkRecord>, Error> {
        let url = self.endpoint_url(TopologyEndpoint::Links.path())?;
        debug!("listing links");
        self.get_json(url).await
    }

    /// List all learned hosts.
    ///
    /// `GET /v1.0/topology/hosts`
    pub async fn list_hosts(&self) -> Result<Vec<HostRecord>, Error> {
        let url = self.endpoint_url(TopologyEndpoint::Hosts.path())?;
        debug!("listing hosts");
        self.get_json(url).await
    }

    /// Fetch a topology collection without decoding it.
    pub async fn raw_get(&self, endpoint: TopologyEndpoint) -> Result<String, Error> {
        let url = self.endpoint_url(endpoint.path())?;
        self.get_text(url).await
    }
}
