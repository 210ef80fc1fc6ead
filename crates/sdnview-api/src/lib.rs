// sdnview-api: Async Rust client for the Ryu controller's northbound REST API

pub mod client;
pub mod error;
pub mod flows;
pub mod models;
pub mod topology;
pub mod transport;

pub use client::RyuClient;
pub use error::Error;
pub use models::{
    FlowAction, FlowEntryAdd, FlowEntryClear, FlowEntryDelete, FlowMatch, FlowResponse,
    HostRecord, LinkRecord, PortRef, SwitchRecord,
};
pub use topology::TopologyEndpoint;
pub use transport::TransportConfig;
