// ── Render contract ──
//
// The scheduler hands finished frames to a `RenderSink`. Sinks are called
// one at a time, under the scheduler's render guard, so implementations
// never see concurrent writes. Frames are immutable and shared by `Arc`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::layout::Layout;
use crate::model::TopologySnapshot;

/// How much of a refresh pass a frame reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Switches and links; hosts still outstanding.
    Partial,
    /// Switches, links and hosts.
    Complete,
}

/// Topology entity fetched by a refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Entity {
    Switches,
    Links,
    Hosts,
}

/// A fetch that failed and was rendered as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub entity: Entity,
    pub message: String,
}

/// One render of one refresh pass.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub seq: u64,
    pub phase: Phase,
    pub snapshot: Arc<TopologySnapshot>,
    pub layout: Layout,
    pub failures: Vec<FetchFailure>,
    pub completed_at: DateTime<Utc>,
}

impl RenderFrame {
    pub fn new(
        seq: u64,
        phase: Phase,
        snapshot: Arc<TopologySnapshot>,
        layout: Layout,
        failures: Vec<FetchFailure>,
    ) -> Self {
        Self {
            seq,
            phase,
            snapshot,
            layout,
            failures,
            completed_at: Utc::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn failed(&self, entity: Entity) -> bool {
        self.failures.iter().any(|f| f.entity == entity)
    }

    /// `Switches: 2  Links: 2  Hosts: 3  @ http://…`
    pub fn status_line(&self, base_url: &str) -> String {
        let hosts = if self.is_complete() {
            self.snapshot.hosts().len().to_string()
        } else {
            "…".to_owned()
        };
        format!(
            "Switches: {}  Links: {}  Hosts: {hosts}  @ {base_url}",
            self.snapshot.switches().len(),
            self.snapshot.links().len(),
        )
    }
}

// ── Sinks ───────────────────────────────────────────────────────────

/// Receiver of accepted frames.
pub trait RenderSink: Send + Sync {
    fn render(&self, frame: Arc<RenderFrame>);
}

impl<F> RenderSink for F
where
    F: Fn(Arc<RenderFrame>) + Send + Sync,
{
    fn render(&self, frame: Arc<RenderFrame>) {
        self(frame);
    }
}

/// Forwards frames to a single consumer task, typically a UI loop.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Arc<RenderFrame>>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Arc<RenderFrame>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RenderSink for ChannelSink {
    fn render(&self, frame: Arc<RenderFrame>) {
        // A closed receiver means the consumer shut down first.
        let _ = self.tx.send(frame);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::{DEFAULT_CANVAS, layout};
    use crate::model::{Link, SwitchId};

    fn frame(phase: Phase) -> RenderFrame {
        let snapshot = Arc::new(TopologySnapshot::build(
            vec![SwitchId::new(1), SwitchId::new(2)],
            vec![Link::new(SwitchId::new(1), SwitchId::new(2))],
            vec![],
        ));
        let layout = layout(&snapshot, DEFAULT_CANVAS);
        RenderFrame::new(1, phase, snapshot, layout, vec![])
    }

    #[test]
    fn status_line_counts() {
        assert_eq!(
            frame(Phase::Complete).status_line("http://127.0.0.1:8080"),
            "Switches: 2  Links: 1  Hosts: 0  @ http://127.0.0.1:8080"
        );
        let partial = frame(Phase::Partial).status_line("x");
        assert!(partial.contains("Hosts: …"));
    }

    #[tokio::test]
    async fn channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        sink.render(Arc::new(frame(Phase::Partial)));
        let got = rx.recv().await.unwrap();
        assert_eq!(got.phase, Phase::Partial);
    }
}
