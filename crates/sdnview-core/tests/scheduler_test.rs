#![allow(clippy::unwrap_used)]
// Refresh scheduler behaviour against a scripted topology source, on a
// paused Tokio clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;

use sdnview_core::{
    Canvas, CoreError, Entity, Host, Link, MacAddress, Phase, RefreshMode, RefreshScheduler,
    RenderFrame, RenderSink, SchedulerState, SwitchId, TopologySource,
};

// ── Fixtures ────────────────────────────────────────────────────────

/// Behaviour of one refresh pass. The n-th call of each fetch uses the
/// n-th script (the last one repeats).
#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    host_delay: Duration,
    switches: Vec<u64>,
    fail_switches: bool,
    fail_hosts: bool,
}

impl Script {
    fn new(switches: &[u64]) -> Self {
        Self {
            delay: Duration::from_millis(10),
            host_delay: Duration::from_millis(10),
            switches: switches.to_vec(),
            fail_switches: false,
            fail_hosts: false,
        }
    }

    fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self.host_delay = delay;
        self
    }

    fn host_delay(mut self, delay: Duration) -> Self {
        self.host_delay = delay;
        self
    }
}

#[derive(Default)]
struct ScriptedSource {
    scripts: Vec<Script>,
    switch_calls: AtomicUsize,
    link_calls: AtomicUsize,
    host_calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts,
            ..Self::default()
        }
    }

    fn next(&self, counter: &AtomicUsize) -> Script {
        let idx = counter.fetch_add(1, Ordering::SeqCst);
        self.scripts[idx.min(self.scripts.len() - 1)].clone()
    }
}

impl TopologySource for ScriptedSource {
    async fn fetch_switches(&self) -> Result<Vec<SwitchId>, CoreError> {
        let script = self.next(&self.switch_calls);
        tokio::time::sleep(script.delay).await;
        if script.fail_switches {
            return Err(CoreError::Timeout { timeout_secs: 10 });
        }
        let ids = script.switches.iter().copied().map(SwitchId::new);
        Ok(ids.collect())
    }

    async fn fetch_links(&self) -> Result<Vec<Link>, CoreError> {
        let script = self.next(&self.link_calls);
        tokio::time::sleep(script.delay).await;
        Ok(script
            .switches
            .windows(2)
            .map(|w| Link::new(SwitchId::new(w[0]), SwitchId::new(w[1])))
            .collect())
    }

    async fn fetch_hosts(&self) -> Result<Vec<Host>, CoreError> {
        let script = self.next(&self.host_calls);
        tokio::time::sleep(script.host_delay).await;
        if script.fail_hosts {
            return Err(CoreError::Decode {
                message: "missing field `ipv4`".into(),
            });
        }
        Ok(script
            .switches
            .first()
            .map(|dpid| Host {
                display_name: "h1".into(),
                mac: MacAddress::new("00:00:00:00:00:01"),
                ipv4: "10.0.0.1".into(),
                attached_switch: SwitchId::new(*dpid),
                port_no: Some(1),
            })
            .into_iter()
            .collect())
    }
}

#[derive(Default)]
struct Recorder {
    frames: Mutex<Vec<Arc<RenderFrame>>>,
}

impl Recorder {
    fn frames(&self) -> Vec<Arc<RenderFrame>> {
        self.frames.lock().unwrap().clone()
    }
}

impl RenderSink for Recorder {
    fn render(&self, frame: Arc<RenderFrame>) {
        self.frames.lock().unwrap().push(frame);
    }
}

fn scheduler(scripts: Vec<Script>) -> (RefreshScheduler<ScriptedSource>, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let scheduler = RefreshScheduler::new(
        ScriptedSource::new(scripts),
        recorder.clone(),
        Duration::from_secs(3),
        Canvas::default(),
    );
    (scheduler, recorder)
}

// ── Passes ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn slow_earlier_pass_never_overwrites_later_one() {
    let (scheduler, recorder) = scheduler(vec![
        Script::new(&[1]).delay(Duration::from_millis(500)),
        Script::new(&[1, 2]),
    ]);

    let first = scheduler.trigger_refresh();
    tokio::time::sleep(Duration::from_millis(1)).await;
    let second = scheduler.trigger_refresh();

    let second = second.await.unwrap();
    let first = first.await.unwrap();

    assert_eq!((first.seq, second.seq), (1, 2));
    assert!(second.complete_applied);
    assert!(!first.partial_applied && !first.complete_applied);

    let current = scheduler.current().unwrap();
    assert_eq!(current.seq, 2);
    assert_eq!(current.snapshot.switches().len(), 2);
    assert!(recorder.frames().iter().all(|f| f.seq == 2));
}

#[tokio::test(start_paused = true)]
async fn slow_hosts_pop_in_after_graph() {
    let script = Script::new(&[1, 2]).host_delay(Duration::from_secs(1));
    let (scheduler, recorder) = scheduler(vec![script]);

    let report = scheduler.refresh_now().await;
    assert!(report.partial_applied && report.complete_applied);

    let frames = recorder.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!((frames[0].seq, frames[0].phase), (1, Phase::Partial));
    assert!(frames[0].snapshot.hosts().is_empty());
    assert_eq!(frames[0].snapshot.links().len(), 1);
    assert_eq!((frames[1].seq, frames[1].phase), (1, Phase::Complete));
    assert_eq!(frames[1].snapshot.hosts().len(), 1);
    assert_eq!(frames[1].layout.hosts.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn host_failure_keeps_switches_and_links() {
    let mut script = Script::new(&[1, 2]);
    script.fail_hosts = true;
    let (scheduler, _recorder) = scheduler(vec![script]);

    scheduler.refresh_now().await;

    let frame = scheduler.current().unwrap();
    assert!(frame.is_complete());
    assert_eq!(frame.snapshot.switches().len(), 2);
    assert_eq!(frame.snapshot.links().len(), 1);
    assert!(frame.snapshot.hosts().is_empty());
    assert_eq!(frame.failures.len(), 1);
    assert_eq!(frame.failures[0].entity, Entity::Hosts);
}

#[tokio::test(start_paused = true)]
async fn switch_failure_renders_without_dangling_edges() {
    let mut script = Script::new(&[1, 2]);
    script.fail_switches = true;
    let (scheduler, recorder) = scheduler(vec![script]);

    let report = scheduler.refresh_now().await;
    assert!(report.complete_applied);

    let frame = recorder.frames().pop().unwrap();
    assert!(frame.snapshot.switches().is_empty());
    assert_eq!(frame.snapshot.links().len(), 1);
    assert!(frame.layout.edges.is_empty());
    assert!(frame.layout.hosts.is_empty());
    assert!(frame.failed(Entity::Switches));
}

#[tokio::test(start_paused = true)]
async fn canvas_changes_apply_to_next_frame() {
    let (scheduler, _recorder) = scheduler(vec![Script::new(&[1])]);
    scheduler.set_canvas(Canvas::new(200.0, 200.0));

    scheduler.refresh_now().await;

    let frame = scheduler.current().unwrap();
    assert!((frame.layout.radius - 120.0).abs() < 1e-9);
    assert_eq!(scheduler.canvas(), Canvas::new(200.0, 200.0));
}

// ── State machine ───────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn single_shot_state_round_trip() {
    let (scheduler, _recorder) = scheduler(vec![Script::new(&[1])]);
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    let handle = scheduler.trigger_refresh();
    assert_eq!(
        scheduler.state(),
        SchedulerState::Running(RefreshMode::SingleShot)
    );

    handle.await.unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn auto_refresh_ticks_until_disabled() {
    let (scheduler, recorder) = scheduler(vec![Script::new(&[1, 2])]);
    let mut states = scheduler.subscribe_state();

    assert!(scheduler.enable_auto().await);
    assert!(!scheduler.enable_auto().await, "already enabled");
    assert!(states.has_changed().unwrap());
    assert_eq!(
        *states.borrow_and_update(),
        SchedulerState::Running(RefreshMode::Periodic)
    );

    // Ticks at 0s, 3s, 6s and 9s.
    tokio::time::sleep(Duration::from_secs(10)).await;
    let completed = recorder.frames().iter().filter(|f| f.is_complete()).count();
    assert_eq!(completed, 4);

    assert!(scheduler.disable_auto().await);
    assert_eq!(scheduler.state(), SchedulerState::Idle);

    let before = recorder.frames().len();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(recorder.frames().len(), before);
    assert!(!scheduler.disable_auto().await, "already disabled");
}

#[tokio::test(start_paused = true)]
async fn disabling_discards_pass_in_flight() {
    let (scheduler, recorder) =
        scheduler(vec![Script::new(&[1]).delay(Duration::from_secs(2))]);

    scheduler.enable_auto().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    scheduler.disable_auto().await;

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(scheduler.source().switch_calls.load(Ordering::SeqCst), 1);
    assert!(recorder.frames().is_empty());
    assert!(scheduler.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn toggle_mirrors_auto_button() {
    let (scheduler, _recorder) = scheduler(vec![Script::new(&[1])]);

    assert!(scheduler.toggle_auto().await);
    assert!(scheduler.is_auto());
    assert!(!scheduler.toggle_auto().await);
    assert!(!scheduler.is_auto());
    assert_eq!(scheduler.state(), SchedulerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_everything() {
    let (scheduler, recorder) = scheduler(vec![Script::new(&[1])]);

    scheduler.enable_auto().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.shutdown().await;
    let rendered = recorder.frames().len();

    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(!scheduler.enable_auto().await);

    let report = scheduler.refresh_now().await;
    assert!(!report.complete_applied);
    assert_eq!(recorder.frames().len(), rendered);
}

#[tokio::test(start_paused = true)]
async fn refresh_after_shutdown_skips_fetching() {
    let (scheduler, recorder) = scheduler(vec![Script::new(&[1])]);
    scheduler.shutdown().await;

    let report = scheduler.refresh_now().await;
    let background = scheduler.trigger_refresh().await.unwrap();

    assert_eq!(report.seq, 0);
    assert_eq!(background.seq, 0);
    assert!(!background.partial_applied && !background.complete_applied);
    assert_eq!(scheduler.source().switch_calls.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.source().host_calls.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    assert!(recorder.frames().is_empty());
}
