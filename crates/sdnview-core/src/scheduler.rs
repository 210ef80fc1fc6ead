// ── Refresh scheduler ──
//
// Drives the fetch → snapshot → layout → render pipeline. One instance owns
// the current frame and the auto-refresh task; clones share that state.
//
// Every pass takes a sequence number when it starts. The render guard only
// accepts a frame whose number is greater than the last one applied (or the
// complete frame of the pass whose partial frame was applied last), so a
// slow pass can never overwrite a faster, later one. Frames of a cancelled
// periodic cycle are rejected under the same lock.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::layout::{Canvas, layout};
use crate::model::{Host, Link, SwitchId, TopologySnapshot};
use crate::render::{Entity, FetchFailure, Phase, RenderFrame, RenderSink};

/// Auto-refresh period when none is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3);

/// Where a refresh pass gets its data.
///
/// Each fetch is one bounded request; the scheduler never retries.
pub trait TopologySource: Send + Sync + 'static {
    fn fetch_switches(&self) -> impl Future<Output = Result<Vec<SwitchId>, CoreError>> + Send;
    fn fetch_links(&self) -> impl Future<Output = Result<Vec<Link>, CoreError>> + Send;
    fn fetch_hosts(&self) -> impl Future<Output = Result<Vec<Host>, CoreError>> + Send;
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RefreshMode {
    SingleShot,
    Periodic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running(RefreshMode),
}

/// What happened to the frames of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    pub seq: u64,
    pub partial_applied: bool,
    pub complete_applied: bool,
}

#[derive(Debug, Clone, Copy)]
struct RenderGuard {
    seq: u64,
    phase: Phase,
}

impl RenderGuard {
    fn accepts(&self, seq: u64, phase: Phase) -> bool {
        seq > self.seq
            || (seq == self.seq && self.phase == Phase::Partial && phase == Phase::Complete)
    }
}

struct Periodic {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

struct Inner<S> {
    source: S,
    sink: Arc<dyn RenderSink>,
    interval: Duration,
    canvas: watch::Sender<Canvas>,
    next_seq: AtomicU64,
    guard: StdMutex<RenderGuard>,
    current: ArcSwapOption<RenderFrame>,
    state: watch::Sender<SchedulerState>,
    single_shots: AtomicUsize,
    periodic_on: AtomicBool,
    periodic: Mutex<Option<Periodic>>,
    shutdown: CancellationToken,
}

// ── Scheduler ───────────────────────────────────────────────────────

/// Refresh driver for one topology source and one render sink.
///
/// Cheaply cloneable. The auto-refresh task keeps running until
/// [`disable_auto`](Self::disable_auto) or [`shutdown`](Self::shutdown).
pub struct RefreshScheduler<S: TopologySource> {
    inner: Arc<Inner<S>>,
}

impl<S: TopologySource> Clone for RefreshScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TopologySource> RefreshScheduler<S> {
    /// A zero `interval` falls back to [`DEFAULT_REFRESH_INTERVAL`].
    pub fn new(source: S, sink: Arc<dyn RenderSink>, interval: Duration, canvas: Canvas) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_REFRESH_INTERVAL
        } else {
            interval
        };
        Self {
            inner: Arc::new(Inner {
                source,
                sink,
                interval,
                canvas: watch::channel(canvas).0,
                next_seq: AtomicU64::new(0),
                guard: StdMutex::new(RenderGuard {
                    seq: 0,
                    phase: Phase::Complete,
                }),
                current: ArcSwapOption::empty(),
                state: watch::channel(SchedulerState::Idle).0,
                single_shots: AtomicUsize::new(0),
                periodic_on: AtomicBool::new(false),
                periodic: Mutex::new(None),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn state(&self) -> SchedulerState {
        *self.inner.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SchedulerState> {
        self.inner.state.subscribe()
    }

    /// Last frame handed to the sink.
    pub fn current(&self) -> Option<Arc<RenderFrame>> {
        self.inner.current.load_full()
    }

    pub fn canvas(&self) -> Canvas {
        *self.inner.canvas.borrow()
    }

    /// Used by frames laid out from now on, including passes in flight.
    pub fn set_canvas(&self, canvas: Canvas) {
        self.inner.canvas.send_replace(canvas);
    }

    pub fn is_auto(&self) -> bool {
        self.inner.periodic_on.load(Ordering::SeqCst)
    }

    // ── Single shot ─────────────────────────────────────────────────

    /// Run one pass on the calling task. No-op once shut down.
    pub async fn refresh_now(&self) -> PassReport {
        if self.inner.shutdown.is_cancelled() {
            debug!("refresh requested after shutdown");
            return PassReport::default();
        }
        let shot = SingleShot::begin(Arc::clone(&self.inner));
        shot.inner.run_pass(None).await
    }

    /// Run one pass in the background. Must be called within a Tokio runtime.
    pub fn trigger_refresh(&self) -> JoinHandle<PassReport> {
        if self.inner.shutdown.is_cancelled() {
            debug!("refresh requested after shutdown");
            return tokio::spawn(async { PassReport::default() });
        }
        let shot = SingleShot::begin(Arc::clone(&self.inner));
        tokio::spawn(async move { shot.inner.run_pass(None).await })
    }

    // ── Periodic ────────────────────────────────────────────────────

    /// Start auto refresh. Returns `false` if it was already on or the
    /// scheduler has shut down.
    pub async fn enable_auto(&self) -> bool {
        let mut periodic = self.inner.periodic.lock().await;
        if periodic.is_some() {
            return false;
        }
        if self.inner.shutdown.is_cancelled() {
            warn!("auto refresh requested after shutdown");
            return false;
        }

        let cancel = self.inner.shutdown.child_token();
        let task = tokio::spawn(periodic_task(Arc::clone(&self.inner), cancel.clone()));
        *periodic = Some(Periodic { cancel, task });
        self.inner.periodic_on.store(true, Ordering::SeqCst);
        self.inner.publish_state();
        info!(interval = ?self.inner.interval, "auto refresh enabled");
        true
    }

    /// Stop auto refresh. Frames from a pass still in flight are discarded.
    pub async fn disable_auto(&self) -> bool {
        let mut periodic = self.inner.periodic.lock().await;
        let Some(Periodic { cancel, task }) = periodic.take() else {
            return false;
        };
        cancel.cancel();
        // The task finishes its current pass on its own and exits.
        drop(task);
        self.inner.periodic_on.store(false, Ordering::SeqCst);
        // A frame already past the cancellation check finishes rendering
        // before this returns.
        drop(self.inner.lock_guard());
        self.inner.publish_state();
        info!("auto refresh disabled");
        true
    }

    /// Flip auto refresh; returns whether it is now on.
    pub async fn toggle_auto(&self) -> bool {
        if self.is_auto() {
            self.disable_auto().await;
            false
        } else {
            self.enable_auto().await
        }
    }

    /// Cancel every pass, stop auto refresh and wait for its task to end.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        let periodic = self.inner.periodic.lock().await.take();
        if let Some(Periodic { cancel, task }) = periodic {
            cancel.cancel();
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "periodic refresh task failed");
                }
            }
        }
        self.inner.periodic_on.store(false, Ordering::SeqCst);
        drop(self.inner.lock_guard());
        self.inner.publish_state();
        info!("refresh scheduler shut down");
    }
}

// ── Passes ──────────────────────────────────────────────────────────

impl<S: TopologySource> Inner<S> {
    async fn run_pass(&self, cycle: Option<&CancellationToken>) -> PassReport {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, "refresh pass started");

        let graph = async { tokio::join!(self.source.fetch_switches(), self.source.fetch_links()) };
        let hosts = self.source.fetch_hosts();
        tokio::pin!(graph, hosts);

        // Hosts that resolve first are folded straight into the complete frame.
        let mut early_hosts = None;
        let (switches, links) = loop {
            tokio::select! {
                result = &mut graph => break result,
                result = &mut hosts, if early_hosts.is_none() => early_hosts = Some(result),
            }
        };

        let mut failures = Vec::new();
        let switches = degrade(seq, Entity::Switches, switches, &mut failures);
        let links = degrade(seq, Entity::Links, links, &mut failures);
        let base = TopologySnapshot::build(switches, links, Vec::new());

        let mut report = PassReport {
            seq,
            ..PassReport::default()
        };
        let hosts = if let Some(result) = early_hosts {
            result
        } else {
            report.partial_applied = self.apply(
                seq,
                Phase::Partial,
                cycle,
                Arc::new(base.clone()),
                failures.clone(),
            );
            hosts.await
        };
        let hosts = degrade(seq, Entity::Hosts, hosts, &mut failures);
        report.complete_applied = self.apply(
            seq,
            Phase::Complete,
            cycle,
            Arc::new(base.with_hosts(hosts)),
            failures,
        );

        debug!(
            seq,
            partial = report.partial_applied,
            complete = report.complete_applied,
            "refresh pass finished"
        );
        report
    }

    /// Lay out and render a frame if the guard accepts it.
    fn apply(
        &self,
        seq: u64,
        phase: Phase,
        cycle: Option<&CancellationToken>,
        snapshot: Arc<TopologySnapshot>,
        failures: Vec<FetchFailure>,
    ) -> bool {
        let canvas = *self.canvas.borrow();
        let layout = layout(&snapshot, canvas);
        let frame = Arc::new(RenderFrame::new(seq, phase, snapshot, layout, failures));

        let mut guard = self.lock_guard();
        if self.shutdown.is_cancelled() || cycle.is_some_and(CancellationToken::is_cancelled) {
            debug!(seq, %phase, "discarding frame from cancelled refresh");
            return false;
        }
        if !guard.accepts(seq, phase) {
            debug!(seq, %phase, last = guard.seq, "discarding stale frame");
            return false;
        }
        *guard = RenderGuard { seq, phase };
        self.current.store(Some(Arc::clone(&frame)));
        self.sink.render(frame);
        true
    }

    fn lock_guard(&self) -> std::sync::MutexGuard<'_, RenderGuard> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_state(&self) {
        let next = if self.periodic_on.load(Ordering::SeqCst) {
            SchedulerState::Running(RefreshMode::Periodic)
        } else if self.single_shots.load(Ordering::SeqCst) > 0 {
            SchedulerState::Running(RefreshMode::SingleShot)
        } else {
            SchedulerState::Idle
        };
        self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                debug!(from = ?state, to = ?next, "scheduler state changed");
                *state = next;
                true
            }
        });
    }
}

fn degrade<T>(
    seq: u64,
    entity: Entity,
    result: Result<Vec<T>, CoreError>,
    failures: &mut Vec<FetchFailure>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(seq, %entity, error = %e, "fetch failed, rendering as empty");
            failures.push(FetchFailure {
                entity,
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

/// Keeps the scheduler in `Running(SingleShot)` while a manual pass runs.
struct SingleShot<S: TopologySource> {
    inner: Arc<Inner<S>>,
}

impl<S: TopologySource> SingleShot<S> {
    fn begin(inner: Arc<Inner<S>>) -> Self {
        inner.single_shots.fetch_add(1, Ordering::SeqCst);
        inner.publish_state();
        Self { inner }
    }
}

impl<S: TopologySource> Drop for SingleShot<S> {
    fn drop(&mut self) {
        self.inner.single_shots.fetch_sub(1, Ordering::SeqCst);
        self.inner.publish_state();
    }
}

async fn periodic_task<S: TopologySource>(inner: Arc<Inner<S>>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(inner.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                inner.run_pass(Some(&cancel)).await;
            }
        }
    }
    debug!("periodic refresh task stopped");
}
