// ── Ring layout ──
//
// Switches sit on a circle around the canvas centre in snapshot order.
// Each host is placed a fixed distance from its switch at a random angle
// drawn per pass. Links and hosts that reference a switch outside the
// snapshot are left out.

use std::f64::consts::TAU;

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{SwitchId, TopologySnapshot};

/// Fallback drawing area when the caller has none.
pub const DEFAULT_CANVAS: Canvas = Canvas::new(900.0, 600.0);
/// Ring radius never shrinks below this.
pub const MIN_RING_RADIUS: f64 = 120.0;
/// Ring radius as a fraction of the smaller canvas side.
pub const RING_FILL: f64 = 0.35;
/// Distance between a host and its switch.
pub const HOST_OFFSET: f64 = 40.0;
/// Drawn radius of a switch node.
pub const SWITCH_NODE_RADIUS: f64 = 18.0;
/// Drawn radius of a host node.
pub const HOST_NODE_RADIUS: f64 = 8.0;

// ── Geometry ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace non-positive (or NaN) dimensions with the defaults.
    pub fn effective(self) -> Self {
        let pick = |v: f64, fallback: f64| if v > 0.0 { v } else { fallback };
        Self {
            width: pick(self.width, DEFAULT_CANVAS.width),
            height: pick(self.height, DEFAULT_CANVAS.height),
        }
    }

    pub fn center(self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// `max(120, 0.35 * min(width, height))`.
    pub fn ring_radius(self) -> f64 {
        (RING_FILL * self.width.min(self.height)).max(MIN_RING_RADIUS)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        DEFAULT_CANVAS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn offset(self, distance: f64, angle: f64) -> Self {
        Self::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Line between two placed switches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub src: SwitchId,
    pub dst: SwitchId,
    pub from: Position,
    pub to: Position,
}

/// A host and the switch position it hangs off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostPlacement {
    pub switch: SwitchId,
    pub position: Position,
    pub anchor: Position,
}

// ── Layout ──────────────────────────────────────────────────────────

/// Positions for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub canvas: Canvas,
    pub radius: f64,
    /// Switch positions in snapshot order.
    pub switches: IndexMap<SwitchId, Position>,
    pub edges: Vec<Edge>,
    /// Host placements keyed by display name, in snapshot order.
    pub hosts: IndexMap<String, HostPlacement>,
}

impl Layout {
    pub fn switch_position(&self, id: SwitchId) -> Option<Position> {
        self.switches.get(&id).copied()
    }
}

/// Lay out `snapshot` with thread-local randomness for host angles.
pub fn layout(snapshot: &TopologySnapshot, canvas: Canvas) -> Layout {
    layout_with_rng(snapshot, canvas, &mut rand::thread_rng())
}

/// Lay out `snapshot`, drawing host angles from `rng`.
///
/// Switch positions depend only on the snapshot and canvas.
pub fn layout_with_rng<R: Rng + ?Sized>(
    snapshot: &TopologySnapshot,
    canvas: Canvas,
    rng: &mut R,
) -> Layout {
    let canvas = canvas.effective();
    let center = canvas.center();
    let radius = canvas.ring_radius();
    let slots = as_f64(snapshot.switches().len().max(1));

    let switches: IndexMap<SwitchId, Position> = snapshot
        .switches()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let angle = TAU * as_f64(i) / slots;
            (*id, center.offset(radius, angle))
        })
        .collect();

    let edges = snapshot
        .links()
        .iter()
        .filter_map(|link| {
            let from = switches.get(&link.src)?;
            let to = switches.get(&link.dst)?;
            Some(Edge {
                src: link.src,
                dst: link.dst,
                from: *from,
                to: *to,
            })
        })
        .collect();

    let mut hosts = IndexMap::with_capacity(snapshot.hosts().len());
    for host in snapshot.hosts() {
        let Some(anchor) = switches.get(&host.attached_switch).copied() else {
            continue;
        };
        let angle = rng.gen_range(0.0..TAU);
        hosts.insert(
            host.display_name.clone(),
            HostPlacement {
                switch: host.attached_switch,
                position: anchor.offset(HOST_OFFSET, angle),
                anchor,
            },
        );
    }

    Layout {
        canvas,
        radius,
        switches,
        edges,
        hosts,
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn as_f64(n: usize) -> f64 {
    n as f64
}
