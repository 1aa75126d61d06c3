//! Host position snapshots and the local dead-reckoning estimate.
//!
//! The host reports work (WCS) and machine (MCS) coordinates independently,
//! each with its own timestamp. Between reports, and whenever the host goes
//! quiet, every emitted jog is added to a local estimate so the readout keeps
//! moving. [`PositionTracker::readout`] picks what to show:
//!
//! 1. the host snapshot for the viewed frame, if fresh (dot on)
//! 2. for WCS only: fresh machine position minus the active work offset
//! 3. the dead-reckoned estimate
//!
//! # Example
//!
//! ```rust
//! use cnc_pendant::position::PositionTracker;
//! use cnc_pendant::state::{Axis, CoordView};
//!
//! let mut tracker = PositionTracker::new(2000);
//! tracker.apply_snapshot(CoordView::Work, [Some(1.0), Some(2.0), Some(3.0)], 0);
//! assert!(tracker.readout(CoordView::Work, "G54", 100).fresh);
//!
//! tracker.record_jog(Axis::Z, -0.5);
//! let stale = tracker.readout(CoordView::Work, "G54", 5000);
//! assert!(!stale.fresh);
//! assert_eq!(stale.values, [1.0, 2.0, 2.5]);
//! ```

use crate::protocol::{AxisValues, OFFSET_SLOTS};
use crate::state::{Axis, CoordView};

/// What the position panel should show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionReadout {
    /// X, Y, Z.
    pub values: [f32; 3],
    /// Host-reported and within the staleness threshold.
    pub fresh: bool,
    /// Frame the values are in.
    pub frame: CoordView,
}

impl PositionReadout {
    /// True if any axis differs by more than `epsilon`, or freshness or frame changed.
    pub fn differs(&self, other: &PositionReadout, epsilon: f32) -> bool {
        self.fresh != other.fresh
            || self.frame != other.frame
            || self
                .values
                .iter()
                .zip(other.values.iter())
                .any(|(a, b)| (a - b).abs() > epsilon)
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Snapshot {
    values: [f32; 3],
    updated_ms: Option<u64>,
}

/// Per-frame snapshots, dead reckoning, and work offsets.
#[derive(Clone, Debug)]
pub struct PositionTracker {
    snapshots: [Snapshot; 2],
    estimate: [[f32; 3]; 2],
    offsets: [Option<[f32; 3]>; OFFSET_SLOTS.len()],
    stale_after_ms: u32,
}

const fn frame_index(frame: CoordView) -> usize {
    match frame {
        CoordView::Work => 0,
        CoordView::Machine => 1,
    }
}

impl PositionTracker {
    /// Creates an empty tracker at the origin.
    pub fn new(stale_after_ms: u32) -> Self {
        Self {
            snapshots: [Snapshot::default(); 2],
            estimate: [[0.0; 3]; 2],
            offsets: [None; OFFSET_SLOTS.len()],
            stale_after_ms,
        }
    }

    /// Applies a `POS:` line. Missing fields keep their previous value.
    ///
    /// Returns `false` (and leaves the timestamp alone) if no field parsed.
    pub fn apply_snapshot(&mut self, frame: CoordView, values: AxisValues, now_ms: u64) -> bool {
        let idx = frame_index(frame);
        let snapshot = &mut self.snapshots[idx];
        let mut any = false;
        for (slot, value) in snapshot.values.iter_mut().zip(values) {
            if let Some(v) = value {
                *slot = v;
                any = true;
            }
        }
        if any {
            snapshot.updated_ms = Some(now_ms);
            self.estimate[idx] = snapshot.values;
        }
        any
    }

    /// Applies an `OFFSET:` line for slot `slot` (0 = G54).
    pub fn apply_offset(&mut self, slot: usize, values: AxisValues) {
        let Some(entry) = self.offsets.get_mut(slot) else {
            return;
        };
        let offset = entry.get_or_insert([0.0; 3]);
        for (axis, value) in offset.iter_mut().zip(values) {
            if let Some(v) = value {
                *axis = v;
            }
        }
    }

    /// Adds one emitted jog to both frames' estimates.
    pub fn record_jog(&mut self, axis: Axis, distance: f32) {
        for frame in &mut self.estimate {
            frame[axis.index()] += distance;
        }
    }

    /// Whether the host snapshot for `frame` is within the threshold.
    pub fn is_fresh(&self, frame: CoordView, now_ms: u64) -> bool {
        match self.snapshots[frame_index(frame)].updated_ms {
            Some(at) => now_ms.saturating_sub(at) <= u64::from(self.stale_after_ms),
            None => false,
        }
    }

    /// Work offset stored for a label such as `G55`.
    pub fn offset_for(&self, label: &str) -> Option<[f32; 3]> {
        let slot = OFFSET_SLOTS.iter().position(|s| *s == label)?;
        self.offsets[slot]
    }

    /// Position to display for `view`.
    pub fn readout(&self, view: CoordView, active_wcs: &str, now_ms: u64) -> PositionReadout {
        let idx = frame_index(view);
        if self.is_fresh(view, now_ms) {
            return PositionReadout {
                values: self.snapshots[idx].values,
                fresh: true,
                frame: view,
            };
        }

        if view == CoordView::Work && self.is_fresh(CoordView::Machine, now_ms) {
            if let Some(offset) = self.offset_for(active_wcs) {
                let machine = self.snapshots[frame_index(CoordView::Machine)].values;
                return PositionReadout {
                    values: [
                        machine[0] - offset[0],
                        machine[1] - offset[1],
                        machine[2] - offset[2],
                    ],
                    fresh: false,
                    frame: view,
                };
            }
        }

        PositionReadout {
            values: self.estimate[idx],
            fresh: false,
            frame: view,
        }
    }
}
