//! Position reconciliation under the single-writer-per-axis model.
//!
//! Each peer is authoritative for exactly one spatial axis and periodically
//! broadcasts only that axis. The receiver snaps its replicated copy to the
//! authoritative value once the drift exceeds a fixed threshold. A hard snap
//! is deliberate: eliminating desync beats visual smoothness here.
//!
//! This only works because there are exactly two roles with orthogonal
//! axes, so every coordinate has a single writer and there is never a write
//! conflict. It does not generalize to more players or shared-axis control;
//! an extension would need an authoritative server or a timestamped
//! last-writer-wins scheme instead.

use serde::{Deserialize, Serialize};

/// Drift beyond this many units snaps the replicated axis to the
/// authoritative value; smaller drift is left alone.
pub const CORRECTION_THRESHOLD: f32 = 5.0;

/// How often the owned axis is re-broadcast regardless of movement. The
/// periodic repeat makes a dropped sync message self-healing.
pub const SYNC_INTERVAL_SECONDS: f32 = 0.1;

/// The spatial axis a peer owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One authoritative position sample. Exactly one axis field is present per
/// message, determined by the sender's role.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisSample {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl AxisSample {
    /// The single axis the sample carries, or `None` for malformed payloads
    /// (both fields missing or both present). Malformed samples are dropped
    /// by the receiver rather than guessed at.
    pub fn carried_axis(&self) -> Option<(Axis, f32)> {
        match (self.x, self.y) {
            (Some(x), None) => Some((Axis::Horizontal, x)),
            (None, Some(y)) => Some((Axis::Vertical, y)),
            _ => None,
        }
    }
}

/// The synchronizer half owned by one peer: emits samples for the owned
/// axis, applies samples for the other one.
pub struct AxisReconciler {
    owned: Axis,
}

impl AxisReconciler {
    pub fn new(owned: Axis) -> AxisReconciler {
        AxisReconciler { owned }
    }

    pub fn owned_axis(&self) -> Axis {
        self.owned
    }

    /// The outbound sample for the current avatar position. Only the owned
    /// axis is ever written into the message.
    pub fn sample(&self, x: f32, y: f32) -> AxisSample {
        match self.owned {
            Axis::Horizontal => AxisSample {
                x: Some(x),
                y: None,
            },
            Axis::Vertical => AxisSample {
                x: None,
                y: Some(y),
            },
        }
    }

    /// Merges an inbound sample into the local avatar position.
    ///
    /// Only the axis we do *not* own is writable from the outside; a sample
    /// for our own axis is ignored, whoever sent it. Returns whether a
    /// correction was applied.
    pub fn apply_remote(&self, sample: &AxisSample, x: &mut f32, y: &mut f32) -> bool {
        let Some((axis, authoritative)) = sample.carried_axis() else {
            return false;
        };
        if axis == self.owned {
            return false;
        }
        let local = match axis {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        };
        if (*local - authoritative).abs() > CORRECTION_THRESHOLD {
            *local = authoritative;
            true
        } else {
            false
        }
    }
}

/// The fixed-interval heartbeat for the periodic re-broadcast.
pub struct SyncCadence {
    interval: f32,
    elapsed: f32,
}

impl SyncCadence {
    pub fn new(interval: f32) -> SyncCadence {
        SyncCadence {
            interval,
            elapsed: 0.0,
        }
    }

    /// Accumulates frame time; true once per interval.
    pub fn due(&mut self, delta_time: f32) -> bool {
        self.elapsed += delta_time;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_only_carry_the_owned_axis() {
        let horizontal = AxisReconciler::new(Axis::Horizontal);
        let vertical = AxisReconciler::new(Axis::Vertical);

        // Over arbitrary positions the horizontal peer never leaks a y and
        // the vertical peer never leaks an x.
        for i in 0..100 {
            let (x, y) = (i as f32 * 3.7, i as f32 * -1.3);
            assert_eq!(horizontal.sample(x, y), AxisSample { x: Some(x), y: None });
            assert_eq!(vertical.sample(x, y), AxisSample { x: None, y: Some(y) });
        }
    }

    #[test]
    fn snaps_only_beyond_the_threshold() {
        let reconciler = AxisReconciler::new(Axis::Horizontal);
        let sample = AxisSample { x: None, y: Some(100.0) };

        // Drift of exactly the threshold stays.
        let (mut x, mut y) = (60.0, 95.0);
        assert!(!reconciler.apply_remote(&sample, &mut x, &mut y));
        assert_eq!(y, 95.0);

        // One more unit of drift snaps.
        let (mut x2, mut y2) = (60.0, 94.0);
        assert!(reconciler.apply_remote(&sample, &mut x2, &mut y2));
        assert_eq!(y2, 100.0);
        // The owned axis is untouched either way.
        assert_eq!(x, 60.0);
        assert_eq!(x2, 60.0);
    }

    #[test]
    fn applying_the_same_sample_twice_is_idempotent() {
        let reconciler = AxisReconciler::new(Axis::Horizontal);
        let sample = AxisSample { x: None, y: Some(40.0) };
        let (mut x, mut y) = (10.0, 80.0);

        assert!(reconciler.apply_remote(&sample, &mut x, &mut y));
        let after_first = (x, y);
        assert!(!reconciler.apply_remote(&sample, &mut x, &mut y));
        assert_eq!((x, y), after_first);
    }

    #[test]
    fn a_sample_for_the_owned_axis_is_ignored() {
        // Nobody gets to write the axis we own, however far off the value is.
        let reconciler = AxisReconciler::new(Axis::Vertical);
        let sample = AxisSample { x: None, y: Some(500.0) };
        let (mut x, mut y) = (0.0, 0.0);
        assert!(!reconciler.apply_remote(&sample, &mut x, &mut y));
        assert_eq!(y, 0.0);
    }

    #[test]
    fn malformed_samples_are_dropped() {
        let reconciler = AxisReconciler::new(Axis::Horizontal);
        let (mut x, mut y) = (1.0, 2.0);

        let empty = AxisSample { x: None, y: None };
        let overfull = AxisSample { x: Some(9.0), y: Some(9.0) };
        assert!(!reconciler.apply_remote(&empty, &mut x, &mut y));
        assert!(!reconciler.apply_remote(&overfull, &mut x, &mut y));
        assert_eq!((x, y), (1.0, 2.0));
    }

    #[test]
    fn cadence_fires_once_per_interval() {
        let mut cadence = SyncCadence::new(SYNC_INTERVAL_SECONDS);
        let frame = 1.0 / 60.0;

        let mut fired = 0;
        for _ in 0..60 {
            if cadence.due(frame) {
                fired += 1;
            }
        }
        // One second of frames at a 100ms interval: roughly ten firings.
        assert!((9..=10).contains(&fired), "fired {} times", fired);
    }
}
