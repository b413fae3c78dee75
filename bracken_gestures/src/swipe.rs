// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe recognition: direction and velocity at release, snapped to an
//! angle step.

use bracken_geom::{BoundingBox, PositionPolicy};
use bracken_tracker::{PointerEvent, PointerTracker};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::DIRECTION_TOLERANCE;

/// Swipe configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Angle step, in degrees, the reported angle snaps to.
    pub snap: f64,
    /// Minimum speed, in pixels per millisecond, for a release to count as
    /// a swipe.
    pub threshold: f64,
    /// Contacts admitted to the session. `None` = unbounded.
    pub max_fingers: Option<usize>,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            snap: 90.0,
            threshold: 1.0,
            max_fingers: Some(5),
        }
    }
}

/// A recognized swipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeEvent {
    /// Snapped direction, degrees.
    pub angle: f64,
    /// Averaged speed, pixels per millisecond.
    pub velocity: f64,
    /// How many contacts participated, counted after full release.
    pub fingers: usize,
}

/// Swipe state machine.
///
/// Movement only accumulates per-finger end position and time; everything is
/// evaluated on full release. Fingers must agree on direction within
/// [`DIRECTION_TOLERANCE`]; disagreement means the gesture was ambiguous and
/// nothing is emitted.
#[derive(Clone, Debug)]
pub struct Swipe {
    snap: f64,
    threshold: f64,
    tracker: PointerTracker,
}

impl Swipe {
    /// Create a swipe recognizer.
    #[must_use]
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            snap: config.snap,
            threshold: config.threshold,
            tracker: PointerTracker::new(PositionPolicy::Relative, config.max_fingers),
        }
    }

    /// Process a press.
    pub fn on_down(
        &mut self,
        event: &PointerEvent,
        now: u64,
        resolve: impl FnOnce() -> BoundingBox,
    ) {
        self.tracker.begin(event, now, resolve);
    }

    /// Record each changed contact's latest position and time.
    pub fn on_move(&mut self, event: &PointerEvent, now: u64) {
        if self.tracker.is_idle() {
            return;
        }
        let Some(bbox) = self.tracker.bbox().copied() else {
            return;
        };
        for sample in &event.changed {
            if let Some(record) = self.tracker.record_mut(sample.id) {
                let local = bbox.to_local(sample.page, record.offset);
                record.record_move(local, sample.page, now);
            }
        }
    }

    /// Process a release; evaluates the swipe once all contacts lift.
    pub fn on_up(&mut self, event: &PointerEvent) -> Option<SwipeEvent> {
        if self.tracker.is_idle() {
            return None;
        }
        if !self.tracker.end(event, |_, _| {}) {
            return None;
        }

        // Average direction and speed across fingers; disagreement beyond
        // tolerance means the fingers swiped different ways, and an
        // ambiguous gesture is dropped rather than guessed at.
        let mut degree: Option<f64> = None;
        let mut velocity = 0.0;
        for (_, record) in self.tracker.records() {
            let d = record.current - record.start;
            let distance = d.hypot();
            let elapsed = record.move_time.saturating_sub(record.start_time);
            let finger_degree = d.x.atan2(d.y).to_degrees() + 180.0;
            let finger_velocity = if elapsed == 0 {
                0.0
            } else {
                distance / elapsed as f64
            };
            match degree {
                None => {
                    degree = Some(finger_degree);
                    velocity = finger_velocity;
                }
                Some(mean) if (finger_degree - mean).abs() <= DIRECTION_TOLERANCE => {
                    degree = Some((mean + finger_degree) / 2.0);
                    velocity = (velocity + finger_velocity) / 2.0;
                }
                Some(_) => return None,
            }
        }

        let degree = degree?;
        if velocity <= self.threshold {
            return None;
        }
        Some(SwipeEvent {
            angle: snap_angle(degree, self.snap),
            velocity,
            fingers: self.tracker.gesture_fingers(),
        })
    }
}

/// Snap a measured direction to the nearest step, mapping the zero bucket to
/// 360° before negating so "no direction" and "step zero" stay distinct.
fn snap_angle(degree: f64, snap: f64) -> f64 {
    let mut stepped = (degree / snap + 0.5).floor() * snap;
    if stepped == 0.0 {
        stepped = 360.0;
    }
    -(stepped - 360.0)
}
