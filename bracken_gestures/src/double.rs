// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double-tap / double-click recognition.

use bracken_geom::{BoundingBox, PositionPolicy};
use bracken_timing::Timers;
use bracken_tracker::{PointerEvent, PointerSample, PointerTracker};
use kurbo::{Point, Vec2};

use crate::DRIFT_TOLERANCE;

/// Double-tap configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoubleTapConfig {
    /// Window, in milliseconds, within which the second press must land.
    pub delay: u64,
}

impl Default for DoubleTapConfig {
    fn default() -> Self {
        Self { delay: 700 }
    }
}

/// A recognized double-tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleTapEvent {
    /// Second press position in target-local coordinates.
    pub point: Point,
}

/// Double-tap state machine: two presses within the delay window, within
/// drift tolerance of each other, both inside the target.
///
/// A pending first press expires through the timer; movement outside
/// tolerance during either press clears the timer and resets the sequence.
/// Ambiguity never downgrades to a single-tap emission — pair this with a
/// separate tap recognizer when both gestures are wanted.
#[derive(Clone, Debug)]
pub struct DoubleTap {
    delay: u64,
    tracker: PointerTracker,
    timers: Timers<()>,
    first: Option<PointerSample>,
    second: Option<PointerSample>,
    first_time: Option<u64>,
    second_elapsed: Option<u64>,
    watching: bool,
}

impl DoubleTap {
    /// Create a double-tap recognizer.
    #[must_use]
    pub fn new(config: DoubleTapConfig) -> Self {
        Self {
            delay: config.delay,
            tracker: PointerTracker::new(PositionPolicy::Relative, Some(1)),
            timers: Timers::new(),
            first: None,
            second: None,
            first_time: None,
            second_elapsed: None,
            watching: true,
        }
    }

    /// Process a press: the first press arms the expiry timer, the second
    /// records its arrival time for the window check at release.
    pub fn on_down(
        &mut self,
        event: &PointerEvent,
        now: u64,
        resolve: impl FnOnce() -> BoundingBox,
    ) {
        if let Some(sample) = event.changed.first().copied() {
            match self.first_time {
                Some(first_time) if self.second_elapsed.is_none() => {
                    self.second = Some(sample);
                    self.second_elapsed = Some(now.saturating_sub(first_time));
                }
                _ => {
                    self.first = Some(sample);
                    self.second = None;
                    self.first_time = Some(now);
                    self.second_elapsed = None;
                    self.watching = true;
                    self.timers.schedule((), now, self.delay);
                }
            }
        }
        self.tracker.begin(event, now, resolve);
        // The press itself counts as the first movement sample; a second
        // press landing outside tolerance cancels right here.
        self.check_drift(event);
    }

    /// Process movement while pressed.
    pub fn on_move(&mut self, event: &PointerEvent) {
        self.check_drift(event);
    }

    fn check_drift(&mut self, event: &PointerEvent) {
        if !self.watching || self.tracker.is_idle() {
            return;
        }
        let Some(first) = self.first else { return };
        let Some(bbox) = self.tracker.bbox().copied() else {
            return;
        };
        let Some(sample) = event.changed.first().copied() else {
            return;
        };
        if self.first_time.is_some() && self.second_elapsed.is_none() {
            self.second = Some(sample);
        }
        let local = bbox.to_local(sample.page, Vec2::new(bbox.x1, bbox.y1));
        let within = bbox.contains_local(local)
            && (sample.page.x - first.page.x).abs() <= DRIFT_TOLERANCE
            && (sample.page.y - first.page.y).abs() <= DRIFT_TOLERANCE;
        if !within {
            self.timers.cancel(&());
            self.first_time = None;
            self.second_elapsed = None;
            self.watching = false;
        }
    }

    /// Process a release. Emits when this release completes the second press
    /// and the second press landed within the delay window.
    pub fn on_up(&mut self, event: &PointerEvent) -> Option<DoubleTapEvent> {
        if !self.tracker.end(event, |_, _| {}) {
            return None;
        }
        let (Some(_), Some(elapsed)) = (self.first_time, self.second_elapsed) else {
            return None;
        };
        let emit = elapsed <= self.delay;
        self.timers.cancel(&());
        self.first_time = None;
        self.second_elapsed = None;
        if !emit {
            return None;
        }
        let bbox = self.tracker.bbox().copied()?;
        let sample = self.second.take()?;
        Some(DoubleTapEvent {
            point: bbox.to_local(sample.page, Vec2::new(bbox.x1, bbox.y1)),
        })
    }

    /// Expire the pending first press when its window has passed.
    pub fn on_time(&mut self, now: u64) {
        if !self.timers.expire(now).is_empty() {
            self.first_time = None;
        }
    }

    /// Earliest pending deadline, for the host's wait-until loop.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }
}
