// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap and long-press recognition: one state machine, two timing windows.

use bracken_geom::{BoundingBox, PositionPolicy};
use bracken_timing::Timers;
use bracken_tracker::{PointerEvent, PointerTracker};
use kurbo::Vec2;

use crate::DRIFT_TOLERANCE;

/// Tap configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapConfig {
    /// Longest press, in milliseconds, that still counts as a tap.
    pub timeout: u64,
    /// Contacts admitted to the session. `None` = unbounded.
    pub max_fingers: Option<usize>,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            timeout: 250,
            max_fingers: None,
        }
    }
}

/// Long-press configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LongPressConfig {
    /// How long, in milliseconds, contacts must hold still before the press
    /// triggers.
    pub delay: u64,
    /// Contacts admitted to the session. `None` = unbounded.
    pub max_fingers: Option<usize>,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            delay: 500,
            max_fingers: None,
        }
    }
}

/// A recognized tap or long-press stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressEvent {
    /// Press and release within the tap window, without drift.
    Tap {
        /// How many contacts participated, counted after full release.
        fingers: usize,
    },
    /// The hold timer fired with every contact still down and in place.
    LongPressStart {
        /// Live contacts when the timer fired.
        fingers: usize,
    },
    /// Contacts released after a triggered long-press.
    LongPressEnd {
        /// How many contacts participated, counted after full release.
        fingers: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PressKind {
    Tap,
    LongPress,
}

/// Tap / long-press state machine, distinguished by construction:
/// [`Press::tap`] emits on quick release, [`Press::long_press`] on the hold
/// timer firing (and again on the eventual release).
///
/// Either way, a contact drifting past [`DRIFT_TOLERANCE`] on an axis or
/// leaving the target cancels the whole press — one physical press never
/// yields both a tap and a long-press.
#[derive(Clone, Debug)]
pub struct Press {
    kind: PressKind,
    window: u64,
    tracker: PointerTracker,
    timers: Timers<()>,
    pressed_at: Option<u64>,
    opening: Option<PointerEvent>,
    started: bool,
    watching: bool,
}

impl Press {
    /// Create a tap recognizer.
    #[must_use]
    pub fn tap(config: TapConfig) -> Self {
        Self::with_kind(PressKind::Tap, config.timeout, config.max_fingers)
    }

    /// Create a long-press recognizer.
    #[must_use]
    pub fn long_press(config: LongPressConfig) -> Self {
        Self::with_kind(PressKind::LongPress, config.delay, config.max_fingers)
    }

    fn with_kind(kind: PressKind, window: u64, max_fingers: Option<usize>) -> Self {
        Self {
            kind,
            window,
            tracker: PointerTracker::new(PositionPolicy::Relative, max_fingers),
            timers: Timers::new(),
            pressed_at: None,
            opening: None,
            started: false,
            watching: false,
        }
    }

    /// Process a press. The session-opening press stamps the reference time
    /// and, for long-press, arms the hold timer and retains the opening
    /// event for the timer-driven emission.
    pub fn on_down(
        &mut self,
        event: &PointerEvent,
        now: u64,
        resolve: impl FnOnce() -> BoundingBox,
    ) {
        if self.tracker.begin(event, now, resolve) {
            self.pressed_at = Some(now);
            self.started = false;
            self.watching = true;
            if self.kind == PressKind::LongPress {
                self.opening = Some(event.clone());
                self.timers.schedule((), now, self.window);
            }
        }
    }

    /// Watch for drift. A contact leaving the target or wandering past
    /// tolerance cancels the press; once cancelled, further movement is
    /// irrelevant and goes unwatched.
    pub fn on_move(&mut self, event: &PointerEvent) {
        if !self.watching || self.tracker.is_idle() {
            return;
        }
        let Some(bbox) = self.tracker.bbox().copied() else {
            return;
        };
        let origin = Vec2::new(bbox.x1, bbox.y1);
        for sample in &event.changed {
            let Some(record) = self.tracker.record(sample.id) else {
                continue;
            };
            let local = bbox.to_local(sample.page, origin);
            let within = bbox.contains_local(local)
                && (local.x - record.start.x).abs() <= DRIFT_TOLERANCE
                && (local.y - record.start.y).abs() <= DRIFT_TOLERANCE;
            if !within {
                self.watching = false;
                self.tracker.set_cancelled(true);
                return;
            }
        }
    }

    /// Drive the hold timer. Emits [`PressEvent::LongPressStart`] when the
    /// timer fires with the press intact: not cancelled, no contact lifted.
    pub fn on_time(&mut self, now: u64) -> Option<PressEvent> {
        if self.timers.expire(now).is_empty() {
            return None;
        }
        if self.kind != PressKind::LongPress {
            return None;
        }
        if self.tracker.cancelled() || self.tracker.is_idle() {
            return None;
        }
        if self.tracker.records().any(|(_, r)| r.up) {
            return None;
        }
        self.started = true;
        Some(PressEvent::LongPressStart {
            fingers: self.tracker.fingers(),
        })
    }

    /// Process a release.
    ///
    /// Tap mode emits when the session completes inside the window with no
    /// cancellation. Long-press mode emits [`PressEvent::LongPressEnd`] only
    /// if the hold timer already fired; releasing earlier just disarms it.
    pub fn on_up(&mut self, event: &PointerEvent, now: u64) -> Option<PressEvent> {
        if !self.tracker.end(event, |_, _| {}) {
            return None;
        }
        self.timers.cancel(&());
        match self.kind {
            PressKind::LongPress => {
                self.pressed_at = None;
                self.started.then(|| {
                    self.started = false;
                    PressEvent::LongPressEnd {
                        fingers: self.tracker.gesture_fingers(),
                    }
                })
            }
            PressKind::Tap => {
                let pressed_at = self.pressed_at.take()?;
                if self.tracker.cancelled() {
                    return None;
                }
                if now.saturating_sub(pressed_at) > self.window {
                    return None;
                }
                Some(PressEvent::Tap {
                    fingers: self.tracker.gesture_fingers(),
                })
            }
        }
    }

    /// The retained session-opening event, for reporting timer-driven
    /// emissions against.
    #[must_use]
    pub fn opening_event(&self) -> Option<&PointerEvent> {
        self.opening.as_ref()
    }

    /// Earliest pending deadline, for the host's wait-until loop.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }
}
