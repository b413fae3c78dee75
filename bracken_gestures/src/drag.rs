// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag recognition: unfiltered per-contact movement reports.

use bitflags::bitflags;
use bracken_geom::{BoundingBox, PositionPolicy};
use bracken_tracker::{PointerEvent, PointerId, PointerTracker};
use kurbo::Point;
use smallvec::SmallVec;

bitflags! {
    /// Which drag stages are currently delivered.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DragParts: u8 {
        /// Movement reports.
        const MOVE = 1 << 0;
        /// Release reports.
        const UP = 1 << 1;
    }
}

/// Drag configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragConfig {
    /// Contacts admitted to the session. `None` = unbounded.
    pub max_fingers: Option<usize>,
    /// Coordinate origin for reported positions.
    pub position: PositionPolicy,
}

/// Stage of a drag report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// Contact landed.
    Down,
    /// Contact moved.
    Move,
    /// Contact lifted.
    Up,
}

/// One drag report for one contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEvent {
    /// Report stage.
    pub phase: DragPhase,
    /// Contact identifier.
    pub id: PointerId,
    /// Current position under the configured [`PositionPolicy`].
    pub position: Point,
    /// Position at first contact.
    pub start: Point,
}

/// Drag state machine.
///
/// Active while at least one contact is down; every move is reported, with
/// no drift or time gating — filtering is the listener's business. Lift
/// reports are synthesized from the tracker's live-list diff, so a contact
/// whose platform release event went missing still gets its `Up`.
#[derive(Clone, Debug)]
pub struct Drag {
    tracker: PointerTracker,
    parts: DragParts,
}

impl Drag {
    /// Create a drag recognizer.
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            tracker: PointerTracker::new(config.position, config.max_fingers),
            parts: DragParts::all(),
        }
    }

    /// Process a press; reports `Down` for each admitted contact. A fresh
    /// session restores any stages removed by [`disable`](Self::disable).
    pub fn on_down(
        &mut self,
        event: &PointerEvent,
        now: u64,
        resolve: impl FnOnce() -> BoundingBox,
    ) -> SmallVec<[DragEvent; 2]> {
        if self.tracker.begin(event, now, resolve) {
            self.parts = DragParts::all();
        }
        self.report(event, now, DragPhase::Down)
    }

    /// Process movement; reports `Move` for each changed tracked contact.
    pub fn on_move(&mut self, event: &PointerEvent, now: u64) -> SmallVec<[DragEvent; 2]> {
        if !self.parts.contains(DragParts::MOVE) || self.tracker.is_idle() {
            return SmallVec::new();
        }
        self.report(event, now, DragPhase::Move)
    }

    /// Process a release; reports `Up` for each contact the live list no
    /// longer contains, at its last known position.
    pub fn on_up(&mut self, event: &PointerEvent) -> SmallVec<[DragEvent; 2]> {
        let mut out = SmallVec::new();
        if !self.parts.contains(DragParts::UP) {
            return out;
        }
        let Some(bbox) = self.tracker.bbox().copied() else {
            return out;
        };
        self.tracker.end(event, |id, record| {
            out.push(DragEvent {
                phase: DragPhase::Up,
                id,
                position: bbox.to_local(record.page, record.offset),
                start: record.start,
            });
        });
        out
    }

    /// Stop delivering the given stages and suspend the session's finger
    /// count. The press stage stays armed; the next press re-enables
    /// everything.
    pub fn disable(&mut self, parts: DragParts) {
        self.parts -= parts;
        self.tracker.suspend();
    }

    /// Resume delivering the given stages and restore the finger count from
    /// the session's live records.
    pub fn enable(&mut self, parts: DragParts) {
        self.parts |= parts;
        self.tracker.restore_fingers();
    }

    fn report(
        &mut self,
        event: &PointerEvent,
        now: u64,
        phase: DragPhase,
    ) -> SmallVec<[DragEvent; 2]> {
        let mut out = SmallVec::new();
        let Some(bbox) = self.tracker.bbox().copied() else {
            return out;
        };
        for sample in &event.changed {
            let Some(record) = self.tracker.record_mut(sample.id) else {
                continue;
            };
            let position = bbox.to_local(sample.page, record.offset);
            record.record_move(position, sample.page, now);
            out.push(DragEvent {
                phase,
                id: sample.id,
                position,
                start: record.start,
            });
        }
        out
    }
}
