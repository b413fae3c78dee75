// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-session contact tracker: Idle → Active → Idle.

use alloc::collections::BTreeMap;

use bracken_geom::{BoundingBox, PositionPolicy};

use crate::event::{PointerEvent, PointerId, PointerSample};
use crate::record::TouchRecord;

/// Session-lifecycle state machine for one recognizer on one target.
///
/// A session spans first finger down to last finger up. The tracker owns the
/// identifier → [`TouchRecord`] map, the live finger count, the session
/// [`BoundingBox`] (resolved once, at session start), and the `cancel` flag
/// recognizers consult when a finger was substituted mid-gesture.
///
/// Invariants, after every call:
///
/// - `0 <= fingers <= max_fingers` (when a cap is configured);
/// - `fingers == 0` exactly when no session is in progress.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    records: BTreeMap<PointerId, TouchRecord>,
    fingers: usize,
    gesture_fingers: usize,
    cancel: bool,
    bbox: Option<BoundingBox>,
    position: PositionPolicy,
    max_fingers: Option<usize>,
}

impl PointerTracker {
    /// Create a tracker with the given position policy and finger cap
    /// (`None` = unbounded).
    #[must_use]
    pub fn new(position: PositionPolicy, max_fingers: Option<usize>) -> Self {
        Self {
            records: BTreeMap::new(),
            fingers: 0,
            gesture_fingers: 0,
            cancel: false,
            bbox: None,
            position,
            max_fingers,
        }
    }

    /// Process a press event.
    ///
    /// Opens a session if none is in progress: resolves a fresh bounding box
    /// through `resolve` (invoked at most once), clears stale records, and
    /// resets the cancel flag. Then admits each changed contact:
    ///
    /// - an identifier already tracked live is left alone;
    /// - at the finger cap, the contact is ignored;
    /// - if some record is flagged up, the new contact *reuses* that slot
    ///   (old key removed, fresh record inserted) and `cancel` is raised so
    ///   in-flight recognizers know a finger was substituted;
    /// - otherwise a new record is added.
    ///
    /// Returns whether this call was the session's first contact — the
    /// moment a recognizer should do its own session-start work.
    pub fn begin(
        &mut self,
        event: &PointerEvent,
        now: u64,
        resolve: impl FnOnce() -> BoundingBox,
    ) -> bool {
        let started = self.fingers == 0;
        if started {
            self.records.clear();
            self.gesture_fingers = 0;
            self.cancel = false;
            self.bbox = Some(resolve());
        }
        let Some(bbox) = self.bbox else {
            return started;
        };

        for touch in &event.changed {
            if self.records.get(&touch.id).is_some_and(|r| !r.up) {
                continue;
            }
            if self.max_fingers.is_some_and(|max| self.fingers >= max) {
                continue;
            }
            if self.fingers > 0 {
                // Replace a lifted finger's slot before growing the map.
                let lifted = self
                    .records
                    .iter()
                    .find(|(_, r)| r.up)
                    .map(|(id, _)| *id);
                if let Some(stale) = lifted {
                    self.records.remove(&stale);
                    self.admit(touch, &bbox, now);
                    self.cancel = true;
                    continue;
                }
            }
            self.admit(touch, &bbox, now);
        }
        started
    }

    fn admit(&mut self, touch: &PointerSample, bbox: &BoundingBox, now: u64) {
        let offset = self.position.origin(touch.page, bbox);
        let local = bbox.to_local(touch.page, offset);
        self.records
            .insert(touch.id, TouchRecord::new(local, offset, touch.page, now));
        self.fingers += 1;
    }

    /// Process a release event.
    ///
    /// Lift detection works from the event's *live* list, not its changed
    /// list: any tracked identifier absent from `live` and not already up is
    /// marked up, the finger count drops, and `on_lift` runs with the
    /// record's final state so recognizers can synthesize an "up" move even
    /// when the platform never delivered one for that contact.
    ///
    /// Returns `true` when the session completed (all fingers lifted); the
    /// participating-finger count is then frozen and readable via
    /// [`gesture_fingers`](Self::gesture_fingers). Returns `false` while
    /// contacts remain.
    pub fn end(
        &mut self,
        event: &PointerEvent,
        mut on_lift: impl FnMut(PointerId, &TouchRecord),
    ) -> bool {
        for (id, record) in self.records.iter_mut() {
            if !record.up && !event.live.iter().any(|s| s.id == *id) {
                record.up = true;
                self.fingers = self.fingers.saturating_sub(1);
                on_lift(*id, record);
            }
        }
        if self.fingers != 0 {
            return false;
        }
        self.gesture_fingers = self.records.len();
        true
    }

    /// Shared access to a contact's record. `None` means the contact does
    /// not belong to this session and should be ignored.
    #[must_use]
    pub fn record(&self, id: PointerId) -> Option<&TouchRecord> {
        self.records.get(&id)
    }

    /// Mutable access to a contact's record.
    pub fn record_mut(&mut self, id: PointerId) -> Option<&mut TouchRecord> {
        self.records.get_mut(&id)
    }

    /// Iterate all records, lifted ones included, in identifier order.
    pub fn records(&self) -> impl Iterator<Item = (PointerId, &TouchRecord)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    /// Iterate all records mutably, in identifier order.
    pub fn records_mut(&mut self) -> impl Iterator<Item = (PointerId, &mut TouchRecord)> {
        self.records.iter_mut().map(|(id, r)| (*id, r))
    }

    /// Live (non-lifted) finger count.
    #[must_use]
    pub fn fingers(&self) -> usize {
        self.fingers
    }

    /// Finger count frozen when the last contact lifted: how many contacts
    /// participated in the session, for gestures evaluated after release.
    #[must_use]
    pub fn gesture_fingers(&self) -> usize {
        self.gesture_fingers
    }

    /// Whether no session is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.fingers == 0
    }

    /// Whether a finger was substituted mid-session, or a recognizer
    /// abandoned the gesture.
    #[must_use]
    pub fn cancelled(&self) -> bool {
        self.cancel
    }

    /// Raise or clear the cancel flag.
    pub fn set_cancelled(&mut self, cancel: bool) {
        self.cancel = cancel;
    }

    /// The session bounding box, present while a session is in progress
    /// (and retained until the next one starts).
    #[must_use]
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    /// Suspend the session: the finger count drops to zero so movement is
    /// no longer attributed to it, but records stay for a later
    /// [`restore_fingers`](Self::restore_fingers).
    pub fn suspend(&mut self) {
        self.fingers = 0;
    }

    /// Restore the finger count to the number of live records after a
    /// [`suspend`](Self::suspend).
    pub fn restore_fingers(&mut self) {
        self.fingers = self.records.values().filter(|r| !r.up).count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use smallvec::SmallVec;

    fn bbox() -> BoundingBox {
        BoundingBox::new(Point::ZERO, Size::new(100.0, 100.0))
    }

    fn sample(id: PointerId, x: f64, y: f64) -> PointerSample {
        PointerSample::new(id, Point::new(x, y))
    }

    /// Event where `changed` and `live` are the same list.
    fn event(samples: &[PointerSample]) -> PointerEvent {
        PointerEvent::new(samples.iter().copied(), samples.iter().copied())
    }

    /// Release event: `changed` lists the lifted contacts, `live` the rest.
    fn release(changed: &[PointerSample], live: &[PointerSample]) -> PointerEvent {
        PointerEvent::new(changed.iter().copied(), live.iter().copied())
    }

    #[test]
    fn first_contact_opens_the_session() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
        let mut resolved = 0;
        assert!(tracker.begin(&event(&[sample(7, 10.0, 10.0)]), 0, || {
            resolved += 1;
            bbox()
        }));
        assert_eq!(resolved, 1);
        assert_eq!(tracker.fingers(), 1);
        assert!(!tracker.is_idle());

        // A second finger continues the session; the box is not re-resolved.
        assert!(!tracker.begin(&event(&[sample(8, 20.0, 20.0)]), 5, || {
            resolved += 1;
            bbox()
        }));
        assert_eq!(resolved, 1);
        assert_eq!(tracker.fingers(), 2);
    }

    #[test]
    fn finger_cap_holds_after_every_call() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, Some(2));
        tracker.begin(&event(&[sample(1, 0.0, 0.0)]), 0, bbox);
        tracker.begin(&event(&[sample(2, 1.0, 1.0)]), 1, bbox);
        tracker.begin(&event(&[sample(3, 2.0, 2.0)]), 2, bbox);
        assert_eq!(tracker.fingers(), 2);
        assert!(tracker.record(3).is_none());

        // Lifting one finger keeps the session active under the cap.
        let complete = tracker.end(
            &release(&[sample(1, 0.0, 0.0)], &[sample(2, 1.0, 1.0)]),
            |_, _| {},
        );
        assert!(!complete);
        assert_eq!(tracker.fingers(), 1);
    }

    #[test]
    fn duplicate_identifier_is_not_readmitted() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
        tracker.begin(&event(&[sample(1, 10.0, 10.0)]), 0, bbox);
        tracker.begin(&event(&[sample(1, 50.0, 50.0)]), 5, bbox);
        assert_eq!(tracker.fingers(), 1);
        // The record keeps its original start.
        assert_eq!(tracker.record(1).unwrap().start, Point::new(10.0, 10.0));
    }

    #[test]
    fn lifted_slot_is_reused_and_raises_cancel() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, Some(2));
        tracker.begin(&event(&[sample(1, 0.0, 0.0), sample(2, 10.0, 0.0)]), 0, bbox);
        assert_eq!(tracker.fingers(), 2);
        assert!(!tracker.cancelled());

        // Finger 1 lifts; finger 2 stays down.
        tracker.end(&release(&[sample(1, 0.0, 0.0)], &[sample(2, 10.0, 0.0)]), |_, _| {});
        assert_eq!(tracker.fingers(), 1);

        // Finger 3 lands before the session ends: it must take finger 1's
        // slot without growing the map.
        tracker.begin(&event(&[sample(3, 5.0, 5.0), sample(2, 10.0, 0.0)]), 10, bbox);
        assert_eq!(tracker.fingers(), 2);
        assert_eq!(tracker.records().count(), 2);
        assert!(tracker.record(1).is_none());
        assert!(tracker.record(3).is_some());
        assert!(tracker.cancelled());
    }

    #[test]
    fn end_detects_lifts_from_the_live_list() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
        tracker.begin(&event(&[sample(1, 0.0, 0.0), sample(2, 10.0, 0.0)]), 0, bbox);

        // The platform delivered an empty changed list on release; the live
        // list alone identifies which contacts ended.
        let mut lifted: SmallVec<[PointerId; 2]> = SmallVec::new();
        let complete = tracker.end(&release(&[], &[sample(2, 10.0, 0.0)]), |id, record| {
            assert!(record.up, "lift callback sees the record already marked up");
            lifted.push(id);
        });
        assert!(!complete);
        assert_eq!(lifted.as_slice(), &[1]);

        let complete = tracker.end(&release(&[], &[]), |id, _| lifted.push(id));
        assert!(complete);
        assert_eq!(lifted.as_slice(), &[1, 2]);
        assert_eq!(tracker.gesture_fingers(), 2);
        assert!(tracker.is_idle());
    }

    #[test]
    fn end_is_idempotent_for_already_lifted_contacts() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
        tracker.begin(&event(&[sample(1, 0.0, 0.0)]), 0, bbox);
        assert!(tracker.end(&release(&[], &[]), |_, _| {}));

        // A duplicate release must not underflow or re-notify.
        let mut calls = 0;
        assert!(tracker.end(&release(&[], &[]), |_, _| calls += 1));
        assert_eq!(calls, 0);
        assert_eq!(tracker.fingers(), 0);
    }

    #[test]
    fn gesture_fingers_counts_every_participant() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
        tracker.begin(&event(&[sample(1, 0.0, 0.0)]), 0, bbox);
        tracker.begin(&event(&[sample(2, 10.0, 0.0)]), 5, bbox);
        // 1 lifts early, 2 lifts last: both participated.
        tracker.end(&release(&[sample(1, 0.0, 0.0)], &[sample(2, 10.0, 0.0)]), |_, _| {});
        assert!(tracker.end(&release(&[sample(2, 10.0, 0.0)], &[]), |_, _| {}));
        assert_eq!(tracker.gesture_fingers(), 2);
    }

    #[test]
    fn next_session_starts_clean() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
        tracker.begin(&event(&[sample(1, 0.0, 0.0)]), 0, bbox);
        tracker.end(&release(&[], &[]), |_, _| {});
        assert_eq!(tracker.gesture_fingers(), 1);

        assert!(tracker.begin(&event(&[sample(2, 1.0, 1.0)]), 100, bbox));
        assert_eq!(tracker.records().count(), 1);
        assert_eq!(tracker.fingers(), 1);
        assert!(!tracker.cancelled());
    }

    #[test]
    fn fingers_invariant_holds_over_arbitrary_sequences() {
        let cap = 3;
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, Some(cap));
        let mut live: SmallVec<[PointerSample; 4]> = SmallVec::new();

        // Scripted churn: land five fingers, lift two, land two more, lift all.
        for id in 0..5u64 {
            live.push(sample(id, id as f64, 0.0));
            tracker.begin(&event(&live), id, bbox);
            assert!(tracker.fingers() <= cap, "cap exceeded after begin");
        }
        for _ in 0..2 {
            live.remove(0);
            tracker.end(&release(&[], &live), |_, _| {});
            assert!(tracker.fingers() <= cap, "cap exceeded after end");
        }
        for id in 5..7u64 {
            live.push(sample(id, id as f64, 0.0));
            tracker.begin(&event(&live), id, bbox);
            assert!(tracker.fingers() <= cap, "cap exceeded after re-begin");
        }
        live.clear();
        assert!(tracker.end(&release(&[], &[]), |_, _| {}));
        assert_eq!(tracker.fingers(), 0);
        assert!(tracker.is_idle());
    }

    #[test]
    fn suspend_and_restore_track_live_records() {
        let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
        tracker.begin(&event(&[sample(1, 0.0, 0.0), sample(2, 5.0, 0.0)]), 0, bbox);
        tracker.suspend();
        assert!(tracker.is_idle());
        tracker.restore_fingers();
        assert_eq!(tracker.fingers(), 2);
    }
}
