// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch/rotate recognition: multi-contact scale and rotation about the
//! centroid.

use bracken_geom::{BoundingBox, PositionPolicy};
use bracken_tracker::{PointerEvent, PointerTracker};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Pinch/rotate configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinchConfig {
    /// Contacts required before the gesture starts reporting.
    pub min_fingers: usize,
    /// Contacts admitted to the session. `None` = unbounded.
    pub max_fingers: Option<usize>,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            min_fingers: 2,
            max_fingers: Some(2),
        }
    }
}

/// Stage of a pinch report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinchPhase {
    /// Enough contacts landed; scale is 1 and rotation 0 by definition.
    Start,
    /// Contacts moved.
    Change,
    /// Contacts dropped below the minimum.
    End,
}

/// One pinch/rotate report.
#[derive(Clone, Debug, PartialEq)]
pub struct PinchEvent {
    /// Report stage.
    pub phase: PinchPhase,
    /// Mean distance ratio to the centroid, 1 at gesture start.
    pub scale: f64,
    /// Mean accumulated rotation, degrees. Positive values follow the
    /// original accumulation convention; consumers wanting a fixed
    /// chirality should calibrate against [`PinchPhase::Change`] deltas.
    pub rotation: f64,
    /// Live contact count at this report.
    pub fingers: usize,
    /// Current positions of the live contacts, target-local.
    pub touches: SmallVec<[Point; 2]>,
}

/// Pinch/rotate state machine.
///
/// Per tick, the centroid of live contacts anchors both measurements: each
/// contact's scale is its current distance to the centroid over its first
/// measured distance, and its rotation accumulates the *difference* of
/// folded angle deltas between consecutive ticks. Accumulating differences
/// instead of comparing instantaneous angles is what keeps the value
/// continuous across the ±180° seam.
#[derive(Clone, Debug)]
pub struct Pinch {
    min_fingers: usize,
    tracker: PointerTracker,
    last_scale: f64,
    last_rotation: f64,
}

impl Pinch {
    /// Create a pinch/rotate recognizer.
    #[must_use]
    pub fn new(config: PinchConfig) -> Self {
        Self {
            min_fingers: config.min_fingers,
            tracker: PointerTracker::new(PositionPolicy::Relative, config.max_fingers),
            last_scale: 1.0,
            last_rotation: 0.0,
        }
    }

    /// Process a press. Reports [`PinchPhase::Start`] on the press that
    /// brings the contact count up to the configured minimum.
    pub fn on_down(
        &mut self,
        event: &PointerEvent,
        now: u64,
        resolve: impl FnOnce() -> BoundingBox,
    ) -> Option<PinchEvent> {
        let before = self.tracker.fingers();
        self.tracker.begin(event, now, resolve);
        let fingers = self.tracker.fingers();
        if fingers != self.min_fingers || fingers == before {
            return None;
        }
        self.last_scale = 1.0;
        self.last_rotation = 0.0;
        Some(PinchEvent {
            phase: PinchPhase::Start,
            scale: 1.0,
            rotation: 0.0,
            fingers,
            touches: self.live_points(),
        })
    }

    /// Process movement. Reports [`PinchPhase::Change`] while at least the
    /// minimum number of contacts is down.
    pub fn on_move(&mut self, event: &PointerEvent, now: u64) -> Option<PinchEvent> {
        if self.tracker.is_idle() {
            return None;
        }
        let Some(bbox) = self.tracker.bbox().copied() else {
            return None;
        };
        let origin = Vec2::new(bbox.x1, bbox.y1);
        for sample in &event.changed {
            if let Some(record) = self.tracker.record_mut(sample.id) {
                record.record_move(bbox.to_local(sample.page, origin), sample.page, now);
            }
        }

        let fingers = self.tracker.fingers();
        if fingers < self.min_fingers {
            return None;
        }

        let centroid = self.centroid()?;
        let mut scale_sum = 0.0;
        let mut rotation_sum = 0.0;
        let mut touches: SmallVec<[Point; 2]> = SmallVec::new();
        for (_, record) in self.tracker.records_mut() {
            if record.up {
                continue;
            }
            // The reference distance/angle is fixed against the centroid the
            // first time this contact is measured, not at the raw press.
            let (start_distance, start_angle) = match (record.start_distance, record.start_angle)
            {
                (Some(distance), Some(angle)) => (distance, angle),
                _ => {
                    let d = record.start - centroid;
                    let distance = d.hypot();
                    let angle = d.x.atan2(d.y).to_degrees();
                    record.start_distance = Some(distance);
                    record.start_angle = Some(angle);
                    (distance, angle)
                }
            };

            let d = record.current - centroid;
            record.scale = d.hypot() / start_distance;
            scale_sum += record.scale;

            // Fold the angle delta into [-180, 180). The fold's sign picks
            // the accumulation direction; the accumulated value itself only
            // ever changes by the small tick-to-tick difference, which is
            // what survives the ±180° discontinuity intact.
            let angle = d.x.atan2(d.y).to_degrees();
            let folded = (start_angle - angle + 360.0) % 360.0 - 180.0;
            record.fold_prev = record.fold;
            record.fold = Some(folded.abs());
            if let (Some(fold), Some(fold_prev)) = (record.fold, record.fold_prev) {
                if folded > 0.0 {
                    record.rotation += fold - fold_prev;
                } else {
                    record.rotation -= fold - fold_prev;
                }
                rotation_sum += record.rotation;
            }
            touches.push(record.current);
        }

        let scale = scale_sum / fingers as f64;
        let rotation = rotation_sum / fingers as f64;
        self.last_scale = scale;
        self.last_rotation = rotation;
        Some(PinchEvent {
            phase: PinchPhase::Change,
            scale,
            rotation,
            fingers,
            touches,
        })
    }

    /// Process a release. Reports [`PinchPhase::End`] when the contact count
    /// drops below the minimum, carrying the last reported scale/rotation.
    pub fn on_up(&mut self, event: &PointerEvent) -> Option<PinchEvent> {
        let before = self.tracker.fingers();
        self.tracker.end(event, |_, _| {});
        let fingers = self.tracker.fingers();
        if before != self.min_fingers || fingers >= self.min_fingers {
            return None;
        }
        Some(PinchEvent {
            phase: PinchPhase::End,
            scale: self.last_scale,
            rotation: self.last_rotation,
            fingers,
            touches: SmallVec::new(),
        })
    }

    fn centroid(&self) -> Option<Point> {
        let mut sum = Vec2::ZERO;
        let mut live = 0;
        for (_, record) in self.tracker.records() {
            if record.up {
                continue;
            }
            sum += record.current.to_vec2();
            live += 1;
        }
        (live > 0).then(|| (sum / live as f64).to_point())
    }

    fn live_points(&self) -> SmallVec<[Point; 2]> {
        self.tracker
            .records()
            .filter(|(_, r)| !r.up)
            .map(|(_, r)| r.current)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_tracker::PointerSample;
    use kurbo::Size;

    fn bbox() -> BoundingBox {
        BoundingBox::new(Point::ZERO, Size::new(1000.0, 1000.0))
    }

    fn pair(a: Point, b: Point) -> PointerEvent {
        let samples = [PointerSample::new(1, a), PointerSample::new(2, b)];
        PointerEvent::new(samples, samples)
    }

    fn start_two_fingers(pinch: &mut Pinch, a: Point, b: Point) {
        let started = pinch.on_down(&pair(a, b), 0, bbox);
        assert_eq!(started.as_ref().map(|e| e.phase), Some(PinchPhase::Start));
        assert_eq!(started.map(|e| (e.scale, e.rotation)), Some((1.0, 0.0)));
    }

    /// Two fingers on a circle of radius `r` about `center`, at opposite
    /// angles `theta` and `theta + 180°` (radians).
    fn opposed(center: Point, r: f64, theta: f64) -> (Point, Point) {
        let (s, c) = theta.sin_cos();
        let offset = Vec2::new(r * c, r * s);
        (center + offset, center - offset)
    }

    #[test]
    fn spreading_fingers_scale_up() {
        let mut pinch = Pinch::new(PinchConfig::default());
        start_two_fingers(
            &mut pinch,
            Point::new(400.0, 500.0),
            Point::new(600.0, 500.0),
        );

        // Spread from 200 px apart to 400 px apart.
        let got = pinch
            .on_move(&pair(Point::new(300.0, 500.0), Point::new(700.0, 500.0)), 16)
            .expect("two live fingers report");
        assert_eq!(got.phase, PinchPhase::Change);
        assert!((got.scale - 2.0).abs() < 1e-9, "scale {} != 2", got.scale);
        assert!(got.rotation.abs() < 1e-9);
        assert_eq!(got.fingers, 2);
        assert_eq!(got.touches.len(), 2);
    }

    #[test]
    fn pinching_fingers_scale_down() {
        let mut pinch = Pinch::new(PinchConfig::default());
        start_two_fingers(
            &mut pinch,
            Point::new(300.0, 500.0),
            Point::new(700.0, 500.0),
        );
        let got = pinch
            .on_move(&pair(Point::new(400.0, 500.0), Point::new(600.0, 500.0)), 16)
            .expect("two live fingers report");
        assert!((got.scale - 0.5).abs() < 1e-9);
    }

    #[test]
    fn small_rotation_accumulates_continuously() {
        let mut pinch = Pinch::new(PinchConfig::default());
        let center = Point::new(500.0, 500.0);
        let (a, b) = opposed(center, 200.0, 0.0);
        start_two_fingers(&mut pinch, a, b);

        // Rotate the pair in 2° steps; the report should track the total
        // smoothly, with no jumps.
        let mut last = 0.0_f64;
        for step in 1_u32..=20 {
            let theta = f64::from(step) * 2.0_f64.to_radians();
            let (a, b) = opposed(center, 200.0, theta);
            let got = pinch.on_move(&pair(a, b), u64::from(step)).expect("report");
            let delta = (got.rotation - last).abs();
            assert!(delta < 4.0, "step {step}: jumped by {delta}");
            last = got.rotation;
        }
        assert!((last.abs() - 38.0).abs() < 1.0, "total {last} != ~38");
    }

    #[test]
    fn rotation_is_continuous_across_the_half_turn_seam() {
        let mut pinch = Pinch::new(PinchConfig::default());
        let center = Point::new(500.0, 500.0);
        // One finger's measured angle starts at 170° and sweeps through the
        // ±180° discontinuity over the first few ticks. The folded per-tick
        // deltas stay small, so the accumulator must not jump by anything
        // near 360°.
        let start = (-80.0_f64).to_radians();
        let (a, b) = opposed(center, 200.0, start);
        start_two_fingers(&mut pinch, a, b);

        let mut last = 0.0_f64;
        let mut max_jump = 0.0_f64;
        for step in 1_u32..=10 {
            let theta = start - f64::from(step) * 3.0_f64.to_radians();
            let (a, b) = opposed(center, 200.0, theta);
            let got = pinch.on_move(&pair(a, b), u64::from(step)).expect("report");
            max_jump = max_jump.max((got.rotation - last).abs());
            last = got.rotation;
        }
        assert!(
            max_jump < 6.0,
            "accumulator jumped by {max_jump} crossing the seam"
        );
        assert!(last.abs() > 20.0, "rotation should have accumulated, got {last}");
    }

    #[test]
    fn reports_pause_below_the_finger_minimum() {
        let mut pinch = Pinch::new(PinchConfig::default());
        let a = Point::new(400.0, 500.0);
        // One finger down: no start, no change reports.
        let one = PointerEvent::new(
            [PointerSample::new(1, a)],
            [PointerSample::new(1, a)],
        );
        assert_eq!(pinch.on_down(&one, 0, bbox), None);
        assert_eq!(
            pinch.on_move(
                &PointerEvent::new(
                    [PointerSample::new(1, Point::new(450.0, 500.0))],
                    [PointerSample::new(1, Point::new(450.0, 500.0))],
                ),
                16,
            ),
            None
        );
    }

    #[test]
    fn losing_a_finger_ends_the_gesture() {
        let mut pinch = Pinch::new(PinchConfig::default());
        start_two_fingers(
            &mut pinch,
            Point::new(400.0, 500.0),
            Point::new(600.0, 500.0),
        );
        pinch
            .on_move(&pair(Point::new(300.0, 500.0), Point::new(700.0, 500.0)), 16)
            .expect("report");

        // Finger 2 lifts; finger 1 remains.
        let partial = PointerEvent::new(
            [PointerSample::new(2, Point::new(700.0, 500.0))],
            [PointerSample::new(1, Point::new(300.0, 500.0))],
        );
        let got = pinch.on_up(&partial).expect("end report");
        assert_eq!(got.phase, PinchPhase::End);
        assert_eq!(got.fingers, 1);
        // The last change's scale rides along on the end report.
        assert!((got.scale - 2.0).abs() < 1e-9);
    }

    #[test]
    fn second_session_starts_fresh() {
        let mut pinch = Pinch::new(PinchConfig::default());
        start_two_fingers(
            &mut pinch,
            Point::new(400.0, 500.0),
            Point::new(600.0, 500.0),
        );
        pinch
            .on_move(&pair(Point::new(300.0, 500.0), Point::new(700.0, 500.0)), 16)
            .expect("report");
        pinch.on_up(&PointerEvent::new(core::iter::empty(), core::iter::empty()));

        // A new two-finger session reports Start with fresh accumulators.
        let started = pinch
            .on_down(&pair(Point::new(450.0, 500.0), Point::new(550.0, 500.0)), 100, bbox)
            .expect("fresh start");
        assert_eq!(started.phase, PinchPhase::Start);
        assert_eq!((started.scale, started.rotation), (1.0, 0.0));
    }
}
