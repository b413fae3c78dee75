// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click recognition: press and release inside the target, no intervening
//! page scroll.

use bracken_geom::{BoundingBox, PositionPolicy};
use bracken_tracker::{PointerEvent, PointerSample, PointerTracker};
use kurbo::{Point, Vec2};

/// Click configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickConfig {
    /// Contacts admitted to the session. `None` = unbounded.
    pub max_fingers: Option<usize>,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            max_fingers: Some(1),
        }
    }
}

/// A recognized click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickEvent {
    /// Release position in target-local coordinates.
    pub point: Point,
}

/// Click state machine.
///
/// Active from press to release. The release is validated against the
/// *session* bounding box, and against a freshly resolved one for the scroll
/// guard: if the page scrolled between press and release, the sequence was a
/// press-drag-scroll-release, not a click, and nothing is emitted.
#[derive(Clone, Debug)]
pub struct Click {
    tracker: PointerTracker,
    last: Option<PointerSample>,
}

impl Click {
    /// Create a click recognizer.
    #[must_use]
    pub fn new(config: ClickConfig) -> Self {
        Self {
            tracker: PointerTracker::new(PositionPolicy::Relative, config.max_fingers),
            last: None,
        }
    }

    /// Process a press. `resolve` supplies the session bounding box and runs
    /// only when this press opens a session.
    pub fn on_down(
        &mut self,
        event: &PointerEvent,
        now: u64,
        resolve: impl FnOnce() -> BoundingBox,
    ) {
        if self.tracker.begin(event, now, resolve) {
            // The press sample stands in until a move arrives, so a
            // press-release pair with no movement still validates.
            self.last = event.changed.first().copied();
        }
    }

    /// Track the latest pointer sample while pressed.
    pub fn on_move(&mut self, event: &PointerEvent) {
        if self.tracker.is_idle() {
            return;
        }
        if let Some(sample) = event.changed.first() {
            self.last = Some(*sample);
        }
    }

    /// Process a release. `fresh` re-resolves the bounding box for the
    /// scroll guard. Emits at most once, when the session completes with the
    /// pointer still inside the target and the page unscrolled.
    pub fn on_up(
        &mut self,
        event: &PointerEvent,
        fresh: impl FnOnce() -> BoundingBox,
    ) -> Option<ClickEvent> {
        if !self.tracker.end(event, |_, _| {}) {
            return None;
        }
        let sample = self.last.take()?;
        let bbox = *self.tracker.bbox()?;
        let local = bbox.to_local(sample.page, Vec2::new(bbox.x1, bbox.y1));
        let current = fresh();
        (bbox.contains_local(local) && bbox.scroll_top == current.scroll_top)
            .then_some(ClickEvent { point: local })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn bbox() -> BoundingBox {
        BoundingBox::new(Point::new(10.0, 10.0), Size::new(100.0, 100.0))
    }

    #[test]
    fn press_release_inside_emits_once() {
        let mut click = Click::new(ClickConfig::default());
        click.on_down(&PointerEvent::mouse_down(Point::new(50.0, 50.0)), 0, bbox);
        let got = click.on_up(&PointerEvent::mouse_up(Point::new(50.0, 50.0)), bbox);
        assert_eq!(
            got,
            Some(ClickEvent {
                point: Point::new(40.0, 40.0)
            })
        );
    }

    #[test]
    fn release_outside_the_target_is_not_a_click() {
        let mut click = Click::new(ClickConfig::default());
        click.on_down(&PointerEvent::mouse_down(Point::new(50.0, 50.0)), 0, bbox);
        click.on_move(&PointerEvent::mouse_move(Point::new(500.0, 50.0)));
        let got = click.on_up(&PointerEvent::mouse_up(Point::new(500.0, 50.0)), bbox);
        assert_eq!(got, None);
    }

    #[test]
    fn scroll_between_press_and_release_is_not_a_click() {
        let mut click = Click::new(ClickConfig::default());
        click.on_down(&PointerEvent::mouse_down(Point::new(50.0, 50.0)), 0, bbox);
        // The page scrolled 40px while the button was held.
        let scrolled = || bbox().with_scroll(Vec2::new(0.0, 40.0));
        let got = click.on_up(&PointerEvent::mouse_up(Point::new(50.0, 50.0)), scrolled);
        assert_eq!(got, None);
    }

    #[test]
    fn wander_and_return_still_clicks() {
        // Click has no drift gate; only the final position matters.
        let mut click = Click::new(ClickConfig::default());
        click.on_down(&PointerEvent::mouse_down(Point::new(50.0, 50.0)), 0, bbox);
        click.on_move(&PointerEvent::mouse_move(Point::new(400.0, 400.0)));
        click.on_move(&PointerEvent::mouse_move(Point::new(60.0, 55.0)));
        let got = click.on_up(&PointerEvent::mouse_up(Point::new(60.0, 55.0)), bbox);
        assert_eq!(
            got,
            Some(ClickEvent {
                point: Point::new(50.0, 45.0)
            })
        );
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut click = Click::new(ClickConfig::default());
        let got = click.on_up(&PointerEvent::mouse_up(Point::new(50.0, 50.0)), bbox);
        assert_eq!(got, None);
    }
}
