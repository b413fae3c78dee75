// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a gesture registry with a scripted pointer stream.
//!
//! One target carries drag, tap, long-press, and pinch listeners at the
//! same time; the script plays a quick drag-and-tap, a held press, and a
//! two-finger spread, printing every recognized gesture. Time is a plain
//! millisecond counter — no clocks, no platform input.
//!
//! Run:
//! - `cargo run -p bracken_demos --example gesture_trace`

use bracken_geom::TargetLayout;
use bracken_gestures::{
    DragConfig, GestureEvent, GestureRegistry, LongPressConfig, PinchConfig, TapConfig,
};
use bracken_tracker::{PointerEvent, PointerSample};
use kurbo::{Point, Size, Vec2};

/// A single 400×300 panel sitting at (100, 50) in an unscrolled page.
struct Panel;

impl TargetLayout<&'static str> for Panel {
    fn offset(&self, _target: &&'static str) -> Vec2 {
        Vec2::new(100.0, 50.0)
    }

    fn offset_parent(&self, _target: &&'static str) -> Option<&'static str> {
        None
    }

    fn scroll(&self, _target: &&'static str) -> Vec2 {
        Vec2::ZERO
    }

    fn scroll_parent(&self, _target: &&'static str) -> Option<&'static str> {
        None
    }

    fn css_size(&self, _target: &&'static str) -> Size {
        Size::new(400.0, 300.0)
    }
}

fn show(raw: &PointerEvent, ev: &GestureEvent<&'static str>) {
    println!("[{}] {:?} (changed: {})", ev.target, ev.payload, raw.changed.len());
}

fn main() {
    let mut registry = GestureRegistry::new(Panel);
    registry.on_drag("panel", DragConfig::default(), show);
    registry.on_tap("panel", TapConfig::default(), show);
    registry.on_long_press("panel", LongPressConfig::default(), show);
    registry.on_pinch("panel", PinchConfig::default(), show);

    println!("-- quick press, small move, release: drag reports + a tap --");
    registry.pointer_down(&"panel", &PointerEvent::mouse_down(Point::new(150.0, 100.0)), 0);
    registry.pointer_move(&"panel", &PointerEvent::mouse_move(Point::new(160.0, 105.0)), 60);
    registry.pointer_up(&"panel", &PointerEvent::mouse_up(Point::new(160.0, 105.0)), 120);

    println!("-- press and hold: the long-press trigger comes from the timer --");
    registry.pointer_down(&"panel", &PointerEvent::mouse_down(Point::new(200.0, 150.0)), 1_000);
    while let Some(deadline) = registry.next_deadline() {
        // A host would sleep here; the script jumps straight to the deadline.
        registry.run_timers(deadline);
    }
    registry.pointer_up(&"panel", &PointerEvent::mouse_up(Point::new(200.0, 150.0)), 1_700);

    println!("-- two fingers spreading: pinch start, changes, end --");
    let fingers = |a: (f64, f64), b: (f64, f64)| {
        let samples = [
            PointerSample::new(1, Point::new(a.0, a.1)),
            PointerSample::new(2, Point::new(b.0, b.1)),
        ];
        PointerEvent::new(samples, samples)
    };
    registry.pointer_down(&"panel", &fingers((250.0, 200.0), (350.0, 200.0)), 2_000);
    registry.pointer_move(&"panel", &fingers((230.0, 200.0), (370.0, 200.0)), 2_040);
    registry.pointer_move(&"panel", &fingers((200.0, 200.0), (400.0, 200.0)), 2_080);
    registry.pointer_up(
        &"panel",
        &PointerEvent::new(
            [
                PointerSample::new(1, Point::new(200.0, 200.0)),
                PointerSample::new(2, Point::new(400.0, 200.0)),
            ],
            std::iter::empty(),
        ),
        2_120,
    );
}
