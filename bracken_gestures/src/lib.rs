// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Gestures: recognizers that turn tracked contacts into gesture
//! notifications.
//!
//! ## Overview
//!
//! Each recognizer is an independent state machine over the shared
//! [`PointerTracker`](bracken_tracker::PointerTracker) session shape
//! (Idle → Active → Idle). Feed it the normalized
//! [`PointerEvent`](bracken_tracker::PointerEvent)s for its target plus
//! caller-millisecond timestamps; it hands back recognized gestures as
//! values. Several recognizers can watch the same target at once — a surface
//! can have both `drag` and `tap` listeners live — because each owns its own
//! session bookkeeping.
//!
//! - [`Click`]: press and release inside the target, guarded against
//!   press-scroll-release sequences.
//! - [`DoubleTap`]: two presses inside a time window and drift tolerance.
//! - [`Drag`]: unfiltered per-contact movement reports with a configurable
//!   coordinate origin.
//! - [`Swipe`]: direction + velocity at release, snapped to an angle step.
//! - [`Pinch`]: multi-contact scale and unwrapped rotation about the
//!   centroid.
//! - [`Press`]: tap and long-press, selected by configuration.
//!
//! Recognition never guesses: fingers disagreeing on swipe direction, drift
//! past tolerance, leaving the target, or a page scroll between press and
//! release all abandon the gesture silently.
//!
//! ## Registry
//!
//! [`GestureRegistry`] is the optional ownership layer: an explicit
//! target → subscription map that fans incoming events out to every
//! recognizer attached to a target, resolves bounding boxes through a
//! [`TargetLayout`](bracken_geom::TargetLayout), runs the pending timers,
//! and invokes listener callbacks with a `(raw event, gesture)` pair.
//! Recognizers are equally usable on their own, which is how the unit tests
//! drive them.
//!
//! ## Example: a tap, start to finish
//!
//! ```
//! use bracken_gestures::{Press, PressEvent, TapConfig};
//! use bracken_geom::BoundingBox;
//! use bracken_tracker::PointerEvent;
//! use kurbo::Point;
//!
//! let bbox = BoundingBox::new(Point::ZERO, (100.0, 100.0).into());
//! let mut tap = Press::tap(TapConfig::default());
//!
//! tap.on_down(&PointerEvent::mouse_down(Point::new(40.0, 40.0)), 1_000, || bbox);
//! let got = tap.on_up(&PointerEvent::mouse_up(Point::new(42.0, 41.0)), 1_150);
//! assert_eq!(got, Some(PressEvent::Tap { fingers: 1 }));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod click;
mod double;
mod drag;
mod pinch;
mod press;
mod registry;
mod swipe;

pub use click::{Click, ClickConfig, ClickEvent};
pub use double::{DoubleTap, DoubleTapConfig, DoubleTapEvent};
pub use drag::{Drag, DragConfig, DragEvent, DragParts, DragPhase};
pub use pinch::{Pinch, PinchConfig, PinchEvent, PinchPhase};
pub use press::{LongPressConfig, Press, PressEvent, TapConfig};
pub use registry::{GestureEvent, GesturePayload, GestureRegistry, ListenerKey};
pub use swipe::{Swipe, SwipeConfig, SwipeEvent};

/// How far a contact may wander from its start, per axis, before tap,
/// long-press, and double-tap give up on it.
///
/// Target-local pixels. Large enough to absorb finger jitter, small enough
/// that an intentional drag never reads as a tap.
pub const DRIFT_TOLERANCE: f64 = 25.0;

/// Maximum disagreement, in degrees, between per-finger swipe directions
/// before the gesture is treated as ambiguous and dropped.
pub const DIRECTION_TOLERANCE: f64 = 20.0;
