// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Tracker: per-target contact bookkeeping for gesture recognition.
//!
//! ## Overview
//!
//! Every gesture recognizer needs the same bookkeeping underneath: which
//! contacts are down on this target, where each started, where each is now,
//! and when the session as a whole begins and ends. This crate owns that
//! layer:
//!
//! - [`PointerEvent`]: the one normalized input shape — a list of *changed*
//!   contacts plus the *current full* live-contact list. The ingestion
//!   boundary (out of scope here) produces it from whatever the platform
//!   delivers; mice and touch screens look identical past this point.
//! - [`TouchRecord`]: per-contact state — start/current positions in
//!   normalized target space, the position-policy origin fixed at first
//!   contact, timestamps, and the pinch/rotate accumulators.
//! - [`PointerTracker`]: the Idle → Active → Idle session state machine:
//!   admits contacts up to a finger cap, reuses the slot of a lifted finger
//!   when a replacement lands mid-session, detects lifts from the live list
//!   (changed-list delivery is unreliable on some touch stacks), and freezes
//!   the participating-finger count when the last contact lifts.
//!
//! Recognizers each own a tracker; unrelated targets share nothing.
//!
//! ## Timestamps
//!
//! All timestamps are caller-supplied `u64` milliseconds. The tracker never
//! reads a clock, so tests drive sessions with any monotone sequence.
//!
//! ```
//! use bracken_geom::{BoundingBox, PositionPolicy};
//! use bracken_tracker::{PointerEvent, PointerTracker};
//! use kurbo::Point;
//!
//! let mut tracker = PointerTracker::new(PositionPolicy::Relative, None);
//! let bbox = BoundingBox::new(Point::ZERO, (100.0, 100.0).into());
//!
//! let down = PointerEvent::mouse_down(Point::new(10.0, 10.0));
//! assert!(tracker.begin(&down, 1_000, || bbox));
//! assert_eq!(tracker.fingers(), 1);
//!
//! let up = PointerEvent::mouse_up(Point::new(10.0, 10.0));
//! assert!(tracker.end(&up, |_, _| {}));
//! assert_eq!(tracker.fingers(), 0);
//! assert_eq!(tracker.gesture_fingers(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod event;
mod record;
mod tracker;

pub use event::{MOUSE_POINTER_ID, PointerEvent, PointerId, PointerSample};
pub use record::TouchRecord;
pub use tracker::PointerTracker;
