// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-contact state tracked for the duration of a session.

use kurbo::{Point, Vec2};

/// State for one tracked contact.
///
/// Created when an identifier first appears, mutated on every move for that
/// identifier, and either removed when a replacement contact reuses the slot
/// or kept (flagged [`up`](Self::up)) until the session ends so the final
/// participating-finger count stays honest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchRecord {
    /// Position at first contact, in normalized target space.
    pub start: Point,
    /// Latest position, in normalized target space.
    pub current: Point,
    /// Latest raw page position; used to synthesize a final move when the
    /// contact lifts without a reliable platform event.
    pub page: Point,
    /// Origin offset chosen by the position policy, fixed at creation.
    pub offset: Vec2,
    /// When the contact landed (caller milliseconds).
    pub start_time: u64,
    /// When the contact last moved.
    pub move_time: u64,
    /// Accumulated unwrapped rotation, degrees. Pinch/rotate math.
    pub rotation: f64,
    /// Distance ratio to the session centroid. Pinch/rotate math.
    pub scale: f64,
    /// Distance from the centroid when first measured; fixed lazily on the
    /// first move tick of a pinch.
    pub start_distance: Option<f64>,
    /// Angle from the centroid when first measured, degrees.
    pub start_angle: Option<f64>,
    /// Current folded angle delta (unsigned, 0–180), this tick.
    pub fold: Option<f64>,
    /// Folded angle delta from the previous tick.
    pub fold_prev: Option<f64>,
    /// Whether this contact has logically ended but is retained for
    /// bookkeeping.
    pub up: bool,
}

impl TouchRecord {
    /// A fresh record for a contact landing at `local` (normalized) /
    /// `page` (raw), with its policy `offset` fixed.
    #[must_use]
    pub fn new(local: Point, offset: Vec2, page: Point, now: u64) -> Self {
        Self {
            start: local,
            current: local,
            page,
            offset,
            start_time: now,
            move_time: now,
            rotation: 0.0,
            scale: 1.0,
            start_distance: None,
            start_angle: None,
            fold: None,
            fold_prev: None,
            up: false,
        }
    }

    /// Record a move to `local` / `page` at time `now`.
    pub fn record_move(&mut self, local: Point, page: Point, now: u64) {
        self.current = local;
        self.page = page;
        self.move_time = now;
    }
}
