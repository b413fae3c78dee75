// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate-origin policies for reported gesture coordinates.

use kurbo::{Point, Vec2};

use crate::BoundingBox;

/// Where a recognizer's reported coordinates are measured from.
///
/// The policy is sampled once per contact, when the contact is first
/// tracked; the resulting origin offset stays fixed for the contact's
/// lifetime even if the policy would now yield a different value (relevant
/// for [`Difference`](Self::Difference) and [`Move`](Self::Move), whose
/// origins depend on the first raw point).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionPolicy {
    /// Window-absolute coordinates; the origin is `(0, 0)`.
    Absolute,
    /// Target-local coordinates; the origin is the target's top-left corner.
    #[default]
    Relative,
    /// Delta from where the gesture started; the origin is the contact's
    /// first raw point.
    Difference,
    /// For gestures that reposition the target itself; the origin is the
    /// contact's first raw point relative to the target's corner, so the
    /// reported coordinate stays valid as the target moves under the
    /// pointer.
    Move,
}

impl PositionPolicy {
    /// The fixed origin offset for a contact first seen at `raw`.
    #[must_use]
    pub fn origin(self, raw: Point, bbox: &BoundingBox) -> Vec2 {
        match self {
            Self::Absolute => Vec2::ZERO,
            Self::Relative => Vec2::new(bbox.x1, bbox.y1),
            Self::Difference => raw.to_vec2(),
            Self::Move => raw.to_vec2() - Vec2::new(bbox.x1, bbox.y1),
        }
    }
}

/// Normalize a raw page point into the space selected by `policy`.
///
/// Shorthand for [`BoundingBox::to_local`] with the policy's origin computed
/// from `raw` itself; session code that needs the origin fixed at
/// gesture-start should call [`PositionPolicy::origin`] once and hold on to
/// the result instead.
#[must_use]
pub fn normalize(raw: Point, bbox: &BoundingBox, policy: PositionPolicy) -> Point {
    bbox.to_local(raw, policy.origin(raw, bbox))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn bbox() -> BoundingBox {
        BoundingBox::new(Point::new(40.0, 10.0), Size::new(200.0, 100.0))
            .with_scale(2.0, 2.0)
    }

    #[test]
    fn absolute_scales_raw_coordinates() {
        // With no ancestor scroll, absolute positioning is raw * scale.
        let p = normalize(Point::new(50.0, 20.0), &bbox(), PositionPolicy::Absolute);
        assert_eq!(p, Point::new(100.0, 40.0));
    }

    #[test]
    fn relative_measures_from_target_corner() {
        let p = normalize(Point::new(50.0, 20.0), &bbox(), PositionPolicy::Relative);
        assert_eq!(p, Point::new(20.0, 20.0));
    }

    #[test]
    fn difference_is_zero_at_gesture_start() {
        let p = normalize(Point::new(50.0, 20.0), &bbox(), PositionPolicy::Difference);
        assert_eq!(p, Point::ZERO);
    }

    #[test]
    fn move_origin_tracks_press_point_within_target() {
        // Pressed 10 px into the target: the origin is that interior offset,
        // so the normalized coordinate lands on the target's corner.
        let b = bbox();
        let origin = PositionPolicy::Move.origin(Point::new(50.0, 20.0), &b);
        assert_eq!(origin, Vec2::new(10.0, 10.0));
        let p = b.to_local(Point::new(50.0, 20.0), origin);
        assert_eq!(p, Point::new(80.0, 20.0));
    }

    #[test]
    fn scroll_is_added_before_the_origin_is_subtracted() {
        let b = BoundingBox::new(Point::new(40.0, 10.0), Size::new(200.0, 100.0))
            .with_scroll(Vec2::new(0.0, 15.0));
        let p = normalize(Point::new(50.0, 20.0), &b, PositionPolicy::Relative);
        assert_eq!(p, Point::new(10.0, 25.0));
    }
}
