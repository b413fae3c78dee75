// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding box resolution: target rectangle, ancestor scroll, content scale.

use kurbo::{Point, Size, Vec2};

/// A target's on-screen rectangle at gesture-session start.
///
/// `x1`/`y1` are the cumulative offset of the target from the document
/// origin; `scroll_left`/`scroll_top` are the summed scroll of all scrollable
/// ancestors up to (not including) the scroll root; `scale_x`/`scale_y` let a
/// target's intrinsic size (e.g. a canvas drawing buffer) differ from its
/// displayed size.
///
/// A box is resolved once when the first contact lands, reused for the whole
/// session, and discarded when all contacts lift. Invariant: `x2 = x1 + width`
/// and `y2 = y1 + height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge in document space.
    pub x1: f64,
    /// Top edge in document space.
    pub y1: f64,
    /// Right edge (`x1 + width`).
    pub x2: f64,
    /// Bottom edge (`y1 + height`).
    pub y2: f64,
    /// Displayed width.
    pub width: f64,
    /// Displayed height.
    pub height: f64,
    /// Cumulative horizontal scroll of scrollable ancestors.
    pub scroll_left: f64,
    /// Cumulative vertical scroll of scrollable ancestors.
    pub scroll_top: f64,
    /// Intrinsic-to-displayed width ratio (1 when sizes agree).
    pub scale_x: f64,
    /// Intrinsic-to-displayed height ratio (1 when sizes agree).
    pub scale_y: f64,
}

impl BoundingBox {
    /// Create a box at `origin` with `size`, no ancestor scroll, unit scale.
    #[must_use]
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x1: origin.x,
            y1: origin.y,
            x2: origin.x + size.width,
            y2: origin.y + size.height,
            width: size.width,
            height: size.height,
            scroll_left: 0.0,
            scroll_top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Builder: set the cumulative ancestor scroll offset.
    #[must_use]
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll_left = scroll.x;
        self.scroll_top = scroll.y;
        self
    }

    /// Builder: set the content-to-screen scale factors.
    #[must_use]
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Convert a raw page point into target space given a fixed origin
    /// offset: `(raw + scroll − offset) * scale`, per axis.
    ///
    /// Every recognizer goes through this method; the offset comes from the
    /// contact's [`PositionPolicy`](crate::PositionPolicy) and is fixed when
    /// the contact is first tracked.
    #[must_use]
    pub fn to_local(&self, raw: Point, offset: Vec2) -> Point {
        Point::new(
            (raw.x + self.scroll_left - offset.x) * self.scale_x,
            (raw.y + self.scroll_top - offset.y) * self.scale_y,
        )
    }

    /// Whether a target-local point lies strictly inside the box.
    ///
    /// Bounds are exclusive: a point exactly on an edge is outside, matching
    /// the containment check recognizers use to cancel on exit.
    #[must_use]
    pub fn contains_local(&self, p: Point) -> bool {
        p.x > 0.0 && p.x < self.width && p.y > 0.0 && p.y < self.height
    }
}

/// Layout facts the resolver reads from the host.
///
/// `K` identifies a target in whatever scene the host keeps. The resolver
/// walks two chains: the *offset* chain (positioned ancestors) to find where
/// the target sits in document space, and the *scroll* chain (scrollable
/// ancestors) to find how far its content has been scrolled. The two chains
/// are distinct; an ancestor can appear in one and not the other.
pub trait TargetLayout<K> {
    /// Offset of `target` from its offset parent.
    fn offset(&self, target: &K) -> Vec2;

    /// Next node in the offset chain, or `None` at the document root.
    fn offset_parent(&self, target: &K) -> Option<K>;

    /// The node's own scroll offset.
    fn scroll(&self, target: &K) -> Vec2;

    /// Next scrollable ancestor, or `None` at the scroll root. The root's
    /// own scroll is not accumulated.
    fn scroll_parent(&self, target: &K) -> Option<K>;

    /// Displayed size of the node.
    fn css_size(&self, target: &K) -> Size;

    /// Intrinsic content size, when it differs from the displayed size
    /// (canvas drawing-buffer style). `None` means unit scale.
    fn native_size(&self, _target: &K) -> Option<Size> {
        None
    }
}

/// Resolve a target's [`BoundingBox`] by walking its layout chains.
///
/// Sums [`TargetLayout::offset`] over the offset chain (the target
/// included), sums [`TargetLayout::scroll`] from the target's scroll parent
/// up to the scroll root, and derives the scale factors from the ratio of
/// intrinsic to displayed size (unit scale when there is no intrinsic size
/// or the displayed axis is zero).
///
/// A target that is not part of the host's layout is a caller precondition
/// violation; the resolver does not detect it.
pub fn resolve<K: Clone, L: TargetLayout<K>>(target: &K, layout: &L) -> BoundingBox {
    let size = layout.css_size(target);

    let mut origin = Vec2::ZERO;
    let mut node = Some(target.clone());
    while let Some(n) = node {
        origin += layout.offset(&n);
        node = layout.offset_parent(&n);
    }

    let mut scroll = Vec2::ZERO;
    let mut node = layout.scroll_parent(target);
    while let Some(n) = node {
        scroll += layout.scroll(&n);
        node = layout.scroll_parent(&n);
    }

    let (scale_x, scale_y) = match layout.native_size(target) {
        Some(native) => (
            if size.width != 0.0 { native.width / size.width } else { 1.0 },
            if size.height != 0.0 { native.height / size.height } else { 1.0 },
        ),
        None => (1.0, 1.0),
    };

    BoundingBox::new(origin.to_point(), size)
        .with_scroll(scroll)
        .with_scale(scale_x, scale_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three nested nodes: 0 is the scroll root, 1 a scrolled panel, 2 the
    /// target. Offsets chain 2 → 1 → 0.
    struct Nested;

    impl TargetLayout<u32> for Nested {
        fn offset(&self, target: &u32) -> Vec2 {
            match target {
                2 => Vec2::new(10.0, 20.0),
                1 => Vec2::new(5.0, 5.0),
                _ => Vec2::ZERO,
            }
        }

        fn offset_parent(&self, target: &u32) -> Option<u32> {
            match target {
                2 => Some(1),
                1 => Some(0),
                _ => None,
            }
        }

        fn scroll(&self, target: &u32) -> Vec2 {
            match target {
                1 => Vec2::new(0.0, 30.0),
                _ => Vec2::ZERO,
            }
        }

        fn scroll_parent(&self, target: &u32) -> Option<u32> {
            match target {
                2 => Some(1),
                _ => None,
            }
        }

        fn css_size(&self, target: &u32) -> Size {
            match target {
                2 => Size::new(100.0, 80.0),
                _ => Size::new(400.0, 400.0),
            }
        }

        fn native_size(&self, target: &u32) -> Option<Size> {
            (*target == 2).then_some(Size::new(200.0, 80.0))
        }
    }

    #[test]
    fn resolve_sums_offset_chain() {
        let bbox = resolve(&2, &Nested);
        assert_eq!(bbox.x1, 15.0);
        assert_eq!(bbox.y1, 25.0);
        assert_eq!(bbox.x2, bbox.x1 + bbox.width);
        assert_eq!(bbox.y2, bbox.y1 + bbox.height);
    }

    #[test]
    fn resolve_sums_scroll_up_to_root_exclusive() {
        let bbox = resolve(&2, &Nested);
        // Node 1's scroll is counted; the root's own scroll is not.
        assert_eq!(bbox.scroll_left, 0.0);
        assert_eq!(bbox.scroll_top, 30.0);
    }

    #[test]
    fn resolve_derives_scale_from_native_size() {
        let bbox = resolve(&2, &Nested);
        assert_eq!(bbox.scale_x, 2.0);
        assert_eq!(bbox.scale_y, 1.0);
        // A node without an intrinsic size gets unit scale.
        let root = resolve(&0, &Nested);
        assert_eq!((root.scale_x, root.scale_y), (1.0, 1.0));
    }

    #[test]
    fn to_local_applies_scroll_offset_and_scale() {
        let bbox = BoundingBox::new(Point::new(15.0, 25.0), Size::new(100.0, 80.0))
            .with_scroll(Vec2::new(0.0, 30.0))
            .with_scale(2.0, 1.0);
        let local = bbox.to_local(Point::new(20.0, 30.0), Vec2::new(15.0, 25.0));
        assert_eq!(local, Point::new(10.0, 35.0));
    }

    #[test]
    fn contains_local_bounds_are_exclusive() {
        let bbox = BoundingBox::new(Point::ZERO, Size::new(100.0, 50.0));
        assert!(bbox.contains_local(Point::new(1.0, 1.0)));
        assert!(bbox.contains_local(Point::new(99.0, 49.0)));
        assert!(!bbox.contains_local(Point::new(0.0, 25.0)));
        assert!(!bbox.contains_local(Point::new(100.0, 25.0)));
        assert!(!bbox.contains_local(Point::new(50.0, 50.0)));
        assert!(!bbox.contains_local(Point::new(-1.0, 25.0)));
    }
}
