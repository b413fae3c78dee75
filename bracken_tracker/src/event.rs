// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The normalized pointer-event shape recognizers consume.

use kurbo::Point;
use smallvec::{SmallVec, smallvec};

/// Stable identifier for one contact over its lifetime.
///
/// Platforms that have no real identifier (single-pointer mice) use
/// [`MOUSE_POINTER_ID`], so single-pointer and multi-touch input share one
/// data structure.
pub type PointerId = u64;

/// The identifier substituted when the platform provides none.
pub const MOUSE_POINTER_ID: PointerId = 0;

/// One contact's position in raw page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Contact identifier.
    pub id: PointerId,
    /// Raw page position, pre-normalization.
    pub page: Point,
}

impl PointerSample {
    /// A sample for an identified contact.
    #[must_use]
    pub fn new(id: PointerId, page: Point) -> Self {
        Self { id, page }
    }

    /// A sample for the anonymous mouse pointer.
    #[must_use]
    pub fn mouse(page: Point) -> Self {
        Self::new(MOUSE_POINTER_ID, page)
    }
}

/// A normalized input event: the contacts that changed, plus the current
/// full live-contact list.
///
/// `changed` drives session start and movement; `live` drives end
/// detection, because changed-list delivery on release is unreliable on
/// some touch stacks — a tracked contact simply missing from `live` counts
/// as lifted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerEvent {
    /// Contacts that changed in this event.
    pub changed: SmallVec<[PointerSample; 2]>,
    /// All contacts currently down, after this event.
    pub live: SmallVec<[PointerSample; 2]>,
}

impl PointerEvent {
    /// Build an event from explicit changed and live lists.
    pub fn new(
        changed: impl IntoIterator<Item = PointerSample>,
        live: impl IntoIterator<Item = PointerSample>,
    ) -> Self {
        Self {
            changed: changed.into_iter().collect(),
            live: live.into_iter().collect(),
        }
    }

    /// Mouse press at `page`: one changed contact, one live contact.
    #[must_use]
    pub fn mouse_down(page: Point) -> Self {
        let s = PointerSample::mouse(page);
        Self {
            changed: smallvec![s],
            live: smallvec![s],
        }
    }

    /// Mouse move to `page` while pressed.
    #[must_use]
    pub fn mouse_move(page: Point) -> Self {
        Self::mouse_down(page)
    }

    /// Mouse release at `page`: one changed contact, empty live list.
    #[must_use]
    pub fn mouse_up(page: Point) -> Self {
        Self {
            changed: smallvec![PointerSample::mouse(page)],
            live: SmallVec::new(),
        }
    }

    /// Whether `id` appears in the live-contact list.
    #[must_use]
    pub fn is_live(&self, id: PointerId) -> bool {
        self.live.iter().any(|s| s.id == id)
    }
}
