// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Geom: target-space geometry for pointer input.
//!
//! ## Overview
//!
//! Gesture math only works when every recognizer agrees on what a coordinate
//! means. This crate owns that agreement:
//!
//! - [`BoundingBox`]: a target's on-screen rectangle plus the cumulative
//!   ancestor scroll offset and the content-to-screen scale factor, captured
//!   once when a gesture session starts.
//! - [`TargetLayout`]: the trait through which the resolver reads layout
//!   facts (offsets, scroll, sizes) from the host. The engine never touches a
//!   widget tree directly; hosts implement this for whatever scene they have.
//! - [`resolve`]: walks the offset and scroll chains to build a
//!   [`BoundingBox`] for a target.
//! - [`PositionPolicy`]: the four coordinate-origin policies a recognizer can
//!   be configured with, and [`normalize`], the one formula every recognizer
//!   must use to convert a raw page point into target-local space.
//!
//! ## The one formula
//!
//! `local = (raw + scroll − origin) * scale`, per axis. Recognizers that
//! derive coordinates any other way drift apart from each other; keeping the
//! formula in one place is the point of this crate.
//!
//! ```
//! use bracken_geom::{BoundingBox, PositionPolicy, normalize};
//! use kurbo::Point;
//!
//! let bbox = BoundingBox::new(Point::new(100.0, 50.0), (200.0, 100.0).into());
//! let local = normalize(Point::new(110.0, 60.0), &bbox, PositionPolicy::Relative);
//! assert_eq!(local, Point::new(10.0, 10.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod bbox;
mod policy;

pub use bbox::{BoundingBox, TargetLayout, resolve};
pub use policy::{PositionPolicy, normalize};
