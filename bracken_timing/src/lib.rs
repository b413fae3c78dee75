// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Timing: a cancelable, single-shot deadline registry.
//!
//! ## Overview
//!
//! Gesture recognizers need delayed callbacks — a long-press trigger, a tap
//! timeout, a double-tap window — but they must stay deterministic and
//! testable, so this crate holds no clock and runs no callbacks. Instead,
//! [`Timers`] records deadlines against logical timer keys and the host
//! drives it:
//!
//! 1. A recognizer calls [`Timers::schedule`] with the current time and a
//!    delay. Scheduling a key that is already pending replaces its deadline;
//!    there is never more than one shot in flight per logical timer.
//! 2. The host asks [`Timers::next_deadline`] how long it may sleep.
//! 3. When time passes, the host calls [`Timers::expire`] and hands the
//!    returned keys back to whoever scheduled them.
//!
//! Timestamps are caller-supplied milliseconds. Nothing here interprets
//! them beyond ordering and addition, so tests can feed any monotone
//! sequence they like.
//!
//! ```
//! use bracken_timing::Timers;
//!
//! let mut timers = Timers::new();
//! timers.schedule("longpress", 1_000, 500);
//! timers.schedule("tap", 1_000, 250);
//!
//! assert_eq!(timers.next_deadline(), Some(1_250));
//! assert_eq!(timers.expire(1_300), vec!["tap"]);
//! assert!(timers.cancel(&"longpress"));
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Single-shot, cancelable deadlines keyed by a logical timer id.
///
/// `K` names a *logical* timer — "the long-press trigger", "the double-tap
/// window" — not an individual shot. Re-scheduling a key silently replaces
/// any pending shot for it, which is exactly the clear-then-set dance the
/// ad hoc timeout pairs this replaces used to do by hand.
#[derive(Clone, Debug, Default)]
pub struct Timers<K> {
    deadlines: BTreeMap<K, u64>,
}

impl<K: Ord + Clone> Timers<K> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deadlines: BTreeMap::new(),
        }
    }

    /// Schedule `key` to expire at `now + delay`, replacing any pending
    /// deadline for the same key.
    pub fn schedule(&mut self, key: K, now: u64, delay: u64) {
        self.deadlines.insert(key, now.saturating_add(delay));
    }

    /// Cancel a pending timer. Returns whether one was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.deadlines.remove(key).is_some()
    }

    /// Whether `key` has a pending shot.
    #[must_use]
    pub fn is_scheduled(&self, key: &K) -> bool {
        self.deadlines.contains_key(key)
    }

    /// The earliest pending deadline, if any. Hosts use this as a
    /// wait-until hint.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadlines.values().copied().min()
    }

    /// Remove and return every key whose deadline is at or before `now`,
    /// ordered by (deadline, key).
    ///
    /// Returns an empty vec when nothing is due; expiring is idempotent for
    /// a given `now`.
    pub fn expire(&mut self, now: u64) -> Vec<K> {
        let mut due: Vec<(u64, K)> = Vec::new();
        self.deadlines.retain(|key, deadline| {
            if *deadline <= now {
                due.push((*deadline, key.clone()));
                false
            } else {
                true
            }
        });
        due.sort();
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Drop all pending timers.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}
