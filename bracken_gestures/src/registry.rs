// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The listener registry: explicit target → subscription ownership.
//!
//! ## Overview
//!
//! Recognizers compute; the registry owns and forwards. It keeps an explicit
//! `target → (key → subscription)` map — no flags stitched onto target
//! objects, no hidden per-target globals — resolves bounding boxes through
//! the host's [`TargetLayout`], fans each incoming [`PointerEvent`] out to
//! every recognizer attached to the event's target, and calls listener
//! callbacks with a `(raw event, gesture)` pair.
//!
//! Several recognizers can watch one target simultaneously; each owns its
//! own session state, so a `drag` listener and a `tap` listener on the same
//! surface never interfere.
//!
//! ## Timers
//!
//! The host drives time explicitly: [`GestureRegistry::next_deadline`] says
//! how long it may sleep, [`GestureRegistry::run_timers`] fires whatever
//! came due. Long-press emissions triggered by a timer replay the retained
//! session-opening event as the raw-event argument.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::fmt;
use core::hash::Hash;

use bracken_geom::{TargetLayout, resolve};
use bracken_tracker::PointerEvent;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::click::{Click, ClickConfig, ClickEvent};
use crate::double::{DoubleTap, DoubleTapConfig, DoubleTapEvent};
use crate::drag::{Drag, DragConfig, DragEvent};
use crate::pinch::{Pinch, PinchConfig, PinchEvent};
use crate::press::{LongPressConfig, Press, PressEvent, TapConfig};
use crate::swipe::{Swipe, SwipeConfig, SwipeEvent};

/// Handle for one registered listener; returned by the `on_*` methods and
/// accepted by [`GestureRegistry::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerKey(u64);

/// A recognized gesture, without its target.
#[derive(Clone, Debug, PartialEq)]
pub enum GesturePayload {
    /// From a click listener.
    Click(ClickEvent),
    /// From a double-tap listener.
    DoubleTap(DoubleTapEvent),
    /// From a drag listener.
    Drag(DragEvent),
    /// From a swipe listener.
    Swipe(SwipeEvent),
    /// From a pinch/rotate listener.
    Pinch(PinchEvent),
    /// From a tap or long-press listener.
    Press(PressEvent),
}

/// The payload delivered to listeners: which target, which gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent<K> {
    /// The target the listener was registered on.
    pub target: K,
    /// The recognized gesture.
    pub payload: GesturePayload,
}

type Listener<K> = Box<dyn FnMut(&PointerEvent, &GestureEvent<K>)>;

#[derive(Debug)]
enum Recognizer {
    Click(Click),
    DoubleTap(DoubleTap),
    Drag(Drag),
    Swipe(Swipe),
    Pinch(Pinch),
    Press(Press),
}

struct Subscription<K> {
    recognizer: Recognizer,
    listener: Listener<K>,
}

/// Owner of every gesture listener, keyed by target.
///
/// `K` is the host's target handle (a widget id, a node key); `L` supplies
/// layout facts for bounding-box resolution. Events arrive pre-routed — the
/// host knows which target an input event belongs to — and are fanned out to
/// that target's subscriptions in registration order.
pub struct GestureRegistry<K, L> {
    layout: L,
    subscriptions: HashMap<K, BTreeMap<ListenerKey, Subscription<K>>>,
    owners: BTreeMap<ListenerKey, K>,
    next_key: u64,
}

impl<K: fmt::Debug, L> fmt::Debug for GestureRegistry<K, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRegistry")
            .field("targets", &self.subscriptions.len())
            .field("listeners", &self.owners.len())
            .finish_non_exhaustive()
    }
}

impl<K, L> GestureRegistry<K, L>
where
    K: Clone + Eq + Hash,
    L: TargetLayout<K>,
{
    /// Create a registry reading layout facts from `layout`.
    #[must_use]
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            subscriptions: HashMap::new(),
            owners: BTreeMap::new(),
            next_key: 0,
        }
    }

    /// The layout source.
    #[must_use]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Attach a click listener to `target`.
    pub fn on_click(
        &mut self,
        target: K,
        config: ClickConfig,
        listener: impl FnMut(&PointerEvent, &GestureEvent<K>) + 'static,
    ) -> ListenerKey {
        self.subscribe(target, Recognizer::Click(Click::new(config)), Box::new(listener))
    }

    /// Attach a double-tap listener to `target`.
    pub fn on_double_tap(
        &mut self,
        target: K,
        config: DoubleTapConfig,
        listener: impl FnMut(&PointerEvent, &GestureEvent<K>) + 'static,
    ) -> ListenerKey {
        self.subscribe(
            target,
            Recognizer::DoubleTap(DoubleTap::new(config)),
            Box::new(listener),
        )
    }

    /// Attach a drag listener to `target`.
    pub fn on_drag(
        &mut self,
        target: K,
        config: DragConfig,
        listener: impl FnMut(&PointerEvent, &GestureEvent<K>) + 'static,
    ) -> ListenerKey {
        self.subscribe(target, Recognizer::Drag(Drag::new(config)), Box::new(listener))
    }

    /// Attach a swipe listener to `target`.
    pub fn on_swipe(
        &mut self,
        target: K,
        config: SwipeConfig,
        listener: impl FnMut(&PointerEvent, &GestureEvent<K>) + 'static,
    ) -> ListenerKey {
        self.subscribe(target, Recognizer::Swipe(Swipe::new(config)), Box::new(listener))
    }

    /// Attach a pinch/rotate listener to `target`.
    pub fn on_pinch(
        &mut self,
        target: K,
        config: PinchConfig,
        listener: impl FnMut(&PointerEvent, &GestureEvent<K>) + 'static,
    ) -> ListenerKey {
        self.subscribe(target, Recognizer::Pinch(Pinch::new(config)), Box::new(listener))
    }

    /// Attach a tap listener to `target`.
    pub fn on_tap(
        &mut self,
        target: K,
        config: TapConfig,
        listener: impl FnMut(&PointerEvent, &GestureEvent<K>) + 'static,
    ) -> ListenerKey {
        self.subscribe(target, Recognizer::Press(Press::tap(config)), Box::new(listener))
    }

    /// Attach a long-press listener to `target`.
    pub fn on_long_press(
        &mut self,
        target: K,
        config: LongPressConfig,
        listener: impl FnMut(&PointerEvent, &GestureEvent<K>) + 'static,
    ) -> ListenerKey {
        self.subscribe(
            target,
            Recognizer::Press(Press::long_press(config)),
            Box::new(listener),
        )
    }

    /// Detach a listener and drop its recognizer state. Returns whether the
    /// key was registered. Removing the last listener for a target clears
    /// the target's entry entirely; nothing is retained.
    pub fn remove(&mut self, key: ListenerKey) -> bool {
        let Some(target) = self.owners.remove(&key) else {
            return false;
        };
        if let Some(subs) = self.subscriptions.get_mut(&target) {
            subs.remove(&key);
            if subs.is_empty() {
                self.subscriptions.remove(&target);
            }
        }
        true
    }

    /// Number of registered listeners, across all targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Mutable access to a drag recognizer, for
    /// [`Drag::enable`]/[`Drag::disable`].
    pub fn drag_mut(&mut self, key: ListenerKey) -> Option<&mut Drag> {
        let target = self.owners.get(&key)?;
        let sub = self.subscriptions.get_mut(target)?.get_mut(&key)?;
        match &mut sub.recognizer {
            Recognizer::Drag(drag) => Some(drag),
            _ => None,
        }
    }

    /// Fan a press event out to `target`'s subscriptions.
    pub fn pointer_down(&mut self, target: &K, event: &PointerEvent, now: u64) {
        let layout = &self.layout;
        let Some(subs) = self.subscriptions.get_mut(target) else {
            return;
        };
        for sub in subs.values_mut() {
            let mut out: SmallVec<[GesturePayload; 2]> = SmallVec::new();
            match &mut sub.recognizer {
                Recognizer::Click(r) => r.on_down(event, now, || resolve(target, layout)),
                Recognizer::DoubleTap(r) => r.on_down(event, now, || resolve(target, layout)),
                Recognizer::Drag(r) => out.extend(
                    r.on_down(event, now, || resolve(target, layout))
                        .into_iter()
                        .map(GesturePayload::Drag),
                ),
                Recognizer::Swipe(r) => r.on_down(event, now, || resolve(target, layout)),
                Recognizer::Pinch(r) => {
                    out.extend(
                        r.on_down(event, now, || resolve(target, layout))
                            .map(GesturePayload::Pinch),
                    );
                }
                Recognizer::Press(r) => r.on_down(event, now, || resolve(target, layout)),
            }
            deliver(&mut sub.listener, target, event, out);
        }
    }

    /// Fan a movement event out to `target`'s subscriptions.
    pub fn pointer_move(&mut self, target: &K, event: &PointerEvent, now: u64) {
        let Some(subs) = self.subscriptions.get_mut(target) else {
            return;
        };
        for sub in subs.values_mut() {
            let mut out: SmallVec<[GesturePayload; 2]> = SmallVec::new();
            match &mut sub.recognizer {
                Recognizer::Click(r) => r.on_move(event),
                Recognizer::DoubleTap(r) => r.on_move(event),
                Recognizer::Drag(r) => {
                    out.extend(r.on_move(event, now).into_iter().map(GesturePayload::Drag));
                }
                Recognizer::Swipe(r) => r.on_move(event, now),
                Recognizer::Pinch(r) => {
                    out.extend(r.on_move(event, now).map(GesturePayload::Pinch));
                }
                Recognizer::Press(r) => r.on_move(event),
            }
            deliver(&mut sub.listener, target, event, out);
        }
    }

    /// Fan a release event out to `target`'s subscriptions.
    pub fn pointer_up(&mut self, target: &K, event: &PointerEvent, now: u64) {
        let layout = &self.layout;
        let Some(subs) = self.subscriptions.get_mut(target) else {
            return;
        };
        for sub in subs.values_mut() {
            let mut out: SmallVec<[GesturePayload; 2]> = SmallVec::new();
            match &mut sub.recognizer {
                Recognizer::Click(r) => {
                    out.extend(
                        r.on_up(event, || resolve(target, layout))
                            .map(GesturePayload::Click),
                    );
                }
                Recognizer::DoubleTap(r) => {
                    out.extend(r.on_up(event).map(GesturePayload::DoubleTap));
                }
                Recognizer::Drag(r) => {
                    out.extend(r.on_up(event).into_iter().map(GesturePayload::Drag));
                }
                Recognizer::Swipe(r) => out.extend(r.on_up(event).map(GesturePayload::Swipe)),
                Recognizer::Pinch(r) => out.extend(r.on_up(event).map(GesturePayload::Pinch)),
                Recognizer::Press(r) => out.extend(r.on_up(event, now).map(GesturePayload::Press)),
            }
            deliver(&mut sub.listener, target, event, out);
        }
    }

    /// Fire every timer that came due. Timer-driven gestures are reported
    /// against the event that opened their session.
    pub fn run_timers(&mut self, now: u64) {
        for (target, subs) in self.subscriptions.iter_mut() {
            for sub in subs.values_mut() {
                let fired = match &mut sub.recognizer {
                    Recognizer::DoubleTap(r) => {
                        r.on_time(now);
                        None
                    }
                    Recognizer::Press(r) => r
                        .on_time(now)
                        .map(|ev| (ev, r.opening_event().cloned().unwrap_or_default())),
                    _ => None,
                };
                if let Some((ev, raw)) = fired {
                    (sub.listener)(
                        &raw,
                        &GestureEvent {
                            target: target.clone(),
                            payload: GesturePayload::Press(ev),
                        },
                    );
                }
            }
        }
    }

    /// Earliest pending deadline across every subscription, for the host's
    /// wait-until loop.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.subscriptions
            .values()
            .flat_map(|subs| subs.values())
            .filter_map(|sub| match &sub.recognizer {
                Recognizer::DoubleTap(r) => r.next_deadline(),
                Recognizer::Press(r) => r.next_deadline(),
                _ => None,
            })
            .min()
    }

    fn subscribe(&mut self, target: K, recognizer: Recognizer, listener: Listener<K>) -> ListenerKey {
        self.next_key += 1;
        let key = ListenerKey(self.next_key);
        self.owners.insert(key, target.clone());
        self.subscriptions
            .entry(target)
            .or_default()
            .insert(key, Subscription { recognizer, listener });
        key
    }
}

fn deliver<K: Clone>(
    listener: &mut Listener<K>,
    target: &K,
    event: &PointerEvent,
    out: SmallVec<[GesturePayload; 2]>,
) {
    for payload in out {
        (listener)(
            event,
            &GestureEvent {
                target: target.clone(),
                payload,
            },
        );
    }
}
