// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-click recognition.
//!
//! A click counts as "outside" only when the press both started and ended outside the
//! watched region. Presses that start inside (for example a drag out of a menu) never
//! close it. Each pointer is tracked independently.
//!
//! [`OutsideClick`] is the pure state machine; [`watch_outside_clicks`] wires it to an
//! [`EventHub`] for the lifetime of the returned [`OutsideClickWatch`].

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use core::cell::RefCell;

use tether_scene::NodeId;

use crate::event::{EventKind, Outcome, PointerId};
use crate::hub::{EventHub, ListenerGuard};

/// Per-pointer press tracking for outside-click recognition.
#[derive(Clone, Debug, Default)]
pub struct OutsideClick {
    /// Active presses per pointer: whether the press started outside.
    presses: BTreeMap<PointerId, bool>,
}

impl OutsideClick {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press; `outside` tells whether its target is outside the region.
    pub fn on_down(&mut self, pointer: PointerId, outside: bool) {
        self.presses.insert(pointer, outside);
    }

    /// Record a release. Returns `true` when this completes an outside click.
    pub fn on_up(&mut self, pointer: PointerId, outside: bool) -> bool {
        let started_outside = self.presses.remove(&pointer).unwrap_or(false);
        started_outside && outside
    }

    /// Forget the press of one pointer. Returns `true` if one was active.
    pub fn cancel(&mut self, pointer: PointerId) -> bool {
        self.presses.remove(&pointer).is_some()
    }

    /// Check if a pointer has an active press.
    pub fn is_pressed(&self, pointer: PointerId) -> bool {
        self.presses.contains_key(&pointer)
    }

    /// Forget all presses.
    pub fn clear(&mut self) {
        self.presses.clear();
    }
}

/// Live outside-click subscription; unsubscribes on drop.
#[derive(Debug)]
pub struct OutsideClickWatch {
    _down: ListenerGuard,
    _up: ListenerGuard,
}

/// Call `on_outside` for every outside click while `enabled()` holds.
///
/// `is_inside(target)` decides whether an event target belongs to the watched region.
/// Presses are only tracked while enabled, so a click that opened the region cannot also
/// close it.
pub fn watch_outside_clicks(
    hub: &Rc<EventHub>,
    is_inside: impl Fn(Option<NodeId>) -> bool + 'static,
    enabled: impl Fn() -> bool + 'static,
    on_outside: impl Fn() + 'static,
) -> OutsideClickWatch {
    let state = Rc::new(RefCell::new(OutsideClick::new()));
    let is_inside = Rc::new(is_inside);
    let enabled = Rc::new(enabled);

    let down = hub.listen(EventKind::PointerDown, {
        let state = state.clone();
        let is_inside = is_inside.clone();
        let enabled = enabled.clone();
        move |e| {
            if enabled() {
                state.borrow_mut().on_down(e.pointer, !is_inside(e.target));
            }
            Outcome::Continue
        }
    });
    let up = hub.listen(EventKind::PointerUp, move |e| {
        let outside_click = state.borrow_mut().on_up(e.pointer, !is_inside(e.target));
        if outside_click && enabled() {
            on_outside();
        }
        Outcome::Continue
    });
    OutsideClickWatch {
        _down: down,
        _up: up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DocumentEvent, PRIMARY_POINTER};
    use core::cell::Cell;
    use core::num::NonZeroU64;
    use kurbo::Point;

    #[test]
    fn press_must_start_and_end_outside() {
        let mut s = OutsideClick::new();
        s.on_down(PRIMARY_POINTER, true);
        assert!(s.on_up(PRIMARY_POINTER, true));

        s.on_down(PRIMARY_POINTER, false);
        assert!(!s.on_up(PRIMARY_POINTER, true));

        s.on_down(PRIMARY_POINTER, true);
        assert!(!s.on_up(PRIMARY_POINTER, false));

        assert!(!s.on_up(PRIMARY_POINTER, true), "release without press");
    }

    #[test]
    fn pointers_are_independent() {
        let mut s = OutsideClick::new();
        let p2 = NonZeroU64::new(2).unwrap();
        s.on_down(PRIMARY_POINTER, false);
        s.on_down(p2, true);
        assert!(s.is_pressed(p2));
        assert!(s.on_up(p2, true));
        assert!(!s.on_up(PRIMARY_POINTER, true));
        s.on_down(p2, true);
        assert!(s.cancel(p2));
        assert!(!s.on_up(p2, true));
    }

    #[test]
    fn watch_fires_only_while_enabled_and_until_dropped() {
        let hub = Rc::new(EventHub::new());
        let fired = Rc::new(Cell::new(0));
        let enabled = Rc::new(Cell::new(true));
        let inside = some_node();
        let watch = watch_outside_clicks(
            &hub,
            move |t| t == Some(inside),
            {
                let enabled = enabled.clone();
                move || enabled.get()
            },
            {
                let fired = fired.clone();
                move || fired.set(fired.get() + 1)
            },
        );
        let click = |target: Option<NodeId>| {
            hub.dispatch(&DocumentEvent::new(EventKind::PointerDown, Point::ZERO).with_target(target));
            hub.dispatch(&DocumentEvent::new(EventKind::PointerUp, Point::ZERO).with_target(target));
        };

        click(None);
        assert_eq!(fired.get(), 1);
        click(Some(inside));
        assert_eq!(fired.get(), 1);

        enabled.set(false);
        click(None);
        assert_eq!(fired.get(), 1);
        enabled.set(true);

        drop(watch);
        click(None);
        assert_eq!(fired.get(), 1);
        assert_eq!(hub.total_listeners(), 0);
    }

    fn some_node() -> NodeId {
        let mut doc = tether_scene::Document::new(kurbo::Size::new(10.0, 10.0));
        let body = doc.body();
        doc.insert(Some(body), tether_scene::Element::default())
    }
}
