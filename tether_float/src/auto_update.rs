// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auto-update subscriptions: keep a shown floating element's position current.
//!
//! [`AutoUpdate`] is the host seam: whatever observes scrolling, resizing and layout
//! shifts calls back into the controller through it. [`AutoUpdateHub`] is a complete
//! in-process implementation that fans host notifications out by [`UpdateCause`].

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use tether_geometry::{AutoUpdateOptions, UpdateCause};
use tether_scene::NodeId;

use crate::reference::Reference;

/// Callback invoked when a subscribed layout change happens.
pub type ChangeCallback = Rc<dyn Fn()>;

/// Source of layout-change notifications for one reference/floating pair.
pub trait AutoUpdate {
    /// Start observing `reference` and `floating`; call `on_change` on every accepted change
    /// until the returned subscription is dropped.
    fn subscribe(
        &self,
        reference: &Reference,
        floating: NodeId,
        on_change: ChangeCallback,
        options: AutoUpdateOptions,
    ) -> Subscription;
}

/// A live auto-update subscription. Unsubscribes on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// A subscription that runs `cancel` once when ended.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// End the subscription now. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Whether [`Subscription::unsubscribe`] has not run yet.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

struct Entry {
    id: u64,
    floating: NodeId,
    options: AutoUpdateOptions,
    on_change: ChangeCallback,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    entries: Vec<Entry>,
    subscribed_total: u64,
}

/// In-process [`AutoUpdate`] implementation driven by [`AutoUpdateHub::notify`].
#[derive(Default)]
pub struct AutoUpdateHub {
    state: Rc<RefCell<HubState>>,
}

impl fmt::Debug for AutoUpdateHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("AutoUpdateHub")
            .field("active", &s.entries.len())
            .field("subscribed_total", &s.subscribed_total)
            .finish_non_exhaustive()
    }
}

impl AutoUpdateHub {
    /// Create a hub with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a layout change. Returns how many subscriptions were notified.
    pub fn notify(&self, cause: UpdateCause) -> usize {
        let targets: Vec<(u64, ChangeCallback)> = self
            .state
            .borrow()
            .entries
            .iter()
            .filter(|e| e.options.accepts(cause))
            .map(|e| (e.id, e.on_change.clone()))
            .collect();
        let mut notified = 0;
        for (id, callback) in targets {
            if !self.is_live(id) {
                continue;
            }
            callback();
            notified += 1;
        }
        notified
    }

    /// Number of live subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Number of subscriptions ever made.
    pub fn subscribed_total(&self) -> u64 {
        self.state.borrow().subscribed_total
    }

    /// Whether a live subscription observes `floating`.
    pub fn is_observing(&self, floating: NodeId) -> bool {
        self.state
            .borrow()
            .entries
            .iter()
            .any(|e| e.floating == floating)
    }

    fn is_live(&self, id: u64) -> bool {
        self.state.borrow().entries.iter().any(|e| e.id == id)
    }
}

impl AutoUpdate for AutoUpdateHub {
    fn subscribe(
        &self,
        _reference: &Reference,
        floating: NodeId,
        on_change: ChangeCallback,
        options: AutoUpdateOptions,
    ) -> Subscription {
        let id = {
            let mut s = self.state.borrow_mut();
            s.next_id += 1;
            s.subscribed_total += 1;
            let id = s.next_id;
            s.entries.push(Entry {
                id,
                floating,
                options,
                on_change,
            });
            id
        };
        let state: Weak<RefCell<HubState>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().entries.retain(|e| e.id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use kurbo::{Point, Size};
    use tether_scene::{Document, Element};

    fn floating() -> NodeId {
        let mut doc = Document::new(Size::new(100.0, 100.0));
        let body = doc.body();
        doc.insert(Some(body), Element::default())
    }

    fn counter() -> (Rc<Cell<u32>>, ChangeCallback) {
        let hits = Rc::new(Cell::new(0));
        let cb: ChangeCallback = Rc::new({
            let hits = hits.clone();
            move || hits.set(hits.get() + 1)
        });
        (hits, cb)
    }

    #[test]
    fn notify_respects_options() {
        let hub = AutoUpdateHub::new();
        let (hits, cb) = counter();
        let reference = Reference::virtual_at(Point::ZERO);
        let _sub = hub.subscribe(&reference, floating(), cb, AutoUpdateOptions::default());
        assert_eq!(hub.notify(UpdateCause::AncestorScroll), 1);
        assert_eq!(hub.notify(UpdateCause::AnimationFrame), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn drop_and_unsubscribe_are_idempotent() {
        let hub = AutoUpdateHub::new();
        let (hits, cb) = counter();
        let reference = Reference::virtual_at(Point::ZERO);
        let mut sub = hub.subscribe(&reference, floating(), cb, AutoUpdateOptions::default());
        assert_eq!(hub.active_subscriptions(), 1);
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        drop(sub);
        assert_eq!(hub.active_subscriptions(), 0);
        assert_eq!(hub.notify(UpdateCause::LayoutShift), 0);
        assert_eq!(hits.get(), 0);
        assert_eq!(hub.subscribed_total(), 1);
    }

    #[test]
    fn subscription_ended_during_notify_is_skipped() {
        let hub = Rc::new(AutoUpdateHub::new());
        let reference = Reference::virtual_at(Point::ZERO);
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let _killer = hub.subscribe(
            &reference,
            floating(),
            Rc::new({
                let victim = victim.clone();
                move || drop(victim.borrow_mut().take())
            }),
            AutoUpdateOptions::default(),
        );
        let (hits, cb) = counter();
        *victim.borrow_mut() =
            Some(hub.subscribe(&reference, floating(), cb, AutoUpdateOptions::default()));
        assert_eq!(hub.notify(UpdateCause::ElementResize), 1);
        assert_eq!(hits.get(), 0);
    }
}
