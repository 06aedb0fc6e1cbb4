// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document-level listener registry.
//!
//! Components register listeners for the lifetime of a mount and must not leave anything
//! behind. [`EventHub::listen`] returns a [`ListenerGuard`] that unregisters on drop, and
//! dispatch re-checks registration before each call, so a listener removed by an earlier
//! listener in the same dispatch never runs.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use tether_events::{DocumentEvent, EventHub, EventKind, Outcome};
//!
//! let hub = Rc::new(EventHub::new());
//! let seen = Rc::new(Cell::new(0));
//! let guard = hub.listen(EventKind::ContextMenu, {
//!     let seen = seen.clone();
//!     move |e| {
//!         e.prevent_default();
//!         seen.set(seen.get() + 1);
//!         Outcome::Continue
//!     }
//! });
//!
//! assert!(hub.dispatch(&DocumentEvent::new(EventKind::ContextMenu, Point::ZERO)));
//! drop(guard);
//! assert!(!hub.dispatch(&DocumentEvent::new(EventKind::ContextMenu, Point::ZERO)));
//! assert_eq!(seen.get(), 1);
//! ```

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;

use crate::event::{DocumentEvent, EventKind, Outcome};

/// Identifier of a registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Handler = Rc<dyn Fn(&DocumentEvent) -> Outcome>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: HashMap<EventKind, Vec<(ListenerId, Handler)>>,
}

/// Registry of document-level listeners, keyed by event kind.
#[derive(Default)]
pub struct EventHub {
    inner: RefCell<HubInner>,
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let total: usize = inner.listeners.values().map(Vec::len).sum();
        f.debug_struct("EventHub")
            .field("kinds", &inner.listeners.len())
            .field("listeners", &total)
            .finish_non_exhaustive()
    }
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind` and return its identifier.
    ///
    /// Prefer [`EventHub::listen`], which ties the registration to a guard.
    pub fn add_listener(
        &self,
        kind: EventKind,
        handler: impl Fn(&DocumentEvent) -> Outcome + 'static,
    ) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner
            .listeners
            .entry(kind)
            .or_default()
            .push((id, Rc::new(handler)));
        tracing::trace!(%kind, ?id, "document listener added");
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(list) = inner.listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(l, _)| *l != id);
        let removed = list.len() != before;
        if list.is_empty() {
            inner.listeners.remove(&kind);
        }
        if removed {
            tracing::trace!(%kind, ?id, "document listener removed");
        }
        removed
    }

    /// Register `handler` for `kind` until the returned guard is dropped.
    pub fn listen(
        self: &Rc<Self>,
        kind: EventKind,
        handler: impl Fn(&DocumentEvent) -> Outcome + 'static,
    ) -> ListenerGuard {
        let id = self.add_listener(kind, handler);
        ListenerGuard {
            hub: Rc::downgrade(self),
            kind,
            id: Some(id),
        }
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.borrow().listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Number of listeners across all kinds.
    pub fn total_listeners(&self) -> usize {
        self.inner.borrow().listeners.values().map(Vec::len).sum()
    }

    fn is_registered(&self, kind: EventKind, id: ListenerId) -> bool {
        self.inner
            .borrow()
            .listeners
            .get(&kind)
            .is_some_and(|list| list.iter().any(|(l, _)| *l == id))
    }

    /// Deliver `event` to the listeners for its kind, in registration order.
    ///
    /// Listeners may add or remove listeners while running. Listeners added during this
    /// dispatch do not see the event; listeners removed during it are skipped.
    /// [`Outcome::Stop`] skips the remaining listeners.
    ///
    /// Returns whether any listener prevented the default action.
    pub fn dispatch(&self, event: &DocumentEvent) -> bool {
        let snapshot: Vec<(ListenerId, Handler)> = self
            .inner
            .borrow()
            .listeners
            .get(&event.kind)
            .cloned()
            .unwrap_or_default();
        for (id, handler) in snapshot {
            if !self.is_registered(event.kind, id) {
                continue;
            }
            if handler(event) == Outcome::Stop {
                break;
            }
        }
        event.default_prevented()
    }
}

/// Keeps a document listener registered; unregisters it on drop.
pub struct ListenerGuard {
    hub: Weak<EventHub>,
    kind: EventKind,
    id: Option<ListenerId>,
}

impl ListenerGuard {
    /// The event kind this guard listens to.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Unregister now. Idempotent.
    pub fn remove(&mut self) {
        if let Some(id) = self.id.take()
            && let Some(hub) = self.hub.upgrade()
        {
            hub.remove_listener(self.kind, id);
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.remove();
    }
}
