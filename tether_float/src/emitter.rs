// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit observer lists for component events.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Identifier of a registered event listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(u64);

type Listener<E> = Rc<dyn Fn(&E)>;

struct Listeners<E> {
    next: u64,
    list: Vec<(ListenerKey, Listener<E>)>,
}

/// An observer list for events of type `E`.
///
/// Listeners may register or unregister listeners while an emission is in progress:
/// listeners added during an emission do not see it, listeners removed during it are
/// skipped.
pub struct Emitter<E> {
    inner: RefCell<Listeners<E>>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            inner: RefCell::new(Listeners {
                next: 0,
                list: Vec::new(),
            }),
        }
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.inner.borrow().list.len())
            .finish()
    }
}

impl<E> Emitter<E> {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`.
    pub fn on(&self, listener: impl Fn(&E) + 'static) -> ListenerKey {
        let mut inner = self.inner.borrow_mut();
        inner.next += 1;
        let key = ListenerKey(inner.next);
        inner.list.push((key, Rc::new(listener)));
        key
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn off(&self, key: ListenerKey) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.list.len();
        inner.list.retain(|(k, _)| *k != key);
        inner.list.len() != before
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.inner.borrow_mut().list.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().list.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every listener in registration order.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(ListenerKey, Listener<E>)> = self.inner.borrow().list.clone();
        for (key, listener) in snapshot {
            let live = self.inner.borrow().list.iter().any(|(k, _)| *k == key);
            if live {
                listener(event);
            }
        }
    }
}
