// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floating content that follows the mouse or the first touch.

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use smallvec::SmallVec;
use tether_events::{DocumentEvent, EventKind, ListenerGuard, Outcome};

use crate::context::ContextScope;
use crate::host::Host;
use crate::props::FloatCursorProps;
use crate::virtual_ref::{FloatVirtual, VirtualHandles, VirtualSlot};
use crate::vnode::{Props, VNode};

/// Id of the shared style element that hides the native cursor.
pub const CURSOR_STYLE_ID: &str = "headlesui-float-cursor-style";

/// Class on the root of every cursor follower.
pub const CURSOR_ROOT_CLASS: &str = "headlesui-float-cursor-root";

/// Contents of the shared cursor style element.
pub const CURSOR_STYLE_CSS: &str = "*, *::before, *::after {\n  cursor: none !important;\n}\n.headlesui-float-cursor-root {\n  pointer-events: none !important;\n}";

/// Cursor follower composition over [`FloatVirtual`].
///
/// On a touch-capable host, `touchstart`/`touchmove` open the content at the first touch
/// and `touchend` closes it. Otherwise `mouseenter`/`mousemove` open it at the pointer and
/// `mouseleave` closes it. With `global_hide_cursor`, the native cursor is hidden through
/// a style element shared by all mounted followers of the document.
#[derive(Debug)]
pub struct FloatCursor {
    inner: FloatVirtual,
    listeners: RefCell<SmallVec<[ListenerGuard; 3]>>,
    holds_style: Cell<bool>,
    host: Host,
}

fn follow(handles: &VirtualHandles) -> impl Fn(&DocumentEvent) -> Outcome + 'static {
    let handles = handles.clone();
    move |e| {
        handles.set_show(true);
        handles.move_to(e.primary_point());
        Outcome::Continue
    }
}

fn close(handles: &VirtualHandles) -> impl Fn(&DocumentEvent) -> Outcome + 'static {
    let handles = handles.clone();
    move |_| {
        handles.set_show(false);
        Outcome::Continue
    }
}

impl FloatCursor {
    /// Create the follower, register its document listeners, and take a hold on the
    /// cursor style when enabled.
    pub fn new(host: &Host, props: FloatCursorProps) -> Self {
        let mut float = props.float;
        float.portal = true;
        float.show = None;
        let events = host.events.clone();
        let touch = host.touch_capable;
        let mut listeners = SmallVec::new();
        let inner = FloatVirtual::new(host, float, |handles| {
            let kinds = if touch {
                [
                    (EventKind::TouchStart, true),
                    (EventKind::TouchEnd, false),
                    (EventKind::TouchMove, true),
                ]
            } else {
                [
                    (EventKind::MouseEnter, true),
                    (EventKind::MouseLeave, false),
                    (EventKind::MouseMove, true),
                ]
            };
            for (kind, opens) in kinds {
                let guard = if opens {
                    events.listen(kind, follow(handles))
                } else {
                    events.listen(kind, close(handles))
                };
                listeners.push(guard);
            }
        });
        if props.global_hide_cursor {
            host.document
                .borrow_mut()
                .acquire_style(CURSOR_STYLE_ID, CURSOR_STYLE_CSS);
            tracing::debug!("cursor style acquired");
        }
        Self {
            inner,
            listeners: RefCell::new(listeners),
            holds_style: Cell::new(props.global_hide_cursor),
            host: host.clone(),
        }
    }

    /// The underlying virtual composition.
    pub fn virtual_float(&self) -> &FloatVirtual {
        &self.inner
    }

    /// The scope an arrow inside the follower is created in.
    pub fn scope(&self) -> &ContextScope {
        self.inner.scope()
    }

    /// Render the follower; its root carries [`CURSOR_ROOT_CLASS`].
    pub fn render(&self, attrs: &Props, slot: impl FnOnce(&VirtualSlot) -> Vec<VNode>) -> VNode {
        let attrs = attrs.clone().with_class(CURSOR_ROOT_CLASS);
        self.inner.render_with_attrs(&attrs, slot)
    }

    /// Stop listening, release the cursor style, and tear down the controller.
    pub fn unmount(&self) {
        self.listeners.borrow_mut().clear();
        if self.holds_style.replace(false) {
            let removed = self.host.document.borrow_mut().release_style(CURSOR_STYLE_ID);
            if removed {
                tracing::debug!("cursor style removed");
            }
        }
        self.inner.unmount();
    }
}

impl Drop for FloatCursor {
    fn drop(&mut self) {
        self.unmount();
    }
}
