// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A menu that opens at the pointer on `contextmenu` and closes on an outside click.

use alloc::vec::Vec;
use core::cell::RefCell;

use tether_events::{EventKind, ListenerGuard, OutsideClickWatch, Outcome, watch_outside_clicks};

use crate::context::ContextScope;
use crate::host::Host;
use crate::props::FloatContextMenuProps;
use crate::virtual_ref::{FloatVirtual, VirtualSlot};
use crate::vnode::{Props, VNode};

/// Context menu composition over [`FloatVirtual`].
///
/// A `contextmenu` event anywhere in the document suppresses the host's own menu, moves
/// the reference to the event position and opens the menu. While open, a press that
/// starts and ends outside the menu closes it. The menu is always rendered through a
/// portal.
#[derive(Debug)]
pub struct FloatContextMenu {
    inner: FloatVirtual,
    listeners: RefCell<Option<(ListenerGuard, OutsideClickWatch)>>,
}

impl FloatContextMenu {
    /// Create the menu and start listening.
    pub fn new(host: &Host, props: FloatContextMenuProps) -> Self {
        let mut float = props.float;
        float.portal = true;
        float.show = None;
        let events = host.events.clone();
        let document = host.document.clone();
        let mut listeners = None;
        let inner = FloatVirtual::new(host, float, |handles| {
            let open = handles.clone();
            let contextmenu = events.listen(EventKind::ContextMenu, move |e| {
                e.prevent_default();
                open.move_to(e.position);
                open.set_show(true);
                Outcome::Continue
            });
            let inside = handles.clone();
            let enabled = handles.clone();
            let close = handles.clone();
            let outside = watch_outside_clicks(
                &events,
                move |target| {
                    let floating = inside.floating();
                    match (floating, target) {
                        (Some(f), Some(t)) => document.borrow().contains(f, t),
                        _ => false,
                    }
                },
                move || enabled.show(),
                move || close.set_show(false),
            );
            listeners = Some((contextmenu, outside));
        });
        Self {
            inner,
            listeners: RefCell::new(listeners),
        }
    }

    /// The underlying virtual composition.
    pub fn virtual_float(&self) -> &FloatVirtual {
        &self.inner
    }

    /// The scope an arrow inside the menu is created in.
    pub fn scope(&self) -> &ContextScope {
        self.inner.scope()
    }

    /// Render the menu.
    pub fn render(&self, attrs: &Props, slot: impl FnOnce(&VirtualSlot) -> Vec<VNode>) -> VNode {
        self.inner.render_with_attrs(attrs, slot)
    }

    /// Stop listening and tear down the controller.
    pub fn unmount(&self) {
        self.listeners.borrow_mut().take();
        self.inner.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrow::FloatArrow;
    use crate::props::{FloatArrowProps, FloatProps, RenderAs, Toggle};
    use crate::vnode::{ElementNode, mount};
    use alloc::vec;
    use kurbo::{Point, Rect, Size};
    use tether_events::DocumentEvent;
    use tether_geometry::Side;
    use tether_scene::Element;

    fn menu() -> VNode {
        ElementNode::new("ul")
            .bounds(Rect::new(0.0, 0.0, 100.0, 60.0))
            .into()
    }

    #[test]
    fn contextmenu_opens_at_pointer_and_outside_click_closes() {
        let host = Host::new(Size::new(800.0, 600.0));
        let outside = {
            let mut doc = host.document.borrow_mut();
            let body = doc.body();
            doc.insert(
                Some(body),
                Element::new("main").with_bounds(Rect::new(0.0, 0.0, 800.0, 600.0)),
            )
        };
        let cm = FloatContextMenu::new(&host, FloatContextMenuProps::default());
        let controller = cm.virtual_float().controller().clone();
        assert!(!controller.is_requested());

        let event = DocumentEvent::new(EventKind::ContextMenu, Point::new(200.0, 150.0));
        assert!(host.events.dispatch(&event), "native menu suppressed");
        assert!(controller.is_requested());

        let tree = cm.render(&Props::new(), |_| vec![menu()]);
        assert!(tree.has_portal());
        let body = host.document.borrow().body();
        let _m = mount(&tree, &host, body);
        host.scheduler.run_animation_frame();
        assert_eq!(controller.coords(), Some(Point::new(200.0, 150.0)));

        let floating = controller.floating().unwrap();
        host.events.dispatch(
            &DocumentEvent::new(EventKind::PointerDown, Point::ZERO).with_target(Some(floating)),
        );
        host.events
            .dispatch(&DocumentEvent::new(EventKind::PointerUp, Point::ZERO).with_target(Some(floating)));
        assert!(controller.is_requested(), "click inside keeps it open");

        host.events.dispatch(
            &DocumentEvent::new(EventKind::PointerDown, Point::ZERO).with_target(Some(outside)),
        );
        host.events
            .dispatch(&DocumentEvent::new(EventKind::PointerUp, Point::ZERO).with_target(Some(outside)));
        assert!(!controller.is_requested());
    }

    #[test]
    fn arrow_inside_the_menu_follows_the_placement() {
        let host = Host::new(Size::new(800.0, 600.0));
        let cm = FloatContextMenu::new(
            &host,
            FloatContextMenuProps {
                float: FloatProps {
                    arrow: Toggle::On,
                    flip: Toggle::On,
                    ..FloatProps::default()
                },
            },
        );
        let arrow = FloatArrow::new(
            cm.scope(),
            FloatArrowProps {
                render_as: RenderAs::Template,
                ..FloatArrowProps::default()
            },
        )
        .unwrap();
        let controller = cm.virtual_float().controller().clone();
        host.events
            .dispatch(&DocumentEvent::new(EventKind::ContextMenu, Point::new(200.0, 150.0)));

        let tree = cm.render(&Props::new(), |_| {
            vec![
                ElementNode::new("ul")
                    .bounds(Rect::new(0.0, 0.0, 100.0, 60.0))
                    .child(arrow.render(&Props::new(), |_| {
                        vec![ElementNode::new("span")
                            .bounds(Rect::new(0.0, 0.0, 8.0, 8.0))
                            .into()]
                    }))
                    .into(),
            ]
        });
        let body = host.document.borrow().body();
        let _m = mount(&tree, &host, body);
        host.scheduler.run_animation_frame();

        assert!(controller.arrow().is_some());
        assert!(controller.arrow_data().is_some());
        let style = arrow.style();
        assert_eq!(style.static_side, Side::Top);
        assert!(style.x.is_some());
        assert_eq!(style.to_style().get("top"), Some("-4px"));
    }

    #[test]
    fn unmount_removes_document_listeners() {
        let host = Host::new(Size::new(800.0, 600.0));
        let cm = FloatContextMenu::new(&host, FloatContextMenuProps::default());
        assert_eq!(host.events.total_listeners(), 3);
        cm.unmount();
        assert_eq!(host.events.total_listeners(), 0);
        let event = DocumentEvent::new(EventKind::ContextMenu, Point::new(5.0, 5.0));
        assert!(!host.events.dispatch(&event));
    }
}
