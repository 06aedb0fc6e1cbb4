// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floating content positioned against a synthetic reference.

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::Point;
use tether_geometry::Placement;
use tether_scene::NodeId;

use crate::context::ContextScope;
use crate::controller::FloatController;
use crate::host::Host;
use crate::props::FloatVirtualProps;
use crate::reference::{Reference, VirtualReference};
use crate::render::{FloatingOptions, render_floating};
use crate::vnode::{Props, VNode};

/// Handles passed to the `initial` callback of a [`FloatVirtual`].
#[derive(Clone, Debug)]
pub struct VirtualHandles {
    controller: FloatController,
}

impl VirtualHandles {
    /// Requested visibility.
    pub fn show(&self) -> bool {
        self.controller.is_requested()
    }

    /// Open or close the floating content.
    pub fn set_show(&self, show: bool) {
        self.controller.set_requested(show);
    }

    /// The resolved placement.
    pub fn placement(&self) -> Placement {
        self.controller.placement()
    }

    /// Replace the reference; positions follow on the next animation frame.
    pub fn set_reference(&self, reference: VirtualReference) {
        self.controller
            .set_reference(Some(Reference::Virtual(Rc::new(reference))));
    }

    /// Move a zero-size reference to `point`.
    pub fn move_to(&self, point: Point) {
        self.set_reference(VirtualReference::at(point));
    }

    /// The floating element, once mounted.
    pub fn floating(&self) -> Option<NodeId> {
        self.controller.floating()
    }

    /// The controller behind these handles.
    pub fn controller(&self) -> &FloatController {
        &self.controller
    }
}

/// Closes the floating content of a [`FloatVirtual`].
#[derive(Clone, Debug)]
pub struct CloseHandle {
    controller: FloatController,
}

impl CloseHandle {
    /// Request the content to close.
    pub fn close(&self) {
        self.controller.set_requested(false);
    }
}

/// Values handed to a [`FloatVirtual`] slot.
#[derive(Clone, Debug)]
pub struct VirtualSlot {
    /// The resolved placement.
    pub placement: Placement,
    /// Closes the content.
    pub close: CloseHandle,
}

/// Floating content whose reference is a [`VirtualReference`].
///
/// The content starts hidden unless `show` is set, and the reference starts as a
/// zero-size box at the origin. A [`FloatArrow`](crate::FloatArrow) inside the content is
/// created from [`FloatVirtual::scope`].
#[derive(Debug)]
pub struct FloatVirtual {
    controller: FloatController,
    scope: ContextScope,
}

impl FloatVirtual {
    /// Create the composition; `initial` receives handles to drive it.
    pub fn new(host: &Host, props: FloatVirtualProps, initial: impl FnOnce(&VirtualHandles)) -> Self {
        let requested = props.show.unwrap_or(false);
        let controller = FloatController::with_requested(host, props, requested);
        controller.set_reference(Some(Reference::Virtual(Rc::new(
            VirtualReference::default(),
        ))));
        initial(&VirtualHandles {
            controller: controller.clone(),
        });
        let scope = ContextScope::provided_by(&controller);
        Self { controller, scope }
    }

    /// The positioning controller.
    pub fn controller(&self) -> &FloatController {
        &self.controller
    }

    /// The scope an arrow inside the content is created in.
    pub fn scope(&self) -> &ContextScope {
        &self.scope
    }

    /// Handles to drive the composition.
    pub fn handles(&self) -> VirtualHandles {
        VirtualHandles {
            controller: self.controller.clone(),
        }
    }

    /// Follow a change of the `show` configuration; `None` means hidden.
    pub fn set_show(&self, show: Option<bool>) {
        self.controller.update_props(|p| p.show = show);
        self.controller.set_requested(show.unwrap_or(false));
    }

    /// Render the floating content.
    pub fn render(&self, slot: impl FnOnce(&VirtualSlot) -> Vec<VNode>) -> VNode {
        self.render_with_attrs(&Props::new(), slot)
    }

    /// Render the floating content with extra attributes on it.
    pub fn render_with_attrs(
        &self,
        attrs: &Props,
        slot: impl FnOnce(&VirtualSlot) -> Vec<VNode>,
    ) -> VNode {
        let children = slot(&VirtualSlot {
            placement: self.controller.placement(),
            close: CloseHandle {
                controller: self.controller.clone(),
            },
        });
        let (render_as, transition) = self
            .controller
            .with_props(|p| (p.render_as.clone(), p.transition.clone()));
        render_floating(
            &self.controller,
            &FloatingOptions {
                render_as: &render_as,
                transition: &transition,
                transition_child: false,
            },
            children,
            attrs,
        )
    }

    /// Note that the rendered tree has been mounted.
    pub fn mounted(&self) {
        self.controller.mark_mounted();
    }

    /// Tear down the controller.
    pub fn unmount(&self) {
        self.controller.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::FloatProps;
    use crate::vnode::{ElementNode, mount};
    use alloc::vec;
    use core::cell::Cell;
    use kurbo::{Rect, Size};

    fn panel() -> VNode {
        ElementNode::new("div")
            .bounds(Rect::new(0.0, 0.0, 120.0, 80.0))
            .into()
    }

    #[test]
    fn starts_hidden_at_origin() {
        let host = Host::new(Size::new(800.0, 600.0));
        let called = Cell::new(false);
        let v = FloatVirtual::new(&host, FloatProps::default(), |h| {
            called.set(true);
            assert!(!h.show());
            assert_eq!(h.placement(), Placement::BottomStart);
            assert!(h.floating().is_none());
        });
        assert!(called.get());
        assert!(v.render(|_| vec![panel()]).find_transition().unwrap().content.is_comment());
        assert!(matches!(
            v.controller().reference(),
            Some(Reference::Virtual(r)) if r.bounding_rect() == Rect::ZERO
        ));
    }

    #[test]
    fn handles_open_and_move_the_content() {
        let host = Host::new(Size::new(800.0, 600.0));
        let v = FloatVirtual::new(&host, FloatProps::default(), |_| {});
        let handles = v.handles();
        handles.set_show(true);
        handles.move_to(Point::new(30.0, 40.0));
        let tree = v.render(|_| vec![panel()]);
        let body = host.document.borrow().body();
        let _m = mount(&tree, &host, body);
        host.scheduler.run_animation_frame();
        assert_eq!(v.controller().coords(), Some(Point::new(30.0, 40.0)));
    }

    #[test]
    fn scope_provides_the_arrow_only() {
        let host = Host::new(Size::new(800.0, 600.0));
        let v = FloatVirtual::new(&host, FloatProps::default(), |_| {});
        assert!(v.scope().arrow().is_ok());
        assert!(v.scope().reference().is_err());
        assert!(v.scope().floating().is_err());
    }

    #[test]
    fn slot_close_requests_hide() {
        let host = Host::new(Size::new(800.0, 600.0));
        let v = FloatVirtual::new(
            &host,
            FloatProps {
                show: Some(true),
                ..FloatProps::default()
            },
            |_| {},
        );
        let mut close = None;
        v.render(|slot| {
            close = Some(slot.close.clone());
            vec![panel()]
        });
        assert!(v.controller().is_requested());
        close.unwrap().close();
        assert!(!v.controller().is_requested());
    }
}
