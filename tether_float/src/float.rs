// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `Float` root and its reference and content subcomponents.

use alloc::vec;
use alloc::vec::Vec;

use tether_geometry::Placement;

use crate::context::{ContextScope, FloatingContext, ReferenceContext};
use crate::controller::FloatController;
use crate::error::FloatError;
use crate::host::Host;
use crate::props::{FloatContentProps, FloatProps, FloatReferenceProps, RenderAs};
use crate::render::{FloatingOptions, render_floating, render_reference, render_wrapper};
use crate::vnode::{Props, VNode};

/// Values handed to a slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FloatSlot {
    /// The resolved placement.
    pub placement: Placement,
}

/// A floating element anchored to a reference.
///
/// In implicit mode the first two element children rendered by the slot are the
/// reference and the floating content. In composable (or dialog) mode the slot renders a
/// [`FloatReference`] and a [`FloatContent`] created from [`Float::scope`].
#[derive(Debug)]
pub struct Float {
    controller: FloatController,
    scope: ContextScope,
}

impl Float {
    /// Create a root with its controller.
    pub fn new(host: &Host, props: FloatProps) -> Self {
        let controller = FloatController::new(host, props);
        let scope = ContextScope::provided_by(&controller);
        Self { controller, scope }
    }

    /// The positioning controller.
    pub fn controller(&self) -> &FloatController {
        &self.controller
    }

    /// The scope subcomponents are created in.
    ///
    /// An implicit root provides only the arrow context.
    pub fn scope(&self) -> &ContextScope {
        &self.scope
    }

    /// Change the requested visibility; `None` means always rendered.
    pub fn set_show(&self, show: Option<bool>) {
        self.controller.update_props(|p| p.show = show);
        self.controller.set_requested(show.unwrap_or(true));
    }

    /// The slot values for the current state.
    pub fn slot(&self) -> FloatSlot {
        FloatSlot {
            placement: self.controller.placement(),
        }
    }

    /// Render the root.
    pub fn render(&self, slot: impl FnOnce(&FloatSlot) -> Vec<VNode>) -> VNode {
        let children = slot(&self.slot());
        let (composable, render_as, floating_as, transition) = self.controller.with_props(|p| {
            (
                p.is_composable(),
                p.render_as.clone(),
                p.floating_as.clone(),
                p.transition.clone(),
            )
        });
        if composable {
            return render_wrapper(&render_as, &Props::new(), children);
        }

        let mut elements = VNode::flatten(children)
            .into_iter()
            .filter(VNode::is_valid_element);
        let Some(reference) = elements.next() else {
            tracing::warn!("Float rendered without a reference element");
            return VNode::Comment;
        };
        let floating = elements.next();
        let reference = render_reference(
            &self.controller,
            &RenderAs::Template,
            vec![reference],
            &Props::new(),
        );
        let floating = render_floating(
            &self.controller,
            &FloatingOptions {
                render_as: &floating_as,
                transition: &transition,
                transition_child: false,
            },
            floating.into_iter().collect(),
            &Props::new(),
        );
        render_wrapper(&render_as, &Props::new(), vec![reference, floating])
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

/// The reference part of a composable [`Float`].
#[derive(Debug)]
pub struct FloatReference {
    context: ReferenceContext,
    props: FloatReferenceProps,
}

impl FloatReference {
    /// Create a reference inside `scope`.
    pub fn new(scope: &ContextScope, props: FloatReferenceProps) -> Result<Self, FloatError> {
        Ok(Self {
            context: scope.reference()?.clone(),
            props,
        })
    }

    /// Render the reference.
    pub fn render(&self, attrs: &Props, slot: impl FnOnce(&FloatSlot) -> Vec<VNode>) -> VNode {
        let children = slot(&FloatSlot {
            placement: self.context.placement(),
        });
        render_reference(
            self.context.controller(),
            &self.props.render_as,
            children,
            attrs,
        )
    }
}

/// The floating part of a composable [`Float`].
#[derive(Debug)]
pub struct FloatContent {
    context: FloatingContext,
    props: FloatContentProps,
}

impl FloatContent {
    /// Create the content inside `scope`.
    pub fn new(scope: &ContextScope, props: FloatContentProps) -> Result<Self, FloatError> {
        Ok(Self {
            context: scope.floating()?.clone(),
            props,
        })
    }

    /// Render the floating content.
    ///
    /// The content's own transition configuration replaces the root's when set.
    pub fn render(&self, attrs: &Props, slot: impl FnOnce(&FloatSlot) -> Vec<VNode>) -> VNode {
        let controller = self.context.controller();
        let children = slot(&FloatSlot {
            placement: self.context.placement(),
        });
        let transition = match &self.props.transition {
            Some(own) => own.clone(),
            None => controller.with_props(|p| p.transition.clone()),
        };
        render_floating(
            controller,
            &FloatingOptions {
                render_as: &self.props.render_as,
                transition: &transition,
                transition_child: self.props.transition_child,
            },
            children,
            attrs,
        )
    }
}
