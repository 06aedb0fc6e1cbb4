// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The arrow pointing from the floating element at its reference.

use alloc::format;
use alloc::vec::Vec;

use tether_geometry::{ArrowData, Placement, Side};

use crate::context::{ArrowContext, ContextScope};
use crate::error::FloatError;
use crate::float::FloatSlot;
use crate::props::{FloatArrowProps, RenderAs};
use crate::render::render_as;
use crate::vnode::{Props, Style, VNode};

/// Where the arrow sits, derived from the resolved placement and the arrow side data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrowStyle {
    /// The floating element's edge facing the reference.
    pub static_side: Side,
    /// Left offset along a horizontal edge.
    pub x: Option<f64>,
    /// Top offset along a vertical edge.
    pub y: Option<f64>,
    /// How far the arrow sticks out past `static_side`.
    pub offset: f64,
}

impl ArrowStyle {
    /// Resolve the arrow position for `placement`.
    #[must_use]
    pub fn resolve(placement: Placement, data: Option<ArrowData>, offset: f64) -> Self {
        let data = data.unwrap_or_default();
        Self {
            static_side: placement.side().opposite(),
            x: data.x,
            y: data.y,
            offset,
        }
    }

    /// The inline style: `left`/`top` from the side data, and a negative offset on the
    /// static side.
    #[must_use]
    pub fn to_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(x) = self.x {
            style.set("left", format!("{x}px"));
        }
        if let Some(y) = self.y {
            style.set("top", format!("{y}px"));
        }
        style.set(self.static_side.as_str(), format!("{}px", -self.offset + 0.0));
        style
    }
}

/// Arrow subcomponent of a [`Float`](crate::Float).
#[derive(Debug)]
pub struct FloatArrow {
    context: ArrowContext,
    props: FloatArrowProps,
}

impl FloatArrow {
    /// Create an arrow inside `scope`.
    pub fn new(scope: &ContextScope, props: FloatArrowProps) -> Result<Self, FloatError> {
        Ok(Self {
            context: scope.arrow()?.clone(),
            props,
        })
    }

    /// The current arrow position.
    pub fn style(&self) -> ArrowStyle {
        let controller = self.context.controller();
        ArrowStyle::resolve(
            controller.placement(),
            controller.arrow_data(),
            self.props.offset,
        )
    }

    /// Render the arrow element.
    ///
    /// As a template, the ref and style go onto the first element the slot returns; with no
    /// element nothing is rendered. Otherwise an element of the configured tag is rendered
    /// with `attrs`, the ref and the style.
    pub fn render(&self, attrs: &Props, slot: impl FnOnce(&FloatSlot) -> Vec<VNode>) -> VNode {
        let controller = self.context.controller();
        let props = Props::new()
            .with_ref(controller.arrow_ref())
            .with_style(&self.style().to_style());
        match &self.props.render_as {
            RenderAs::Template => {
                let slot_props = FloatSlot {
                    placement: controller.placement(),
                };
                VNode::flatten(slot(&slot_props))
                    .into_iter()
                    .find(VNode::is_valid_element)
                    .map_or(VNode::Comment, |node| node.with_props(&props))
            }
            other => render_as(other, attrs.clone().merge(&props), Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_placement_anchors_left() {
        let style = ArrowStyle::resolve(
            Placement::Right,
            Some(ArrowData {
                x: None,
                y: Some(12.0),
                center_offset: 0.0,
                alignment_offset: None,
            }),
            4.0,
        );
        assert_eq!(style.static_side, Side::Left);
        let css = style.to_style();
        assert_eq!(css.get("top"), Some("12px"));
        assert_eq!(css.get("left"), Some("-4px"));
        assert_eq!(css.get("right"), None);
        assert_eq!(css.get("bottom"), None);
    }

    #[test]
    fn static_side_is_opposite_of_placement_side() {
        for (placement, side) in [
            (Placement::TopStart, Side::Bottom),
            (Placement::Bottom, Side::Top),
            (Placement::LeftEnd, Side::Right),
            (Placement::Right, Side::Left),
        ] {
            assert_eq!(ArrowStyle::resolve(placement, None, 4.0).static_side, side);
        }
    }

    #[test]
    fn zero_offset_has_no_negative_zero() {
        let style = ArrowStyle::resolve(Placement::Top, None, 0.0).to_style();
        assert_eq!(style.get("bottom"), Some("0px"));
    }

    #[test]
    fn arrow_outside_float_is_a_usage_error() {
        let err = FloatArrow::new(&ContextScope::root(), FloatArrowProps::default()).unwrap_err();
        assert_eq!(
            err,
            FloatError::MissingContext {
                component: "FloatArrow"
            }
        );
    }
}
