// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building the virtual tree around the reference and the floating content.
//!
//! The floating content is wrapped, from the outside in, in an optional portal, an
//! enter/leave transition, and the positioned element carrying the floating ref and the
//! inline position style.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::controller::FloatController;
use crate::props::RenderAs;
use crate::transition::{TransitionProps, TransitionSpec};
use crate::vnode::{ElementNode, Props, Style, TransitionKind, TransitionNode, VNode};

/// How floating content is wrapped.
#[derive(Clone, Debug)]
pub struct FloatingOptions<'a> {
    /// Wrapper of the content.
    pub render_as: &'a RenderAs,
    /// Transition configuration.
    pub transition: &'a TransitionProps,
    /// Render a keyed child transition.
    pub transition_child: bool,
}

/// The inline style positioning the floating element at the controller's coordinates.
///
/// With transforms, the element sits at the top-left corner and is moved by a translate
/// of the rounded coordinates. Without them (or in dialog mode), `top` and `left` carry
/// the exact coordinates. Missing coordinates count as zero.
pub fn floating_style(controller: &FloatController) -> Style {
    let (z_index, transform, adaptive_width) = controller.with_props(|p| {
        (
            p.z_index.to_string(),
            p.uses_transform(),
            p.adaptive_width,
        )
    });
    let Point { x, y } = controller.coords().unwrap_or(Point::ZERO);
    let mut style = Style::new()
        .with("position", controller.strategy().as_str())
        .with("z-index", z_index);
    if transform {
        style.set("top", "0px");
        style.set("left", "0px");
        style.set("right", "auto");
        style.set("bottom", "auto");
        // `+ 0.0` folds a negative zero into zero.
        style.set(
            "transform",
            format!("translate({}px,{}px)", x.round() + 0.0, y.round() + 0.0),
        );
    } else {
        style.set("top", format!("{y}px"));
        style.set("left", format!("{x}px"));
    }
    if adaptive_width && let Some(width) = controller.reference_width() {
        style.set("width", format!("{width}px"));
    }
    style
}

/// Wrap `children` as `render_as` says.
///
/// [`RenderAs::Template`] has no element of its own: the children are returned as a
/// fragment and `props` are dropped.
pub fn render_as(render_as: &RenderAs, props: Props, children: Vec<VNode>) -> VNode {
    match render_as {
        RenderAs::Template => VNode::Fragment(children),
        RenderAs::Tag(tag) => {
            let mut el = ElementNode::new(tag.clone()).with_props(&props);
            el.children = children;
            VNode::Element(el)
        }
        RenderAs::Function(f) => f(props, children),
    }
}

fn first_element(children: Vec<VNode>) -> Option<VNode> {
    VNode::flatten(children)
        .into_iter()
        .find(VNode::is_valid_element)
}

/// Render the reference, binding it to `controller`.
///
/// As a template, `attrs` and the ref are merged into the first element child; with no
/// element child nothing is rendered.
pub fn render_reference(
    controller: &FloatController,
    as_: &RenderAs,
    children: Vec<VNode>,
    attrs: &Props,
) -> VNode {
    let props = attrs.clone().with_ref(controller.reference_ref());
    if as_.is_template() {
        return match first_element(children) {
            Some(node) => node.with_props(&props),
            None => {
                tracing::warn!("reference has no element child; rendering nothing");
                VNode::Comment
            }
        };
    }
    render_as(as_, props, children)
}

/// Render the floating content positioned by `controller`.
pub fn render_floating(
    controller: &FloatController,
    options: &FloatingOptions<'_>,
    children: Vec<VNode>,
    attrs: &Props,
) -> VNode {
    let (dialog, portal) = controller.with_props(|p| (p.dialog, p.portal));
    let mut props = Props::new()
        .with_style(&floating_style(controller))
        .merge(attrs);
    if !dialog {
        props = props.with_ref(controller.floating_ref());
    }
    let node = if options.render_as.is_template() {
        match first_element(children) {
            Some(node) => node.with_props(&props),
            None => VNode::Comment,
        }
    } else {
        render_as(options.render_as, props, children)
    };
    let node = floating_node(controller, node);

    let host = controller.host();
    let wrapped = if host.is_server {
        if controller.is_mounted() && controller.with_props(|p| p.show == Some(true)) {
            node
        } else {
            VNode::Comment
        }
    } else {
        let placement = controller.placement();
        let child = options.transition_child;
        let mut spec = TransitionSpec::resolve(options.transition, placement);
        if !child && !spec.uses_classes() {
            spec = TransitionSpec {
                name: spec.name,
                kind: spec.kind,
                origin_class: spec.origin_class,
                ..TransitionSpec::default()
            };
        }
        VNode::Transition(TransitionNode {
            kind: if child {
                TransitionKind::Child
            } else {
                TransitionKind::Root
            },
            key: child.then(|| format!("placement-{placement}")),
            appear: true,
            spec,
            hooks: controller.transition_hooks(),
            node_ref: dialog.then(|| controller.floating_ref()),
            content: Box::new(node),
        })
    };
    if portal {
        VNode::Portal(Box::new(wrapped))
    } else {
        wrapped
    }
}

/// Content kept mounted (`unmount = false`) always renders and refreshes the position;
/// other content renders only while requested.
fn floating_node(controller: &FloatController, node: VNode) -> VNode {
    if node.as_element().is_some_and(|e| !e.unmount) {
        controller.update();
        return node;
    }
    if controller.is_requested() {
        node
    } else {
        VNode::Comment
    }
}

/// Render the root wrapper around already-rendered children.
pub fn render_wrapper(as_: &RenderAs, attrs: &Props, children: Vec<VNode>) -> VNode {
    render_as(as_, attrs.clone(), children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;
    use crate::props::{FloatProps, ZIndex};
    use crate::reference::Reference;
    use alloc::string::String;
    use alloc::vec;
    use kurbo::{Rect, Size};
    use tether_geometry::{OffsetOptions, Placement, Strategy};
    use tether_scene::Element;

    fn positioned(props: FloatProps) -> (Host, FloatController) {
        let host = Host::new(Size::new(800.0, 600.0));
        let (r, f) = {
            let mut doc = host.document.borrow_mut();
            let body = doc.body();
            (
                doc.insert(
                    Some(body),
                    Element::new("button").with_bounds(Rect::new(100.0, 100.0, 150.0, 120.0)),
                ),
                doc.insert(
                    Some(body),
                    Element::new("div").with_bounds(Rect::new(0.0, 0.0, 200.0, 40.0)),
                ),
            )
        };
        let c = FloatController::new(&host, props);
        c.set_reference(Some(Reference::Element(r)));
        c.set_floating(Some(f));
        (host, c)
    }

    fn content() -> Vec<VNode> {
        vec![ElementNode::new("ul").into()]
    }

    #[test]
    fn transform_style_rounds_coordinates() {
        let (_h, c) = positioned(FloatProps {
            offset: Some(OffsetOptions::Distance(8.4)),
            ..FloatProps::default()
        });
        let style = floating_style(&c);
        assert_eq!(style.get("position"), Some("absolute"));
        assert_eq!(style.get("z-index"), Some("9999"));
        assert_eq!(style.get("top"), Some("0px"));
        assert_eq!(style.get("right"), Some("auto"));
        assert_eq!(style.get("transform"), Some("translate(100px,128px)"));
    }

    #[test]
    fn literal_offsets_without_transform() {
        let (_h, c) = positioned(FloatProps {
            offset: Some(OffsetOptions::Distance(8.0)),
            transform: false,
            strategy: Strategy::Fixed,
            z_index: ZIndex::Raw("auto".into()),
            ..FloatProps::default()
        });
        let style = floating_style(&c);
        assert_eq!(style.get("top"), Some("128px"));
        assert_eq!(style.get("left"), Some("100px"));
        assert_eq!(style.get("position"), Some("fixed"));
        assert_eq!(style.get("z-index"), Some("auto"));
        assert_eq!(style.get("transform"), None);
    }

    #[test]
    fn unpositioned_style_counts_as_zero() {
        let host = Host::new(Size::new(800.0, 600.0));
        let c = FloatController::new(&host, FloatProps::default());
        assert_eq!(
            floating_style(&c).get("transform"),
            Some("translate(0px,0px)")
        );
    }

    #[test]
    fn adaptive_width_follows_reference() {
        let (_h, c) = positioned(FloatProps {
            adaptive_width: true,
            ..FloatProps::default()
        });
        assert_eq!(floating_style(&c).get("width"), Some("50px"));
    }

    #[test]
    fn floating_is_wrapped_in_transition_then_portal() {
        let (_h, c) = positioned(FloatProps {
            portal: true,
            ..FloatProps::default()
        });
        let node = render_floating(
            &c,
            &FloatingOptions {
                render_as: &RenderAs::Template,
                transition: &TransitionProps::default(),
                transition_child: false,
            },
            content(),
            &Props::new().with_class("menu"),
        );
        let VNode::Portal(inner) = &node else {
            panic!("portal outermost");
        };
        let VNode::Transition(t) = &**inner else {
            panic!("transition inside portal");
        };
        assert_eq!(t.kind, TransitionKind::Root);
        assert!(t.appear);
        assert!(t.node_ref.is_none());
        let el = t.content.as_element().unwrap();
        assert_eq!(el.tag, "ul");
        assert_eq!(el.props.class.as_deref(), Some("menu"));
        assert!(el.props.node_ref.is_some());
        assert!(el.props.style.get("transform").is_some());
    }

    #[test]
    fn child_transition_is_keyed_by_placement() {
        let (_h, c) = positioned(FloatProps {
            placement: Placement::TopEnd,
            ..FloatProps::default()
        });
        let node = render_floating(
            &c,
            &FloatingOptions {
                render_as: &RenderAs::tag("div"),
                transition: &TransitionProps::default(),
                transition_child: true,
            },
            content(),
            &Props::new(),
        );
        let t = node.find_transition().unwrap();
        assert_eq!(t.kind, TransitionKind::Child);
        assert_eq!(t.key.as_deref(), Some("placement-top-end"));
        assert_eq!(t.content.as_element().unwrap().tag, "div");
    }

    #[test]
    fn named_root_transition_drops_class_strings() {
        let (_h, c) = positioned(FloatProps::default());
        let transition = TransitionProps {
            name: Some("fade".into()),
            enter: Some("duration-100".into()),
            ..TransitionProps::default()
        };
        let node = render_floating(
            &c,
            &FloatingOptions {
                render_as: &RenderAs::Template,
                transition: &transition,
                transition_child: false,
            },
            content(),
            &Props::new(),
        );
        let t = node.find_transition().unwrap();
        assert_eq!(t.spec.name.as_deref(), Some("fade"));
        assert_eq!(t.spec.enter_active, None);
    }

    #[test]
    fn dialog_binds_floating_through_the_transition() {
        let (_h, c) = positioned(FloatProps {
            dialog: true,
            ..FloatProps::default()
        });
        let node = render_floating(
            &c,
            &FloatingOptions {
                render_as: &RenderAs::Template,
                transition: &TransitionProps::default(),
                transition_child: false,
            },
            content(),
            &Props::new(),
        );
        let t = node.find_transition().unwrap();
        assert!(t.node_ref.is_some());
        assert!(t.content.as_element().unwrap().props.node_ref.is_none());
        assert!(
            t.content
                .as_element()
                .unwrap()
                .props
                .style
                .get("transform")
                .is_none(),
            "dialog positions with top/left"
        );
    }

    #[test]
    fn hidden_content_renders_a_placeholder_unless_kept_mounted() {
        let (_h, c) = positioned(FloatProps {
            show: Some(false),
            ..FloatProps::default()
        });
        let options = FloatingOptions {
            render_as: &RenderAs::Template,
            transition: &TransitionProps::default(),
            transition_child: false,
        };
        let hidden = render_floating(&c, &options, content(), &Props::new());
        assert!(hidden.find_transition().unwrap().content.is_comment());

        let kept = render_floating(
            &c,
            &options,
            vec![ElementNode::new("ul").keep_mounted().into()],
            &Props::new(),
        );
        assert!(!kept.find_transition().unwrap().content.is_comment());
    }

    #[test]
    fn server_rendering_waits_for_mount_and_skips_transitions() {
        let host = Host::new(Size::new(800.0, 600.0)).with_server(true);
        let c = FloatController::new(
            &host,
            FloatProps {
                show: Some(true),
                ..FloatProps::default()
            },
        );
        let options = FloatingOptions {
            render_as: &RenderAs::Template,
            transition: &TransitionProps::default(),
            transition_child: false,
        };
        assert!(render_floating(&c, &options, content(), &Props::new()).is_comment());
        c.mark_mounted();
        let node = render_floating(&c, &options, content(), &Props::new());
        assert_eq!(node.as_element().unwrap().tag, "ul");
        assert!(node.find_transition().is_none());
    }

    #[test]
    fn server_rendering_needs_controlled_show() {
        let host = Host::new(Size::new(800.0, 600.0)).with_server(true);
        let options = FloatingOptions {
            render_as: &RenderAs::Template,
            transition: &TransitionProps::default(),
            transition_child: false,
        };
        for show in [None, Some(false)] {
            let c = FloatController::new(
                &host,
                FloatProps {
                    show,
                    ..FloatProps::default()
                },
            );
            c.mark_mounted();
            assert!(
                render_floating(&c, &options, content(), &Props::new()).is_comment(),
                "show = {show:?}"
            );
        }
    }

    #[test]
    fn reference_template_takes_first_element_child() {
        let host = Host::new(Size::new(800.0, 600.0));
        let c = FloatController::new(&host, FloatProps::default());
        let node = render_reference(
            &c,
            &RenderAs::Template,
            vec![
                VNode::text("  "),
                VNode::Fragment(vec![VNode::Comment, ElementNode::new("button").into()]),
            ],
            &Props::new().with_attr("aria-haspopup", "menu"),
        );
        let el = node.as_element().unwrap();
        assert_eq!(el.tag, "button");
        assert_eq!(
            el.props.attrs.get("aria-haspopup").map(String::as_str),
            Some("menu")
        );
        assert!(el.props.node_ref.is_some());
        assert!(render_reference(&c, &RenderAs::Template, vec![], &Props::new()).is_comment());
    }

    #[test]
    fn wrapper_template_is_a_fragment() {
        let kids = vec![VNode::text("a"), VNode::text("b")];
        assert!(matches!(
            render_wrapper(&RenderAs::Template, &Props::new(), kids.clone()),
            VNode::Fragment(v) if v.len() == 2
        ));
        let div = render_wrapper(&RenderAs::tag("div"), &Props::new().with_class("x"), kids);
        let el = div.as_element().unwrap();
        assert_eq!(el.children.len(), 2);
        assert_eq!(el.props.class.as_deref(), Some("x"));
    }
}
