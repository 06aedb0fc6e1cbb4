// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component configuration with its defaults.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use tether_geometry::{
    ArrowOptions, AutoPlacementOptions, AutoUpdateOptions, FlipOptions, HideOptions, Middleware,
    OffsetOptions, Placement, ShiftOptions, Strategy,
};
use tether_scene::NodeId;

use crate::error::FloatError;
use crate::reference::Reference;
use crate::transition::TransitionProps;
use crate::vnode::{Props, VNode};

/// Builds a node from merged props and children.
pub type RenderFn = Rc<dyn Fn(Props, Vec<VNode>) -> VNode>;

/// What a component renders as.
#[derive(Clone)]
pub enum RenderAs {
    /// No element of its own: props and the ref are merged into the single child.
    Template,
    /// An element with this tag wraps the children.
    Tag(String),
    /// A render function wraps the children.
    Function(RenderFn),
}

impl fmt::Debug for RenderAs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => f.write_str("Template"),
            Self::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl RenderAs {
    /// An element wrapper.
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// A render-function wrapper.
    pub fn function(f: impl Fn(Props, Vec<VNode>) -> VNode + 'static) -> Self {
        Self::Function(Rc::new(f))
    }

    /// Whether this is [`RenderAs::Template`].
    #[must_use]
    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template)
    }
}

/// Option that can be off, on with defaults, a padding shorthand, or explicit options.
#[derive(Clone, Debug, PartialEq)]
pub enum Toggle<T> {
    /// Not applied.
    Off,
    /// Applied with default options.
    On,
    /// Applied with default options and this padding.
    Padding(f64),
    /// Applied with these options.
    With(T),
}

impl<T> Default for Toggle<T> {
    fn default() -> Self {
        Self::Off
    }
}

impl<T> From<bool> for Toggle<T> {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl<T> From<f64> for Toggle<T> {
    fn from(padding: f64) -> Self {
        Self::Padding(padding)
    }
}

impl<T> Toggle<T> {
    /// Whether the step is applied.
    #[must_use]
    pub fn is_on(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl<T: Clone + Default> Toggle<T> {
    /// Options to apply, if any; `with_padding` turns the shorthand into options.
    pub fn options(&self, with_padding: impl FnOnce(T, f64) -> T) -> Option<T> {
        match self {
            Self::Off => None,
            Self::On => Some(T::default()),
            Self::Padding(p) => Some(with_padding(T::default(), *p)),
            Self::With(options) => Some(options.clone()),
        }
    }
}

/// Stacking order of the floating element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZIndex {
    /// A numeric z-index.
    Number(i32),
    /// A raw CSS value, e.g. `"auto"` or a variable.
    Raw(String),
}

impl Default for ZIndex {
    fn default() -> Self {
        Self::Number(9999)
    }
}

impl fmt::Display for ZIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<i32> for ZIndex {
    fn from(n: i32) -> Self {
        Self::Number(n)
    }
}

/// Endpoints handed to a middleware factory.
#[derive(Clone, Debug)]
pub struct MiddlewareRefs {
    /// Current reference, if bound.
    pub reference: Option<Reference>,
    /// Current floating element, if bound.
    pub floating: Option<NodeId>,
}

/// Builds user middleware from the current endpoints.
pub type MiddlewareFactory = Rc<dyn Fn(&MiddlewareRefs) -> Vec<Middleware>>;

/// User middleware, appended after the built-in steps.
#[derive(Clone)]
pub enum MiddlewareSource {
    /// A fixed list.
    List(Vec<Middleware>),
    /// A factory run on every computation.
    Factory(MiddlewareFactory),
}

impl Default for MiddlewareSource {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl fmt::Debug for MiddlewareSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl MiddlewareSource {
    /// A factory source.
    pub fn factory(f: impl Fn(&MiddlewareRefs) -> Vec<Middleware> + 'static) -> Self {
        Self::Factory(Rc::new(f))
    }

    /// The user middleware for `refs`.
    #[must_use]
    pub fn resolve(&self, refs: &MiddlewareRefs) -> Vec<Middleware> {
        match self {
            Self::List(list) => list.clone(),
            Self::Factory(f) => f(refs),
        }
    }
}

/// Configuration of a [`Float`](crate::Float) root.
#[derive(Clone, Debug)]
pub struct FloatProps {
    /// Wrapper around the children. Default: [`RenderAs::Template`].
    pub render_as: RenderAs,
    /// Wrapper around the floating content in implicit mode. Default: `div`.
    pub floating_as: RenderAs,
    /// Requested visibility; `None` leaves the content always rendered.
    pub show: Option<bool>,
    /// Requested placement. Default: `bottom-start`.
    pub placement: Placement,
    /// Positioning strategy. Default: `absolute`.
    pub strategy: Strategy,
    /// Gap between reference and floating element.
    pub offset: Option<OffsetOptions>,
    /// Slide along the edge to stay in view; a number is the padding.
    pub shift: Toggle<ShiftOptions>,
    /// Swap to the opposite side on overflow; a number is the padding.
    pub flip: Toggle<FlipOptions>,
    /// Arrow positioning; a number is the arrow padding.
    pub arrow: Toggle<ArrowOptions>,
    /// Pick the side with the most space.
    pub auto_placement: Toggle<AutoPlacementOptions>,
    /// Report hidden-ness in side data.
    pub hide: Toggle<HideOptions>,
    /// Keep the position current while shown; `None` disables it.
    pub auto_update: Option<AutoUpdateOptions>,
    /// Stacking order. Default: `9999`.
    pub z_index: ZIndex,
    /// Transition classes.
    pub transition: TransitionProps,
    /// Render the floating element at the document body.
    pub portal: bool,
    /// Position with a translate transform instead of `top`/`left`. Default: `true`.
    pub transform: bool,
    /// Pin the floating width to the reference width.
    pub adaptive_width: bool,
    /// Reference and content are separate subcomponents.
    pub composable: bool,
    /// Dialog mode: composable, and positioned with `top`/`left`.
    pub dialog: bool,
    /// User middleware.
    pub middleware: MiddlewareSource,
}

impl Default for FloatProps {
    fn default() -> Self {
        Self {
            render_as: RenderAs::Template,
            floating_as: RenderAs::tag("div"),
            show: None,
            placement: Placement::BottomStart,
            strategy: Strategy::Absolute,
            offset: None,
            shift: Toggle::Off,
            flip: Toggle::Off,
            arrow: Toggle::Off,
            auto_placement: Toggle::Off,
            hide: Toggle::Off,
            auto_update: Some(AutoUpdateOptions::default()),
            z_index: ZIndex::default(),
            transition: TransitionProps::default(),
            portal: false,
            transform: true,
            adaptive_width: false,
            composable: false,
            dialog: false,
            middleware: MiddlewareSource::default(),
        }
    }
}

impl FloatProps {
    /// Whether reference and content are rendered by subcomponents.
    #[must_use]
    pub fn is_composable(&self) -> bool {
        self.composable || self.dialog
    }

    /// Whether the position is expressed as a translate transform.
    #[must_use]
    pub fn uses_transform(&self) -> bool {
        self.transform && !self.dialog
    }

    /// Set the placement from its name, e.g. `"top-end"`.
    pub fn with_placement_name(mut self, name: &str) -> Result<Self, FloatError> {
        self.placement = name.parse()?;
        Ok(self)
    }
}

/// Configuration of a [`FloatReference`](crate::FloatReference).
#[derive(Clone, Debug)]
pub struct FloatReferenceProps {
    /// Default: [`RenderAs::Template`].
    pub render_as: RenderAs,
}

impl Default for FloatReferenceProps {
    fn default() -> Self {
        Self {
            render_as: RenderAs::Template,
        }
    }
}

/// Configuration of a [`FloatContent`](crate::FloatContent).
#[derive(Clone, Debug)]
pub struct FloatContentProps {
    /// Default: [`RenderAs::Template`].
    pub render_as: RenderAs,
    /// Replaces the root's transition configuration when set.
    pub transition: Option<TransitionProps>,
    /// Render a keyed child transition instead of a root transition.
    pub transition_child: bool,
}

impl Default for FloatContentProps {
    fn default() -> Self {
        Self {
            render_as: RenderAs::Template,
            transition: None,
            transition_child: false,
        }
    }
}

/// Configuration of a [`FloatArrow`](crate::FloatArrow).
#[derive(Clone, Debug)]
pub struct FloatArrowProps {
    /// Default: `div`.
    pub render_as: RenderAs,
    /// How far the arrow sticks out past the floating edge. Default: `4`.
    pub offset: f64,
}

impl Default for FloatArrowProps {
    fn default() -> Self {
        Self {
            render_as: RenderAs::tag("div"),
            offset: 4.0,
        }
    }
}

/// Configuration of a [`FloatVirtual`](crate::FloatVirtual).
///
/// `render_as` wraps the floating content (default [`RenderAs::Template`]); `show`
/// defaults to hidden. `floating_as`, `composable`, `dialog` and `adaptive_width` do
/// not apply.
pub type FloatVirtualProps = FloatProps;

/// Configuration of a [`FloatContextMenu`](crate::FloatContextMenu).
#[derive(Clone, Debug)]
pub struct FloatContextMenuProps {
    /// Positioning configuration; `flip` defaults to on and `portal` is forced on.
    pub float: FloatProps,
}

impl Default for FloatContextMenuProps {
    fn default() -> Self {
        Self {
            float: FloatProps {
                flip: Toggle::On,
                ..FloatProps::default()
            },
        }
    }
}

/// Configuration of a [`FloatCursor`](crate::FloatCursor).
#[derive(Clone, Debug)]
pub struct FloatCursorProps {
    /// Positioning configuration; `portal` is forced on.
    pub float: FloatProps,
    /// Hide the native cursor document-wide while mounted. Default: `true`.
    pub global_hide_cursor: bool,
}

impl Default for FloatCursorProps {
    fn default() -> Self {
        Self {
            float: FloatProps::default(),
            global_hide_cursor: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use tether_geometry::Padding;

    #[test]
    fn defaults() {
        let p = FloatProps::default();
        assert!(p.render_as.is_template());
        assert!(matches!(&p.floating_as, RenderAs::Tag(t) if t == "div"));
        assert_eq!(p.placement, Placement::BottomStart);
        assert_eq!(p.strategy, Strategy::Absolute);
        assert_eq!(p.z_index.to_string(), "9999");
        assert!(p.uses_transform());
        assert!(!p.is_composable());
        assert!(p.auto_update.is_some());
        assert_eq!(FloatArrowProps::default().offset, 4.0);
        assert!(FloatContextMenuProps::default().float.flip.is_on());
        assert!(FloatCursorProps::default().global_hide_cursor);
    }

    #[test]
    fn dialog_implies_composable_without_transform() {
        let p = FloatProps {
            dialog: true,
            ..FloatProps::default()
        };
        assert!(p.is_composable());
        assert!(!p.uses_transform());
    }

    #[test]
    fn toggle_padding_shorthand() {
        let t: Toggle<ShiftOptions> = 8.0.into();
        let o = t
            .options(|o, p| ShiftOptions {
                padding: p.into(),
                ..o
            })
            .unwrap();
        assert_eq!(o.padding, Padding::uniform(8.0));
        assert!(o.main_axis);
        assert_eq!(Toggle::<ShiftOptions>::from(false).options(|o, _| o), None);
    }

    #[test]
    fn placement_by_name() {
        let p = FloatProps::default().with_placement_name("top-end").unwrap();
        assert_eq!(p.placement, Placement::TopEnd);
        assert!(FloatProps::default().with_placement_name("up").is_err());
    }
}
