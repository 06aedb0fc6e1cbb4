// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Middleware descriptors: the ordered geometry-adjustment steps handed to an engine.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::data::{MiddlewareData, Payload};
use crate::placement::{Alignment, Placement, Side, Strategy};

/// Per-side padding applied when detecting overflow against the boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    /// Top padding.
    pub top: f64,
    /// Right padding.
    pub right: f64,
    /// Bottom padding.
    pub bottom: f64,
    /// Left padding.
    pub left: f64,
}

impl Padding {
    /// Same padding on every side.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Padding on `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

impl From<f64> for Padding {
    fn from(value: f64) -> Self {
        Self::uniform(value)
    }
}

/// Distance between reference and floating element.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OffsetOptions {
    /// Gap along the side axis only.
    Distance(f64),
    /// Gap expressed per axis.
    Axes(OffsetAxes),
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self::Distance(0.0)
    }
}

impl From<f64> for OffsetOptions {
    fn from(value: f64) -> Self {
        Self::Distance(value)
    }
}

/// Per-axis offset values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetAxes {
    /// Gap along the side axis (away from the reference).
    pub main_axis: f64,
    /// Skid along the alignment axis.
    pub cross_axis: f64,
    /// Skid for aligned placements; overrides `cross_axis` and is inverted for `-end`.
    pub alignment_axis: Option<f64>,
}

/// Keeps the floating element inside the boundary by sliding it along its edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftOptions {
    /// Shift along the alignment axis.
    pub main_axis: bool,
    /// Shift along the side axis as well.
    pub cross_axis: bool,
    /// Boundary padding.
    pub padding: Padding,
}

impl Default for ShiftOptions {
    fn default() -> Self {
        Self {
            main_axis: true,
            cross_axis: false,
            padding: Padding::default(),
        }
    }
}

/// What `flip` settles on when no placement fits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FallbackStrategy {
    /// The placement with the least total overflow.
    #[default]
    BestFit,
    /// The originally requested placement.
    InitialPlacement,
}

/// Moves the floating element to an opposite placement when it overflows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlipOptions {
    /// Check overflow on the placement's side.
    pub main_axis: bool,
    /// Check overflow along the alignment axis.
    pub cross_axis: bool,
    /// Explicit fallback order; derived from the initial placement when `None`.
    pub fallback_placements: Option<Vec<Placement>>,
    /// Resolution when every placement overflows.
    pub fallback_strategy: FallbackStrategy,
    /// Boundary padding.
    pub padding: Padding,
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            main_axis: true,
            cross_axis: true,
            fallback_placements: None,
            fallback_strategy: FallbackStrategy::BestFit,
            padding: Padding::default(),
        }
    }
}

/// Chooses the placement with the most available space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoPlacementOptions {
    /// Include alignment-axis overflow when scoring aligned placements.
    pub cross_axis: bool,
    /// Preferred alignment; only centered placements are considered when `None`.
    pub alignment: Option<Alignment>,
    /// Also consider the opposite alignment when `alignment` is set.
    pub auto_alignment: bool,
    /// Placements to choose from.
    pub allowed_placements: Vec<Placement>,
    /// Boundary padding.
    pub padding: Padding,
}

impl Default for AutoPlacementOptions {
    fn default() -> Self {
        Self {
            cross_axis: false,
            alignment: None,
            auto_alignment: true,
            allowed_placements: Placement::ALL.to_vec(),
            padding: Padding::default(),
        }
    }
}

/// Positions an arrow element along the floating element's edge.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrowOptions {
    /// Minimum distance between the arrow and the floating element's corners.
    pub padding: Padding,
}

/// Which hidden-ness `hide` reports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HideStrategy {
    /// The reference is fully clipped by the boundary.
    #[default]
    ReferenceHidden,
    /// The floating element escaped the boundary.
    Escaped,
}

/// Reports whether the floating element should be visually hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HideOptions {
    /// What to detect.
    pub strategy: HideStrategy,
    /// Boundary padding.
    pub padding: Padding,
}

/// Reference and floating geometry as seen by middleware.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElementRects {
    /// Reference box in the positioning coordinate space.
    pub reference: Rect,
    /// Floating element size.
    pub floating: Size,
}

/// Snapshot handed to a middleware step.
#[derive(Debug)]
pub struct MiddlewareState<'a> {
    /// Current coordinates of the floating element.
    pub coords: Point,
    /// Placement requested by the caller.
    pub initial_placement: Placement,
    /// Placement in effect for this pass (may differ after a reset).
    pub placement: Placement,
    /// Positioning strategy.
    pub strategy: Strategy,
    /// Element geometry.
    pub rects: ElementRects,
    /// Data produced so far by earlier steps.
    pub middleware_data: &'a MiddlewareData,
    /// Clipping boundary used for overflow detection.
    pub boundary: Rect,
    /// Measured arrow element, if one is bound.
    pub arrow_element: Option<Size>,
}

impl MiddlewareState<'_> {
    /// Floating element box at the current coordinates.
    #[must_use]
    pub fn floating_rect(&self) -> Rect {
        Rect::from_origin_size(self.coords, self.rects.floating)
    }
}

/// Instruction to restart the middleware loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reset {
    /// Restart with the current coordinates.
    Rerun,
    /// Restart from coordinates recomputed for a new placement.
    Placement(Placement),
}

/// Result of one middleware step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiddlewareReturn {
    /// New x coordinate, if changed.
    pub x: Option<f64>,
    /// New y coordinate, if changed.
    pub y: Option<f64>,
    /// Side data merged under the middleware's name.
    pub data: Option<Payload>,
    /// Restart request.
    pub reset: Option<Reset>,
}

impl MiddlewareReturn {
    /// A step that changes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A step that moves the floating element to `point`.
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            ..Self::default()
        }
    }

    /// Attach side data.
    #[must_use]
    pub fn with_data(mut self, data: Payload) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a reset.
    #[must_use]
    pub fn with_reset(mut self, reset: Reset) -> Self {
        self.reset = Some(reset);
        self
    }
}

/// User-supplied middleware step.
pub trait CustomMiddleware {
    /// Name under which side data is stored.
    fn name(&self) -> &str;

    /// Run the step.
    fn run(&self, state: &MiddlewareState<'_>) -> MiddlewareReturn;
}

/// One geometry-adjustment step.
#[derive(Clone)]
pub enum Middleware {
    /// Gap between reference and floating element.
    Offset(OffsetOptions),
    /// Slide along the edge to stay inside the boundary.
    Shift(ShiftOptions),
    /// Swap to a fallback placement on overflow.
    Flip(FlipOptions),
    /// Pick the placement with the most space.
    AutoPlacement(AutoPlacementOptions),
    /// Compute arrow coordinates.
    Arrow(ArrowOptions),
    /// Report hidden-ness.
    Hide(HideOptions),
    /// Caller-defined step.
    Custom(Rc<dyn CustomMiddleware>),
}

impl Middleware {
    /// Name under which the step's side data is stored.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Offset(_) => "offset",
            Self::Shift(_) => "shift",
            Self::Flip(_) => "flip",
            Self::AutoPlacement(_) => "autoPlacement",
            Self::Arrow(_) => "arrow",
            Self::Hide(_) => "hide",
            Self::Custom(custom) => custom.name(),
        }
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(o) => f.debug_tuple("Offset").field(o).finish(),
            Self::Shift(o) => f.debug_tuple("Shift").field(o).finish(),
            Self::Flip(o) => f.debug_tuple("Flip").field(o).finish(),
            Self::AutoPlacement(o) => f.debug_tuple("AutoPlacement").field(o).finish(),
            Self::Arrow(o) => f.debug_tuple("Arrow").field(o).finish(),
            Self::Hide(o) => f.debug_tuple("Hide").field(o).finish(),
            Self::Custom(c) => f.debug_tuple("Custom").field(&c.name()).finish(),
        }
    }
}

impl PartialEq for Middleware {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Offset(a), Self::Offset(b)) => a == b,
            (Self::Shift(a), Self::Shift(b)) => a == b,
            (Self::Flip(a), Self::Flip(b)) => a == b,
            (Self::AutoPlacement(a), Self::AutoPlacement(b)) => a == b,
            (Self::Arrow(a), Self::Arrow(b)) => a == b,
            (Self::Hide(a), Self::Hide(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Ordered list of middleware steps.
pub type MiddlewareList = SmallVec<[Middleware; 8]>;
