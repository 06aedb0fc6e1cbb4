// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement vocabulary: sides, alignments, axes, and the twelve placements.

use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Rect, Size};

/// One of the four sides of a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Side {
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

impl Side {
    /// All sides in clockwise order starting at the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side on the other end of the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// The axis along which a floating element moves away from the reference on this side.
    ///
    /// `Top`/`Bottom` move along [`Axis::Y`]; `Left`/`Right` along [`Axis::X`].
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }

    /// CSS-style name of the side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment of the floating element along the reference's edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Alignment {
    /// Align to the start edge.
    Start,
    /// Align to the end edge.
    End,
}

impl Alignment {
    /// The other alignment.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// A 2D axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Component of `point` along this axis.
    #[must_use]
    pub fn of_point(self, point: Point) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
        }
    }

    /// Returns `point` with its component along this axis replaced.
    #[must_use]
    pub fn with_point(self, point: Point, value: f64) -> Point {
        match self {
            Self::X => Point::new(value, point.y),
            Self::Y => Point::new(point.x, value),
        }
    }

    /// Length of `size` along this axis.
    #[must_use]
    pub fn length(self, size: Size) -> f64 {
        match self {
            Self::X => size.width,
            Self::Y => size.height,
        }
    }

    /// Start coordinate of `rect` along this axis.
    #[must_use]
    pub fn start(self, rect: Rect) -> f64 {
        match self {
            Self::X => rect.x0,
            Self::Y => rect.y0,
        }
    }

    /// Coordinate key used for this axis in middleware side data (`"x"` or `"y"`).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// Where the floating element sits relative to the reference.
///
/// A placement is a [`Side`] with an optional [`Alignment`]. `BottomStart` means
/// "below the reference, aligned to its start (left) edge".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Placement {
    /// Above, centered.
    Top,
    /// Above, start-aligned.
    TopStart,
    /// Above, end-aligned.
    TopEnd,
    /// Right, centered.
    Right,
    /// Right, start-aligned.
    RightStart,
    /// Right, end-aligned.
    RightEnd,
    /// Below, centered.
    Bottom,
    /// Below, start-aligned.
    #[default]
    BottomStart,
    /// Below, end-aligned.
    BottomEnd,
    /// Left, centered.
    Left,
    /// Left, start-aligned.
    LeftStart,
    /// Left, end-aligned.
    LeftEnd,
}

impl Placement {
    /// Every placement, grouped by side in clockwise order.
    pub const ALL: [Self; 12] = [
        Self::Top,
        Self::TopStart,
        Self::TopEnd,
        Self::Right,
        Self::RightStart,
        Self::RightEnd,
        Self::Bottom,
        Self::BottomStart,
        Self::BottomEnd,
        Self::Left,
        Self::LeftStart,
        Self::LeftEnd,
    ];

    /// Build a placement from its parts.
    #[must_use]
    pub const fn new(side: Side, alignment: Option<Alignment>) -> Self {
        match (side, alignment) {
            (Side::Top, None) => Self::Top,
            (Side::Top, Some(Alignment::Start)) => Self::TopStart,
            (Side::Top, Some(Alignment::End)) => Self::TopEnd,
            (Side::Right, None) => Self::Right,
            (Side::Right, Some(Alignment::Start)) => Self::RightStart,
            (Side::Right, Some(Alignment::End)) => Self::RightEnd,
            (Side::Bottom, None) => Self::Bottom,
            (Side::Bottom, Some(Alignment::Start)) => Self::BottomStart,
            (Side::Bottom, Some(Alignment::End)) => Self::BottomEnd,
            (Side::Left, None) => Self::Left,
            (Side::Left, Some(Alignment::Start)) => Self::LeftStart,
            (Side::Left, Some(Alignment::End)) => Self::LeftEnd,
        }
    }

    /// Primary side.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Top | Self::TopStart | Self::TopEnd => Side::Top,
            Self::Right | Self::RightStart | Self::RightEnd => Side::Right,
            Self::Bottom | Self::BottomStart | Self::BottomEnd => Side::Bottom,
            Self::Left | Self::LeftStart | Self::LeftEnd => Side::Left,
        }
    }

    /// Alignment suffix, if any.
    #[must_use]
    pub const fn alignment(self) -> Option<Alignment> {
        match self {
            Self::TopStart | Self::RightStart | Self::BottomStart | Self::LeftStart => {
                Some(Alignment::Start)
            }
            Self::TopEnd | Self::RightEnd | Self::BottomEnd | Self::LeftEnd => {
                Some(Alignment::End)
            }
            Self::Top | Self::Right | Self::Bottom | Self::Left => None,
        }
    }

    /// Axis the floating element moves along when leaving the reference.
    #[must_use]
    pub const fn side_axis(self) -> Axis {
        self.side().axis()
    }

    /// Axis along which the alignment applies.
    #[must_use]
    pub const fn alignment_axis(self) -> Axis {
        self.side_axis().opposite()
    }

    /// Same alignment on the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::new(self.side().opposite(), self.alignment())
    }

    /// Same side with the alignment swapped. Centered placements are returned unchanged.
    #[must_use]
    pub const fn opposite_alignment(self) -> Self {
        match self.alignment() {
            Some(alignment) => Self::new(self.side(), Some(alignment.opposite())),
            None => self,
        }
    }

    /// Fallback placements tried for an aligned placement when it overflows.
    ///
    /// `[opposite alignment, opposite side, opposite side with opposite alignment]`.
    #[must_use]
    pub const fn expanded(self) -> [Self; 3] {
        let opposite = self.opposite();
        [
            self.opposite_alignment(),
            opposite,
            opposite.opposite_alignment(),
        ]
    }

    /// CSS-style name such as `"bottom-start"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopStart => "top-start",
            Self::TopEnd => "top-end",
            Self::Right => "right",
            Self::RightStart => "right-start",
            Self::RightEnd => "right-end",
            Self::Bottom => "bottom",
            Self::BottomStart => "bottom-start",
            Self::BottomEnd => "bottom-end",
            Self::Left => "left",
            Self::LeftStart => "left-start",
            Self::LeftEnd => "left-end",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown placement or strategy name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseError {
    kind: &'static str,
    value: alloc::string::String,
}

impl FromStr for Placement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseError {
                kind: "placement",
                value: s.into(),
            })
    }
}

/// CSS positioning mode of the floating element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Strategy {
    /// `position: absolute`.
    #[default]
    Absolute,
    /// `position: fixed`.
    Fixed,
}

impl Strategy {
    /// CSS value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(Self::Absolute),
            "fixed" => Ok(Self::Fixed),
            _ => Err(ParseError {
                kind: "strategy",
                value: s.into(),
            }),
        }
    }
}
