// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference handles: a document element or a synthetic point.

use alloc::rc::Rc;

use kurbo::{Point, Rect};
use tether_scene::{Document, NodeId};

/// A synthetic reference that only exposes a bounding rectangle.
///
/// Created per event and swapped in whole; never mutated. Two virtual references are the
/// same reference only if they are the same allocation, see [`Reference::same_identity`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VirtualReference {
    rect: Rect,
}

impl VirtualReference {
    /// A zero-size reference at `point`.
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self {
            rect: Rect::from_origin_size(point, (0.0, 0.0)),
        }
    }

    /// A reference with an explicit box.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    /// Bounding rectangle in viewport coordinates.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        self.rect
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.rect.y0
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.rect.x0
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.rect.x1
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.rect.y1
    }
}

impl Default for VirtualReference {
    fn default() -> Self {
        Self::at(Point::ZERO)
    }
}

/// What the floating element is positioned against.
#[derive(Clone, Debug)]
pub enum Reference {
    /// A node of the document.
    Element(NodeId),
    /// A synthetic point or box.
    Virtual(Rc<VirtualReference>),
}

impl Reference {
    /// Wrap a virtual reference in a fresh identity.
    #[must_use]
    pub fn virtual_at(point: Point) -> Self {
        Self::Virtual(Rc::new(VirtualReference::at(point)))
    }

    /// The element, if this is an element reference.
    #[must_use]
    pub fn element(&self) -> Option<NodeId> {
        match self {
            Self::Element(id) => Some(*id),
            Self::Virtual(_) => None,
        }
    }

    /// Whether `self` and `other` are the same reference.
    ///
    /// Elements compare by id; virtual references by allocation.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Element(a), Self::Element(b)) => a == b,
            (Self::Virtual(a), Self::Virtual(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The box to position against, or `None` when the element is not rendered.
    ///
    /// Virtual references are always considered rendered.
    pub fn measure(&self, doc: &Document) -> Option<Rect> {
        match self {
            Self::Element(id) => doc.is_rendered(*id).then(|| doc.bounds(*id)).flatten(),
            Self::Virtual(v) => Some(v.bounding_rect()),
        }
    }
}
