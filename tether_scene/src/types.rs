// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, flags, and element data.

use alloc::collections::BTreeMap;
use alloc::string::String;

use kurbo::Rect;

/// Identifier for a node in the document (generational).
///
/// A removed node's slot may be reused; the generation distinguishes the new occupant, so
/// stale identifiers never alias a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Whether `self` was created after `other`.
    pub(crate) fn is_newer_than(self, other: Self) -> bool {
        (self.1 > other.1) || (self.1 == other.1 && self.0 > other.0)
    }
}

bitflags::bitflags! {
    /// Node flags controlling display and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is displayed (the `display: none` equivalent when cleared).
        const DISPLAYED = 0b0000_0001;
        /// Node participates in hit testing.
        const PICKABLE  = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::DISPLAYED | Self::PICKABLE
    }
}

/// Element data stored for each node.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Tag name, e.g. `"div"`. Text nodes use `"#text"`.
    pub tag: String,
    /// Attributes in name order.
    pub attrs: BTreeMap<String, String>,
    /// Text content, for text and style nodes.
    pub text: Option<String>,
    /// Document-space bounding box as produced by layout.
    pub bounds: Rect,
    /// Stacking order. Higher is on top.
    pub z_index: i32,
    /// Display and picking flags.
    pub flags: NodeFlags,
}

impl Element {
    /// An element with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            text: None,
            bounds: Rect::ZERO,
            z_index: 0,
            flags: NodeFlags::default(),
        }
    }

    /// A text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            flags: NodeFlags::DISPLAYED,
            ..Self::new("#text")
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder-style bounds setter.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new("div")
    }
}
