// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Middleware side data: per-step payloads keyed by middleware name.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::placement::{Placement, Side};

/// Signed distances of a box past each side of the boundary.
///
/// Positive values mean the box overflows that side by that amount.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SideOffsets {
    /// Overflow past the top edge.
    pub top: f64,
    /// Overflow past the right edge.
    pub right: f64,
    /// Overflow past the bottom edge.
    pub bottom: f64,
    /// Overflow past the left edge.
    pub left: f64,
}

impl SideOffsets {
    /// Overflow on `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Whether any side is clipped completely.
    #[must_use]
    pub fn any_fully_clipped(&self) -> bool {
        Side::ALL.into_iter().any(|side| self.get(side) >= 0.0)
    }
}

/// Overflow record for one placement tried by `flip` or `autoPlacement`.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementOverflow {
    /// Placement that was tried.
    pub placement: Placement,
    /// Overflow amounts, main side first.
    pub overflows: Vec<f64>,
}

/// A single side-data value.
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Flag(bool),
    /// Placement value.
    Placement(Placement),
    /// Per-side offsets.
    Offsets(SideOffsets),
    /// Overflow history.
    Overflows(Vec<PlacementOverflow>),
}

/// Side data produced by one middleware step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload {
    values: BTreeMap<String, Datum>,
}

impl Payload {
    /// Empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Datum) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Datum) {
        self.values.insert(key.into(), value);
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Datum> {
        self.values.get(key)
    }

    /// Numeric value for `key`.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(Datum::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value for `key`.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(Datum::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// Placement value for `key`.
    #[must_use]
    pub fn placement(&self, key: &str) -> Option<Placement> {
        match self.values.get(key) {
            Some(Datum::Placement(p)) => Some(*p),
            _ => None,
        }
    }

    /// Overflow history for `key`.
    #[must_use]
    pub fn overflows(&self, key: &str) -> &[PlacementOverflow] {
        match self.values.get(key) {
            Some(Datum::Overflows(list)) => list,
            _ => &[],
        }
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether the payload has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }
}

/// Arrow coordinates reported by the `arrow` step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ArrowData {
    /// Offset of the arrow from the floating element's left edge.
    pub x: Option<f64>,
    /// Offset of the arrow from the floating element's top edge.
    pub y: Option<f64>,
    /// Distance between the arrow and the reference's center.
    pub center_offset: f64,
    /// Shift applied to the floating element to keep the arrow pointing at the reference.
    pub alignment_offset: Option<f64>,
}

/// Side data of every middleware step, keyed by middleware name.
///
/// The controller treats this as opaque except for the `"arrow"` entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiddlewareData {
    entries: BTreeMap<String, Payload>,
}

impl MiddlewareData {
    /// Payload stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Payload> {
        self.entries.get(name)
    }

    /// Merge `payload` into the entry for `name`, replacing keys that already exist.
    pub fn merge(&mut self, name: &str, payload: Payload) {
        match self.entries.get_mut(name) {
            Some(existing) => existing.merge(payload),
            None => {
                self.entries.insert(name.into(), payload);
            }
        }
    }

    /// Typed view of the `"arrow"` entry.
    #[must_use]
    pub fn arrow(&self) -> Option<ArrowData> {
        let payload = self.entries.get("arrow")?;
        Some(ArrowData {
            x: payload.number("x"),
            y: payload.number("y"),
            center_offset: payload.number("centerOffset").unwrap_or(0.0),
            alignment_offset: payload.number("alignmentOffset"),
        })
    }

    /// Names that carry data, in key order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether no step produced data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
