// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry-engine contract consumed by the positioning controller.

use kurbo::{Point, Rect, Size};

use crate::data::MiddlewareData;
use crate::middleware::Middleware;
use crate::placement::{Placement, Strategy};

/// Inputs of one position computation.
#[derive(Clone, Debug)]
pub struct ComputeRequest<'a> {
    /// Reference box in the positioning coordinate space.
    pub reference: Rect,
    /// Size of the floating element.
    pub floating: Size,
    /// Requested placement.
    pub placement: Placement,
    /// Positioning strategy.
    pub strategy: Strategy,
    /// Ordered middleware steps.
    pub middleware: &'a [Middleware],
    /// Clipping boundary for overflow detection (usually the viewport).
    pub boundary: Rect,
    /// Measured arrow element, if one is bound.
    pub arrow_element: Option<Size>,
}

impl ComputeRequest<'_> {
    /// Whether two requests would produce the same result from a deterministic engine.
    #[must_use]
    pub fn same_inputs(&self, other: &ComputeRequest<'_>) -> bool {
        self.reference == other.reference
            && self.floating == other.floating
            && self.placement == other.placement
            && self.strategy == other.strategy
            && self.middleware == other.middleware
            && self.boundary == other.boundary
            && self.arrow_element == other.arrow_element
    }
}

/// Output of one position computation.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputeResult {
    /// Resolved x coordinate of the floating element.
    pub x: f64,
    /// Resolved y coordinate of the floating element.
    pub y: f64,
    /// Placement after middleware (flip/autoPlacement may change it).
    pub placement: Placement,
    /// Strategy the coordinates are expressed in.
    pub strategy: Strategy,
    /// Side data of every step.
    pub middleware_data: MiddlewareData,
}

impl ComputeResult {
    /// Resolved coordinates as a point.
    #[must_use]
    pub fn coords(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A geometry engine: resolves coordinates for a floating element.
///
/// Implementations must be deterministic: identical requests yield identical results.
pub trait GeometryEngine {
    /// Compute the floating element's position.
    fn compute(&self, request: &ComputeRequest<'_>) -> ComputeResult;
}
