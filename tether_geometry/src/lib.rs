// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tether Geometry: placement vocabulary and the geometry-engine contract for floating elements.
//!
//! A floating element (tooltip, dropdown, popover, context menu) is positioned relative to a
//! reference box by a geometry engine. This crate defines what goes into that engine and what
//! comes out of it, using [`kurbo`] types throughout.
//!
//! - [`Placement`]: one of twelve side/alignment combinations, e.g. `bottom-start`.
//! - [`Strategy`]: `absolute` or `fixed` positioning.
//! - [`Middleware`]: ordered adjustment steps (`offset`, `shift`, `flip`, `autoPlacement`,
//!   `arrow`, `hide`, or a [`CustomMiddleware`]).
//! - [`MiddlewareData`]: per-step side data keyed by middleware name; [`MiddlewareData::arrow`]
//!   gives a typed view of the arrow entry.
//! - [`GeometryEngine`]: the compute contract, deterministic for identical [`ComputeRequest`]s.
//! - [`ReferenceEngine`]: a complete in-process engine implementing every built-in step.
//! - [`AutoUpdateOptions`]: which layout changes keep a shown element's position current.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use tether_geometry::{
//!     ComputeRequest, GeometryEngine, Middleware, Placement, ReferenceEngine, Strategy,
//! };
//!
//! let middleware = [Middleware::Offset(8.0.into())];
//! let result = ReferenceEngine::default().compute(&ComputeRequest {
//!     reference: Rect::new(100.0, 100.0, 150.0, 120.0),
//!     floating: Size::new(200.0, 40.0),
//!     placement: Placement::BottomStart,
//!     strategy: Strategy::Absolute,
//!     middleware: &middleware,
//!     boundary: Rect::new(0.0, 0.0, 1024.0, 768.0),
//!     arrow_element: None,
//! });
//! assert_eq!((result.x, result.y), (100.0, 128.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod auto_update;
mod data;
mod engine;
mod middleware;
mod placement;
mod reference;

pub use auto_update::{AutoUpdateOptions, UpdateCause};
pub use data::{ArrowData, Datum, MiddlewareData, Payload, PlacementOverflow, SideOffsets};
pub use engine::{ComputeRequest, ComputeResult, GeometryEngine};
pub use middleware::{
    ArrowOptions, AutoPlacementOptions, CustomMiddleware, ElementRects, FallbackStrategy,
    FlipOptions, HideOptions, HideStrategy, Middleware, MiddlewareList, MiddlewareReturn,
    MiddlewareState, OffsetAxes, OffsetOptions, Padding, Reset, ShiftOptions,
};
pub use placement::{Alignment, Axis, ParseError, Placement, Side, Strategy};
pub use reference::{DEFAULT_RESET_LIMIT, ReferenceEngine, coords_from_placement, detect_overflow};
